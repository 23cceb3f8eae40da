// deployer/src/verifier.rs

use crate::config::NetworkIdentity;
use crate::error::DeployError;
use crate::rpc::DeploymentRpc;
use ethers::types::U256;
use tracing::{debug, error, instrument};

/// Confirms the connected endpoint serves the expected chain.
///
/// Must run before any balance, nonce or gas read: those values are meaningless
/// on the wrong network.
#[instrument(skip_all, fields(endpoint = %identity.expected_endpoint, expected = identity.expected_chain_id))]
pub async fn verify_chain_identity<P: DeploymentRpc>(
    rpc: &P,
    identity: &NetworkIdentity,
) -> Result<(), DeployError> {
    let connected = rpc
        .get_chain_id()
        .await
        .map_err(DeployError::transport("fetch chain id"))?;

    if connected != U256::from(identity.expected_chain_id) {
        error!(%connected, "Connected endpoint reports an unexpected chain id.");
        return Err(DeployError::ChainMismatch {
            connected,
            expected: identity.expected_chain_id,
            endpoint: identity.expected_endpoint.clone(),
        });
    }

    debug!(%connected, "Chain identity verified.");
    Ok(())
}
