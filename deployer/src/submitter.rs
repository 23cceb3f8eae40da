// deployer/src/submitter.rs

use crate::artifact::ContractArtifact;
use crate::attempt::{DeploymentAttempt, PreparedDeployment};
use crate::error::DeployError;
use crate::rpc::DeploymentRpc;
use ethers::types::TxHash;
use tracing::{error, info, instrument};

/// Sends the contract-creation transaction exactly once.
///
/// The returned hash is written into `attempt` before this function returns, so
/// a later confirmation failure can still report it.
#[instrument(skip_all, fields(account = ?prepared.account, nonce = %prepared.nonce))]
pub async fn submit_deployment<P: DeploymentRpc>(
    rpc: &P,
    artifact: &ContractArtifact,
    prepared: &PreparedDeployment,
    attempt: &mut DeploymentAttempt,
) -> Result<TxHash, DeployError> {
    info!(
        gas_price = %prepared.plan.price,
        gas_limit = %prepared.plan.limit,
        code_bytes = artifact.bytecode.len(),
        "Sending deployment transaction..."
    );

    let tx_hash = rpc
        .deploy_contract(
            &artifact.abi,
            &artifact.bytecode,
            &prepared.plan,
            prepared.nonce,
            prepared.account,
        )
        .await
        .map_err(|source| {
            error!(error = %source, "Deployment transaction was not accepted.");
            DeployError::SubmissionFailed { source }
        })?;

    attempt.record_submission(tx_hash);
    info!(?tx_hash, "Deployment transaction submitted.");
    Ok(tx_hash)
}
