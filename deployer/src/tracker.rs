// deployer/src/tracker.rs

use crate::attempt::DeploymentOutcome;
use crate::error::DeployError;
use crate::rpc::DeploymentRpc;
use ethers::types::{TransactionReceipt, TxHash, U64};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

const TX_SUCCESS_STATUS: U64 = U64([1]);

/// Waits for the receipt and classifies it.
///
/// pending -> confirmed-success | confirmed-failed | timed-out
#[instrument(skip(rpc), level = "debug")]
pub async fn await_confirmation<P: DeploymentRpc>(
    rpc: &P,
    tx_hash: TxHash,
    timeout: Duration,
) -> Result<DeploymentOutcome, DeployError> {
    info!(?tx_hash, timeout_secs = timeout.as_secs(), "Waiting for receipt...");
    let receipt = rpc
        .wait_for_transaction_receipt(tx_hash, timeout)
        .await
        .map_err(DeployError::transport("wait for transaction receipt"))?;

    match receipt {
        Some(receipt) => outcome_from_receipt(tx_hash, receipt),
        None => {
            warn!(?tx_hash, "No receipt before timeout; the transaction may still be mined later.");
            Err(DeployError::ConfirmationTimeout { tx_hash, timeout })
        }
    }
}

/// Pure classification of a receipt. Only an explicit success status counts;
/// a missing status is treated as failed.
pub fn outcome_from_receipt(
    tx_hash: TxHash,
    receipt: TransactionReceipt,
) -> Result<DeploymentOutcome, DeployError> {
    if receipt.status != Some(TX_SUCCESS_STATUS) {
        error!(
            ?tx_hash,
            status = ?receipt.status,
            gas_used = ?receipt.gas_used,
            "Deployment transaction reverted."
        );
        return Err(DeployError::ExecutionReverted { receipt: Box::new(receipt) });
    }

    let contract_address = receipt.contract_address.ok_or_else(|| DeployError::TransportFailure {
        operation: "read contract address from receipt",
        source: "successful receipt has no contractAddress".into(),
    })?;

    info!(
        ?contract_address,
        block = ?receipt.block_number,
        gas_used = ?receipt.gas_used,
        "✅ Contract deployed."
    );
    Ok(DeploymentOutcome { contract_address, transaction_hash: tx_hash, receipt })
}
