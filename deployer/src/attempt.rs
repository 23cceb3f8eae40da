// deployer/src/attempt.rs
// Attempt-scoped state. Nothing here outlives a single pipeline invocation.

use crate::gas::GasPlan;
use ethers::{
    types::{Address, TransactionReceipt, TxHash, U256},
    utils::to_checksum,
};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// What is known about the in-flight attempt so far. Fields fill in as stages
/// complete, so a failure snapshot may be partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentAttempt {
    pub account: Address,
    pub balance: Option<U256>,
    pub nonce: Option<U256>,
    pub plan: Option<GasPlan>,
    pub submitted_hash: Option<TxHash>,
}

impl DeploymentAttempt {
    pub fn new(account: Address) -> Self {
        Self { account, balance: None, nonce: None, plan: None, submitted_hash: None }
    }

    /// Set once, immediately after the node accepts the transaction.
    pub fn record_submission(&mut self, tx_hash: TxHash) {
        if let Some(previous) = self.submitted_hash.replace(tx_hash) {
            warn!(?previous, ?tx_hash, "Submission recorded twice for one attempt.");
        }
    }
}

/// Output of the pre-submission checks: chain verified, plan derived, balance
/// sufficient, nonce read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedDeployment {
    pub account: Address,
    pub balance: U256,
    pub nonce: U256,
    pub plan: GasPlan,
    pub estimated_cost: U256,
}

/// Successful terminal value of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOutcome {
    pub contract_address: Address,
    pub transaction_hash: TxHash,
    pub receipt: TransactionReceipt,
}

// Block and gas used are optional on the wire; a missing one is shown, never zeroed.
impl fmt::Display for DeploymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_unknown = |value: Option<String>| value.unwrap_or_else(|| "unknown".to_string());
        writeln!(f, "✅ Contract deployed at {}", to_checksum(&self.contract_address, None))?;
        writeln!(f, "  tx hash:  {:?}", self.transaction_hash)?;
        writeln!(f, "  block:    {}", or_unknown(self.receipt.block_number.map(|n| n.to_string())))?;
        write!(f, "  gas used: {}", or_unknown(self.receipt.gas_used.map(|g| g.to_string())))
    }
}
