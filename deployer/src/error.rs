// deployer/src/error.rs

use ethers::types::{TransactionReceipt, TxHash, U256};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Boxed collaborator error. Kept as a trait object so `source()` links survive.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a single deployment attempt can fail.
///
/// Variants that wrap a collaborator failure keep it as `#[source]`, so the
/// diagnostic reporter can walk the chain down to the root cause.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(
        "chain id mismatch: endpoint {endpoint} reports chain {connected}, expected {expected}"
    )]
    ChainMismatch {
        connected: U256,
        expected: u64,
        endpoint: String,
    },

    #[error("insufficient funds: balance {balance} wei < estimated cost {estimated_cost} wei")]
    InsufficientFunds { balance: U256, estimated_cost: U256 },

    #[error("deployment transaction submission failed")]
    SubmissionFailed {
        #[source]
        source: BoxError,
    },

    #[error("deployment transaction {:?} was mined but reverted", .receipt.transaction_hash)]
    ExecutionReverted { receipt: Box<TransactionReceipt> },

    #[error("no receipt for transaction {tx_hash:?} after {}s", .timeout.as_secs())]
    ConfirmationTimeout { tx_hash: TxHash, timeout: Duration },

    #[error("rpc call failed: {operation}")]
    TransportFailure {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl DeployError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DeployError::ChainMismatch { .. } => FailureKind::ChainMismatch,
            DeployError::InsufficientFunds { .. } => FailureKind::InsufficientFunds,
            DeployError::SubmissionFailed { .. } => FailureKind::SubmissionFailed,
            DeployError::ExecutionReverted { .. } => FailureKind::ExecutionReverted,
            DeployError::ConfirmationTimeout { .. } => FailureKind::ConfirmationTimeout,
            DeployError::TransportFailure { .. } => FailureKind::TransportFailure,
        }
    }

    /// Adapter for `map_err` on collaborator calls.
    pub fn transport(operation: &'static str) -> impl FnOnce(BoxError) -> DeployError {
        move |source| DeployError::TransportFailure { operation, source }
    }
}

/// Tag-only view of [`DeployError`], for logging and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureKind {
    ChainMismatch,
    InsufficientFunds,
    SubmissionFailed,
    ExecutionReverted,
    ConfirmationTimeout,
    TransportFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
