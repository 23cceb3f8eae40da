// deployer/src/guard.rs

use crate::error::DeployError;
use crate::gas::GasPlan;
use ethers::types::U256;
use tracing::{debug, error};

/// Rejects the attempt when the balance cannot cover `price * limit`.
///
/// Deliberately worst-case: a deployment that would have consumed less gas can
/// still be rejected here. Returns the estimated cost on pass.
pub fn check_affordability(balance: U256, plan: &GasPlan) -> Result<U256, DeployError> {
    let estimated_cost = plan.max_cost();
    if balance < estimated_cost {
        error!(%balance, %estimated_cost, "Balance does not cover worst-case deployment cost.");
        return Err(DeployError::InsufficientFunds { balance, estimated_cost });
    }
    debug!(%balance, %estimated_cost, "Balance covers worst-case deployment cost.");
    Ok(estimated_cost)
}
