// deployer/src/gas.rs
// Module for deriving gas price and gas limit for the deployment transaction.

use crate::config::GasPolicy;
use crate::error::DeployError;
use crate::rpc::DeploymentRpc;
use ethers::types::U256;
use futures_util::TryFutureExt;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Share of the latest block's gas limit a deployment may claim, in percent.
pub const BLOCK_GAS_SHARE_PERCENT: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPlan {
    /// Wei per gas unit.
    pub price: U256,
    /// Gas units.
    pub limit: U256,
}

impl GasPlan {
    /// `price = max(live, floor)`, `limit = min(30% of block limit, default limit)`.
    ///
    /// The floor only ever raises the price; an observed price above the floor is kept.
    pub fn derive(live_gas_price: U256, block_gas_limit: U256, policy: &GasPolicy) -> Self {
        let price = live_gas_price.max(policy.min_gas_price);
        let block_share = block_gas_limit.saturating_mul(U256::from(BLOCK_GAS_SHARE_PERCENT))
            / U256::from(100u64);
        let limit = block_share.min(policy.default_gas_limit);
        Self { price, limit }
    }

    /// Worst-case fee if every unit of `limit` is consumed.
    pub fn max_cost(&self) -> U256 {
        self.price.saturating_mul(self.limit)
    }
}

/// Reads the live gas price and latest block concurrently, then derives the plan.
#[instrument(skip_all, level = "debug")]
pub async fn fetch_gas_plan<P: DeploymentRpc>(
    rpc: &P,
    policy: &GasPolicy,
) -> Result<GasPlan, DeployError> {
    debug!("Fetching gas price and latest block...");
    let (live_gas_price, block) = tokio::try_join!(
        rpc.get_gas_price().map_err(DeployError::transport("fetch gas price")),
        rpc.get_latest_block().map_err(DeployError::transport("fetch latest block")),
    )?;

    let plan = GasPlan::derive(live_gas_price, block.gas_limit, policy);
    if plan.price > live_gas_price {
        warn!(
            live = %live_gas_price,
            floor = %policy.min_gas_price,
            "Network gas price is below the configured floor; using the floor."
        );
    }
    debug!(
        block = block.number,
        block_gas_limit = %block.gas_limit,
        price = %plan.price,
        limit = %plan.limit,
        "Gas plan derived."
    );
    Ok(plan)
}
