// deployer/src/config.rs

use dotenv::dotenv;
use ethers::{
    types::U256,
    utils::{parse_units, ParseUnits},
};
use eyre::{eyre, Result, WrapErr};
use std::{env, path::PathBuf, time::Duration};
use tracing::info;

pub const DEFAULT_GAS_LIMIT: u64 = 30_000_000;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;

/// The network the operator intends to deploy to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkIdentity {
    pub expected_chain_id: u64,
    pub expected_endpoint: String,
}

/// Network-mandated gas floor and ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    /// Wei. The planned price is never below this.
    pub min_gas_price: U256,
    /// Hard ceiling on the planned gas limit.
    pub default_gas_limit: U256,
}

/// Everything the pipeline needs besides the RPC client, artifact and account.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub network: NetworkIdentity,
    pub gas: GasPolicy,
    pub settle_delay: Duration,
    pub confirmation_timeout: Duration,
    pub receipt_poll_interval: Duration,
}

impl DeployConfig {
    pub fn new(network: NetworkIdentity, gas: GasPolicy) -> Self {
        Self {
            network,
            gas,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            confirmation_timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
            receipt_poll_interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_INTERVAL_MS),
        }
    }
}

/// Process-level configuration: the pipeline config plus the secrets and paths
/// that only the binary touches.
#[derive(Clone)]
pub struct Config {
    pub deploy: DeployConfig,
    pub private_key: String,
    pub artifact_path: Option<PathBuf>,
}

// Never print the key.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("deploy", &self.deploy)
            .field("private_key", &"<redacted>")
            .field("artifact_path", &self.artifact_path)
            .finish()
    }
}

pub fn load_config() -> Result<Config> {
    info!("Loading configuration from environment (.env if present)...");
    dotenv().ok();
    let config = config_from_lookup(|key| env::var(key).ok())?;
    info!(
        endpoint = %config.deploy.network.expected_endpoint,
        chain_id = config.deploy.network.expected_chain_id,
        "Configuration loaded."
    );
    Ok(config)
}

/// Builds a [`Config`] from an arbitrary key lookup.
pub fn config_from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| -> Result<String> {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| eyre!("{key} must be set"))
    };
    let parse_u64 = |key: &str, default: u64| -> Result<u64> {
        match lookup(key) {
            Some(v) if !v.trim().is_empty() => v
                .trim()
                .parse::<u64>()
                .wrap_err_with(|| format!("{key} is not a valid integer: {v:?}")),
            _ => Ok(default),
        }
    };

    let expected_endpoint = required("RPC_URL")?;
    let private_key = required("PRIVATE_KEY")?;
    let expected_chain_id = required("EXPECTED_CHAIN_ID")?
        .parse::<u64>()
        .wrap_err("EXPECTED_CHAIN_ID is not a valid integer")?;

    let min_gas_price_gwei = lookup("MIN_GAS_PRICE_GWEI").unwrap_or_else(|| "0".to_string());
    let min_gas_price = match parse_units(min_gas_price_gwei.trim(), "gwei")
        .wrap_err_with(|| format!("MIN_GAS_PRICE_GWEI is not a valid amount: {min_gas_price_gwei:?}"))?
    {
        ParseUnits::U256(wei) => wei,
        ParseUnits::I256(_) => eyre::bail!("MIN_GAS_PRICE_GWEI must not be negative"),
    };
    let default_gas_limit = parse_u64("DEFAULT_GAS_LIMIT", DEFAULT_GAS_LIMIT)?;
    if default_gas_limit == 0 {
        eyre::bail!("DEFAULT_GAS_LIMIT must be greater than zero");
    }

    let mut deploy = DeployConfig::new(
        NetworkIdentity { expected_chain_id, expected_endpoint },
        GasPolicy { min_gas_price, default_gas_limit: default_gas_limit.into() },
    );
    deploy.settle_delay =
        Duration::from_millis(parse_u64("SETTLE_DELAY_MS", DEFAULT_SETTLE_DELAY_MS)?);
    deploy.confirmation_timeout = Duration::from_secs(parse_u64(
        "CONFIRMATION_TIMEOUT_SECS",
        DEFAULT_CONFIRMATION_TIMEOUT_SECS,
    )?);
    deploy.receipt_poll_interval = Duration::from_millis(parse_u64(
        "RECEIPT_POLL_INTERVAL_MS",
        DEFAULT_RECEIPT_POLL_INTERVAL_MS,
    )?);

    let artifact_path = lookup("ARTIFACT_PATH")
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(Config { deploy, private_key, artifact_path })
}
