// tests/integration_test.rs
// End-to-end runs against a local Anvil node through the ethers-backed client.
// Start `anvil` on 127.0.0.1:8545, then run: cargo test -- --ignored

use ethers::{
    abi::Abi,
    prelude::{Http, LocalWallet, Middleware, Provider, Signer, SignerMiddleware},
    types::{Bytes, U256},
    utils::hex,
};
use eyre::Result;
use guarded_deploy::{
    deploy, ContractArtifact, DeployConfig, DeployError, EthersRpc, GasPolicy, NetworkIdentity,
};
use std::{sync::Arc, time::Duration};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

const ANVIL_HTTP_URL: &str = "http://127.0.0.1:8545";
const ANVIL_CHAIN_ID: u64 = 31337;
const ANVIL_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
// Init code that deploys a runtime returning 42 for any call.
const ANSWER_INITCODE: &str = "600a600c600039600a6000f3602a60005260206000f3";

type AnvilClient = SignerMiddleware<Provider<Http>, LocalWallet>;

// Helper to initialize tracing subscriber for tests
fn setup_tracing() {
    let _ = fmt()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn anvil_rpc(chain_id: u64) -> Result<EthersRpc<AnvilClient>> {
    let provider = Provider::<Http>::try_from(ANVIL_HTTP_URL)?.interval(Duration::from_millis(10));
    let wallet = ANVIL_PRIVATE_KEY.parse::<LocalWallet>()?.with_chain_id(chain_id);
    let client = Arc::new(SignerMiddleware::new(provider, wallet));
    Ok(EthersRpc::new(client, Duration::from_millis(100)))
}

fn anvil_config(expected_chain_id: u64) -> DeployConfig {
    let mut config = DeployConfig::new(
        NetworkIdentity {
            expected_chain_id,
            expected_endpoint: ANVIL_HTTP_URL.to_string(),
        },
        GasPolicy {
            min_gas_price: U256::from(1_000_000_000u64),
            default_gas_limit: U256::from(1_000_000u64),
        },
    );
    config.settle_delay = Duration::from_millis(50);
    config
}

fn answer_artifact() -> Result<ContractArtifact> {
    Ok(ContractArtifact { abi: Abi::default(), bytecode: Bytes::from(hex::decode(ANSWER_INITCODE)?) })
}

#[tokio::test]
#[ignore] // Requires a running Anvil node.
async fn deploys_to_local_anvil() -> Result<()> {
    setup_tracing();
    let rpc = anvil_rpc(ANVIL_CHAIN_ID)?;
    let account = rpc.client().address();

    let outcome = deploy(&rpc, &anvil_config(ANVIL_CHAIN_ID), &answer_artifact()?, account).await?;
    info!(address = ?outcome.contract_address, "Deployed on Anvil.");

    let code = rpc.client().get_code(outcome.contract_address, None).await?;
    assert_eq!(code.to_vec(), hex::decode("602a60005260206000f3")?);
    assert_eq!(outcome.receipt.transaction_hash, outcome.transaction_hash);
    Ok(())
}

#[tokio::test]
#[ignore] // Requires a running Anvil node.
async fn wrong_expected_chain_is_rejected_by_anvil() -> Result<()> {
    setup_tracing();
    let rpc = anvil_rpc(ANVIL_CHAIN_ID)?;
    let account = rpc.client().address();
    let nonce_before = rpc.client().get_transaction_count(account, None).await?;

    let failure = deploy(&rpc, &anvil_config(10), &answer_artifact()?, account)
        .await
        .expect_err("chain 31337 must not satisfy an expectation of chain 10");

    assert!(matches!(failure.error(), DeployError::ChainMismatch { .. }));
    let nonce_after = rpc.client().get_transaction_count(account, None).await?;
    assert_eq!(nonce_before, nonce_after);
    Ok(())
}
