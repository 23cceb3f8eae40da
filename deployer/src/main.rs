// deployer/src/main.rs

// --- Imports ---
use clap::Parser;
use ethers::{
    prelude::{Http, LocalWallet, Provider, Signer, SignerMiddleware},
    utils::{format_units, to_checksum},
};
use eyre::{eyre, Result, WrapErr};
use guarded_deploy::{deploy, load_artifact, load_config, prepare, EthersRpc};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Argument Parsing ---
#[derive(Parser, Debug)]
#[command(author, version, about = "Deploy a compiled contract with chain, gas and balance guards", long_about = None)]
struct Cli {
    /// Contract artifact JSON (`abi` + `bytecode`). Falls back to ARTIFACT_PATH.
    #[arg(long, value_name = "PATH")]
    artifact: Option<PathBuf>,

    /// Run chain, gas and balance checks, print the plan, and stop before submitting.
    #[arg(long)]
    dry_run: bool,

    /// Print the outcome or failure report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn setup_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// --- Main Execution ---
#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_tracing();
    let cli = Cli::parse();
    let config = load_config()?;

    // Setup Provider & Client
    let provider = Provider::<Http>::try_from(config.deploy.network.expected_endpoint.as_str())
        .wrap_err("Invalid RPC_URL")?;
    let wallet = config
        .private_key
        .parse::<LocalWallet>()
        .map_err(|e| eyre!("Invalid PRIVATE_KEY: {}", e))?
        .with_chain_id(config.deploy.network.expected_chain_id);
    let account = wallet.address();
    let client = Arc::new(SignerMiddleware::new(provider, wallet));
    let rpc = EthersRpc::new(client, config.deploy.receipt_poll_interval);
    info!(account = %to_checksum(&account, None), "Provider & signer ready.");

    if cli.dry_run {
        return match prepare(&rpc, &config.deploy, account).await {
            Ok(prepared) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&prepared)?);
                } else {
                    println!("--- Dry run: nothing submitted ---");
                    println!("  account:        {}", to_checksum(&prepared.account, None));
                    println!("  nonce:          {}", prepared.nonce);
                    println!("  gas price:      {} gwei", format_units(prepared.plan.price, "gwei")?);
                    println!("  gas limit:      {}", prepared.plan.limit);
                    println!("  estimated cost: {} ether", format_units(prepared.estimated_cost, "ether")?);
                    println!("  balance:        {} ether", format_units(prepared.balance, "ether")?);
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(failure) => report_failure(&failure, cli.json),
        };
    }

    let artifact_path = cli
        .artifact
        .or(config.artifact_path)
        .ok_or_else(|| eyre!("No artifact given: pass --artifact or set ARTIFACT_PATH"))?;
    let artifact = load_artifact(&artifact_path)?;

    match deploy(&rpc, &config.deploy, &artifact, account).await {
        Ok(outcome) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{outcome}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => report_failure(&failure, cli.json),
    }
}

fn report_failure(failure: &guarded_deploy::DeploymentFailure, json: bool) -> Result<ExitCode> {
    let report = failure.report();
    eprintln!("{report}");
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(ExitCode::FAILURE)
}
