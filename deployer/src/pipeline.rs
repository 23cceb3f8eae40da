// deployer/src/pipeline.rs
// Orchestrates: verify chain -> plan gas -> check balance -> read nonce -> settle -> submit -> confirm.

use crate::artifact::ContractArtifact;
use crate::attempt::{DeploymentAttempt, DeploymentOutcome, PreparedDeployment};
use crate::config::DeployConfig;
use crate::diagnostics::DiagnosticReport;
use crate::error::DeployError;
use crate::gas::fetch_gas_plan;
use crate::guard::check_affordability;
use crate::rpc::DeploymentRpc;
use crate::submitter::submit_deployment;
use crate::tracker::await_confirmation;
use crate::verifier::verify_chain_identity;
use ethers::types::Address;
use std::fmt;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// A failed attempt: the original error, untouched, plus the attempt snapshot
/// at the moment it failed.
#[derive(Debug)]
pub struct DeploymentFailure {
    error: DeployError,
    attempt: DeploymentAttempt,
}

impl DeploymentFailure {
    fn new(error: DeployError, attempt: DeploymentAttempt) -> Self {
        let failure = Self { error, attempt };
        let report = failure.report();
        error!(
            kind = %report.kind,
            tx_hash = ?report.tx_hash,
            root_cause = report.root_cause().unwrap_or_default(),
            "Deployment attempt failed."
        );
        failure
    }

    pub fn error(&self) -> &DeployError {
        &self.error
    }

    pub fn attempt(&self) -> &DeploymentAttempt {
        &self.attempt
    }

    pub fn report(&self) -> DiagnosticReport {
        DiagnosticReport::new(&self.error, &self.attempt)
    }

    pub fn into_error(self) -> DeployError {
        self.error
    }
}

impl fmt::Display for DeploymentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report())
    }
}

impl std::error::Error for DeploymentFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Runs every check that precedes submission. Nothing is sent to the network.
#[instrument(skip_all, fields(account = ?account))]
pub async fn prepare<P: DeploymentRpc>(
    rpc: &P,
    config: &DeployConfig,
    account: Address,
) -> Result<PreparedDeployment, DeploymentFailure> {
    let mut attempt = DeploymentAttempt::new(account);
    run_checks(rpc, config, &mut attempt)
        .await
        .map_err(|error| DeploymentFailure::new(error, attempt))
}

/// Deploys `artifact` from `account`: one attempt, one submission, no retries.
#[instrument(skip_all, fields(account = ?account, chain_id = config.network.expected_chain_id))]
pub async fn deploy<P: DeploymentRpc>(
    rpc: &P,
    config: &DeployConfig,
    artifact: &ContractArtifact,
    account: Address,
) -> Result<DeploymentOutcome, DeploymentFailure> {
    let mut attempt = DeploymentAttempt::new(account);
    match run_deployment(rpc, config, artifact, &mut attempt).await {
        Ok(outcome) => Ok(outcome),
        Err(error) => Err(DeploymentFailure::new(error, attempt)),
    }
}

async fn run_checks<P: DeploymentRpc>(
    rpc: &P,
    config: &DeployConfig,
    attempt: &mut DeploymentAttempt,
) -> Result<PreparedDeployment, DeployError> {
    verify_chain_identity(rpc, &config.network).await?;

    let plan = fetch_gas_plan(rpc, &config.gas).await?;
    attempt.plan = Some(plan);

    let balance = rpc
        .get_balance(attempt.account)
        .await
        .map_err(DeployError::transport("fetch account balance"))?;
    attempt.balance = Some(balance);
    let estimated_cost = check_affordability(balance, &plan)?;

    let nonce = rpc
        .get_transaction_count(attempt.account)
        .await
        .map_err(DeployError::transport("fetch account nonce"))?;
    attempt.nonce = Some(nonce);

    info!(
        %balance,
        %nonce,
        gas_price = %plan.price,
        gas_limit = %plan.limit,
        %estimated_cost,
        "Pre-submission checks passed."
    );
    Ok(PreparedDeployment { account: attempt.account, balance, nonce, plan, estimated_cost })
}

async fn run_deployment<P: DeploymentRpc>(
    rpc: &P,
    config: &DeployConfig,
    artifact: &ContractArtifact,
    attempt: &mut DeploymentAttempt,
) -> Result<DeploymentOutcome, DeployError> {
    let prepared = run_checks(rpc, config, attempt).await?;

    // Balance and nonce are not re-read after this pause.
    if !config.settle_delay.is_zero() {
        debug!(delay_ms = config.settle_delay.as_millis() as u64, "Settling before submission...");
        sleep(config.settle_delay).await;
    }

    let tx_hash = submit_deployment(rpc, artifact, &prepared, attempt).await?;
    await_confirmation(rpc, tx_hash, config.confirmation_timeout).await
}
