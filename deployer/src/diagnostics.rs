// deployer/src/diagnostics.rs
// Human-readable and JSON failure reports.

use crate::attempt::DeploymentAttempt;
use crate::error::{DeployError, FailureKind};
use crate::gas::GasPlan;
use ethers::{
    types::{Address, TxHash, U256},
    utils::{format_units, to_checksum},
};
use serde::Serialize;
use std::{error::Error as StdError, fmt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub kind: FailureKind,
    pub account: Address,
    pub balance: Option<U256>,
    pub nonce: Option<U256>,
    pub plan: Option<GasPlan>,
    pub estimated_cost: Option<U256>,
    pub tx_hash: Option<TxHash>,
    /// Outermost error first, root cause last.
    pub causes: Vec<String>,
}

impl DiagnosticReport {
    pub fn new(error: &DeployError, attempt: &DeploymentAttempt) -> Self {
        Self {
            kind: error.kind(),
            account: attempt.account,
            balance: attempt.balance,
            nonce: attempt.nonce,
            plan: attempt.plan,
            estimated_cost: attempt.plan.map(|p| p.max_cost()),
            tx_hash: attempt.submitted_hash,
            causes: cause_chain(error),
        }
    }

    pub fn root_cause(&self) -> Option<&str> {
        self.causes.last().map(String::as_str)
    }
}

/// Display strings for `error` and every `source()` below it.
pub fn cause_chain(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut causes = vec![error.to_string()];
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes
}

fn wei_with_unit(value: U256, unit: &str) -> String {
    match format_units(value, unit) {
        Ok(formatted) => format!("{formatted} {unit} ({value} wei)"),
        Err(_) => format!("{value} wei"),
    }
}

fn or_unknown<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| "unknown".to_string())
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "❌ Deployment failed: {}", self.kind)?;
        writeln!(f, "  account:        {}", to_checksum(&self.account, None))?;
        writeln!(f, "  balance:        {}", or_unknown(self.balance, |b| wei_with_unit(b, "ether")))?;
        writeln!(f, "  nonce:          {}", or_unknown(self.nonce, |n| n.to_string()))?;
        writeln!(f, "  gas price:      {}", or_unknown(self.plan, |p| wei_with_unit(p.price, "gwei")))?;
        writeln!(f, "  gas limit:      {}", or_unknown(self.plan, |p| p.limit.to_string()))?;
        writeln!(
            f,
            "  estimated cost: {}",
            or_unknown(self.estimated_cost, |c| wei_with_unit(c, "ether"))
        )?;
        match self.tx_hash {
            Some(hash) => writeln!(f, "  tx hash:        {hash:?}")?,
            None => writeln!(f, "  tx hash:        not submitted")?,
        }
        writeln!(f, "  cause chain:")?;
        for (depth, cause) in self.causes.iter().enumerate() {
            writeln!(f, "    {depth}: {cause}")?;
        }
        if let Some(root) = self.root_cause() {
            write!(f, "  root cause: {root}")?;
        }
        Ok(())
    }
}
