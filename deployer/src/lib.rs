// deployer/src/lib.rs
// Library interface for the guarded contract deployer.

pub mod artifact;
pub mod attempt;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gas;
pub mod guard;
pub mod pipeline;
pub mod rpc;
pub mod submitter;
pub mod tracker;
pub mod verifier;

// Public types re-exported for the binary and integration tests
pub use artifact::{load_artifact, ContractArtifact};
pub use attempt::{DeploymentAttempt, DeploymentOutcome, PreparedDeployment};
pub use config::{load_config, Config, DeployConfig, GasPolicy, NetworkIdentity};
pub use diagnostics::DiagnosticReport;
pub use error::{BoxError, DeployError, FailureKind};
pub use gas::GasPlan;
pub use pipeline::{deploy, prepare, DeploymentFailure};
pub use rpc::{DeploymentRpc, EthersRpc, LatestBlock};
