// deployer/src/artifact.rs

use ethers::{abi::Abi, types::Bytes};
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

/// Compiled contract: interface description plus creation bytecode.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub abi: Abi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
struct RawArtifact {
    abi: Abi,
    bytecode: RawBytecode,
}

// Plain hex string, or Foundry/Hardhat style `{ "object": "0x..." }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

/// Reads and validates a contract artifact from a JSON file.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<ContractArtifact> {
    let path_ref = path.as_ref();
    info!(path = ?path_ref, "Loading contract artifact...");
    let json = fs::read_to_string(path_ref)
        .wrap_err_with(|| format!("Failed to read artifact file: {:?}", path_ref))?;
    let artifact = parse_artifact(&json)
        .wrap_err_with(|| format!("Invalid artifact file: {:?}", path_ref))?;
    info!(code_bytes = artifact.bytecode.len(), "Artifact loaded.");
    Ok(artifact)
}

pub fn parse_artifact(json: &str) -> Result<ContractArtifact> {
    let raw: RawArtifact = serde_json::from_str(json).wrap_err("Failed to parse artifact JSON")?;

    let bytecode_hex = match raw.bytecode {
        RawBytecode::Hex(s) => s,
        RawBytecode::Object { object } => object,
    };
    let cleaned_bytecode_hex = bytecode_hex.trim().trim_start_matches("0x");
    if cleaned_bytecode_hex.is_empty() {
        return Err(eyre!("Artifact bytecode is empty (abstract contract or interface?)"));
    }
    let bytecode = hex::decode(cleaned_bytecode_hex).wrap_err("Failed to decode hex bytecode")?;

    if let Some(constructor) = raw.abi.constructor() {
        if !constructor.inputs.is_empty() {
            return Err(eyre!(
                "Constructor takes {} argument(s); only argument-less constructors can be deployed",
                constructor.inputs.len()
            ));
        }
    }

    Ok(ContractArtifact { abi: raw.abi, bytecode: Bytes::from(bytecode) })
}
