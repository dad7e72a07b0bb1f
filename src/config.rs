use crate::adapter::AllocationCheck;
use crate::model::{BidderCounts, SolverConfig};
use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::error;

pub const DEFAULT_MEAN_BUNDLE_SIZE: f64 = 49.0;
pub const DEFAULT_STD_DEV_BUNDLE_SIZE: f64 = 24.5;

/// Bundle-size distribution for random bid sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub mean_bundle_size: f64,
    pub std_dev_bundle_size: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            mean_bundle_size: DEFAULT_MEAN_BUNDLE_SIZE,
            std_dev_bundle_size: DEFAULT_STD_DEV_BUNDLE_SIZE,
        }
    }
}

/// How to launch an out-of-process model worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: "mrvm-worker".to_string(),
            args: Vec::new(),
            working_dir: None,
        }
    }
}

/// Everything needed to open one model session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed for world and population generation; absent means self-seeding
    pub seed: Option<u64>,
    pub bidders: BidderCounts,
    pub sampler: SamplerConfig,
    pub solver: SolverConfig,
    pub allocation_check: AllocationCheck,
    pub worker: WorkerConfig,
}

/// Evaluate a pkl module to JSON with the `pkl` CLI and deserialize it
pub fn load_pkl<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    let output = Command::new("pkl")
        .args(["eval", "-f", "json"])
        .arg(config_path)
        .output()
        .context("Failed to execute pkl command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("pkl could not evaluate {}: {}", config_path.display(), stderr);
        return Err(anyhow!(
            "pkl could not evaluate {}: {}",
            config_path.display(),
            stderr.trim()
        ));
    }

    parse_session_json(&String::from_utf8_lossy(&output.stdout), config_path)
}

pub fn load_json<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    let json_str = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    parse_session_json(&json_str, config_path)
}

fn parse_session_json<T: DeserializeOwned>(json_str: &str, origin: &Path) -> Result<T> {
    serde_json::from_str(json_str)
        .with_context(|| format!("Failed to parse config json from {}", origin.display()))
}

/// Load a config by extension: `.pkl` goes through the pkl CLI, anything else is read as JSON
pub fn load_config<T: DeserializeOwned>(config_path: impl AsRef<Path>) -> Result<T> {
    let config_path = config_path.as_ref();
    match config_path.extension().and_then(|e| e.to_str()) {
        Some("pkl") => load_pkl(config_path),
        _ => load_json(config_path),
    }
}
