//! Application layer: scenario files, reports and config loading around the
//! `ganadero_core` engines.

pub mod report;
pub mod scenario;

pub use ganadero_core as core;
pub use ganadero_data as data;

use anyhow::Context;
use ganadero_core::config::EngineConfig;
use std::path::Path;

/// Loads model parameters from `path`, or defaults when the file does not exist.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<EngineConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(EngineConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    EngineConfig::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
}
