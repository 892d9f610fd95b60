pub mod calibrate;
pub mod config;
pub mod cutoff;
pub mod info;
pub mod pearson;
pub mod ptc;
pub mod trend;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use maps_core::config::AnalysisConfig;
use maps_core::session::Session;

use crate::progress::BarReporter;

/// Read the analysis config, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid analysis config {}", path.display()))
}

/// Session that draws its progress on the terminal.
pub fn session(config: AnalysisConfig) -> Session {
    Session::new(config).with_reporter(Arc::new(BarReporter::default()))
}
