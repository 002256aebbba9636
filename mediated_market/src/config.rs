//! Experiment configuration
//!
//! Loaded from TOML; every field has a default so a file only needs the
//! values it changes:
//!
//! ```toml
//! [experiment]
//! name = "baseline"
//! num_pairs = 200
//! max_value = 10000.0
//! trials_per_step = 100
//! probability_step = 0.01
//! base_seed = 42
//!
//! [output]
//! directory = "results"
//! save_csv = true
//! save_json = true
//! ```

use crate::error::{ExperimentError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub experiment: SweepParams,
    pub output: OutputSettings,
}

/// What to simulate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepParams {
    pub name: String,
    /// Seller/buyer pairs per generated market
    pub num_pairs: usize,
    /// Valuations are drawn from [0, max_value]
    pub max_value: f64,
    /// Independent markets per sampling probability
    pub trials_per_step: usize,
    /// Spacing of the sampling-probability grid over [0, 1]
    pub probability_step: f64,
    pub base_seed: u64,
    /// Worker threads; None uses rayon's global pool
    pub num_threads: Option<usize>,
}

impl Default for SweepParams {
    fn default() -> Self {
        SweepParams {
            name: "baseline".to_string(),
            num_pairs: 200,
            max_value: 10000.0,
            trials_per_step: 100,
            probability_step: 0.01,
            base_seed: 42,
            num_threads: None,
        }
    }
}

/// Where results go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub save_csv: bool,
    pub save_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: PathBuf::from("results"),
            save_csv: true,
            save_json: true,
        }
    }
}

impl ExperimentConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ExperimentConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let params = &self.experiment;
        if !params.max_value.is_finite() || params.max_value <= 0.0 {
            return Err(ExperimentError::InvalidConfig(format!(
                "max_value must be positive, got {}",
                params.max_value
            )));
        }
        if params.trials_per_step == 0 {
            return Err(ExperimentError::InvalidConfig(
                "trials_per_step must be at least 1".to_string(),
            ));
        }
        if !(params.probability_step > 0.0 && params.probability_step <= 1.0) {
            return Err(ExperimentError::InvalidConfig(format!(
                "probability_step must lie in (0, 1], got {}",
                params.probability_step
            )));
        }
        if params.num_threads == Some(0) {
            return Err(ExperimentError::InvalidConfig(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory for this experiment's files: `<output.directory>/<name>`
    pub fn run_directory(&self) -> PathBuf {
        self.output.directory.join(&self.experiment.name)
    }
}
