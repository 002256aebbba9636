//! Export of sweep results for external plotting
//!
//! `success_rates.csv` holds one row per sampling probability; `summary.json`
//! adds the configuration and run metadata needed to reproduce it.

use crate::analysis::StepSummary;
use crate::config::SweepParams;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level container for sweep output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutput {
    pub metadata: SweepMetadata,
    pub steps: Vec<StepSummary>,
}

/// Metadata for reproducibility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepMetadata {
    pub params: SweepParams,
    pub timestamp: String,
    pub elapsed_seconds: f64,
}

/// CSV row; column names are the plotting contract
#[derive(Debug, Serialize)]
struct SuccessRateRow {
    probability: f64,
    mean_best: f64,
    mean_realized: f64,
    mean_with_returned_stock: f64,
    std_realized: f64,
    std_with_returned_stock: f64,
    realized_success_rate: f64,
    returned_success_rate: f64,
    completed_trials: usize,
}

impl From<&StepSummary> for SuccessRateRow {
    fn from(step: &StepSummary) -> Self {
        SuccessRateRow {
            probability: step.probability,
            mean_best: step.mean_best,
            mean_realized: step.mean_realized,
            mean_with_returned_stock: step.mean_with_returned_stock,
            std_realized: step.std_realized,
            std_with_returned_stock: step.std_with_returned_stock,
            realized_success_rate: step.realized_success_rate,
            returned_success_rate: step.returned_success_rate,
            completed_trials: step.completed_trials,
        }
    }
}

impl SweepOutput {
    pub fn new(params: SweepParams, steps: Vec<StepSummary>, elapsed_seconds: f64) -> Self {
        SweepOutput {
            metadata: SweepMetadata {
                params,
                timestamp: chrono::Utc::now().to_rfc3339(),
                elapsed_seconds,
            },
            steps,
        }
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for step in &self.steps {
            wtr.serialize(SuccessRateRow::from(step))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write the requested files into `dir`, creating it if needed
    pub fn write_all<P: AsRef<Path>>(&self, dir: P, csv: bool, json: bool) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        if csv {
            self.write_csv(dir.join("success_rates.csv"))?;
        }
        if json {
            self.write_json(dir.join("summary.json"))?;
        }

        Ok(())
    }
}
