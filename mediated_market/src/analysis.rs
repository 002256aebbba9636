use crate::experiment::TrialOutcome;
use crate::round_to;
use serde::{Deserialize, Serialize};

/// Aggregate of all trials run at one sampling probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub probability: f64,
    pub completed_trials: usize,
    pub mean_best: f64,
    pub mean_realized: f64,
    pub mean_with_returned_stock: f64,
    pub std_realized: f64,
    pub std_with_returned_stock: f64,
    pub mean_sample_size: f64,
    /// mean(realized) / mean(best), 4 decimals
    pub realized_success_rate: f64,
    /// mean(with_returned_stock) / mean(best), 4 decimals
    pub returned_success_rate: f64,
}

impl StepSummary {
    pub fn from_outcomes(probability: f64, outcomes: &[TrialOutcome]) -> Self {
        let best: Vec<f64> = outcomes.iter().map(|o| o.best).collect();
        let realized: Vec<f64> = outcomes.iter().map(|o| o.realized).collect();
        let returned: Vec<f64> = outcomes.iter().map(|o| o.with_returned_stock).collect();
        let sample_sizes: Vec<f64> = outcomes.iter().map(|o| o.sample_size as f64).collect();

        let mean_best = mean(&best);
        let mean_realized = mean(&realized);
        let mean_with_returned_stock = mean(&returned);

        StepSummary {
            probability,
            completed_trials: outcomes.len(),
            mean_best,
            mean_realized,
            mean_with_returned_stock,
            std_realized: std_dev(&realized, mean_realized),
            std_with_returned_stock: std_dev(&returned, mean_with_returned_stock),
            mean_sample_size: mean(&sample_sizes),
            realized_success_rate: success_rate(mean_realized, mean_best),
            returned_success_rate: success_rate(mean_with_returned_stock, mean_best),
        }
    }
}

/// `achieved / best` rounded to 4 decimals, 0 when there was nothing to achieve
pub fn success_rate(achieved: f64, best: f64) -> f64 {
    if best == 0.0 {
        return 0.0;
    }
    round_to(achieved / best, 4)
}

/// Print the sweep as a fixed-width table
pub fn print_summary(name: &str, steps: &[StepSummary]) {
    println!("\n{}", name);
    println!(
        "{:>6} | {:>10} | {:>10} | {:>10} | {:>8} | {:>8} | {:>6}",
        "p", "Best", "Realized", "Returned", "SW/SW*", "W+SW/SW*", "Trials"
    );
    println!(
        "{:-<6}-+-{:-<10}-+-{:-<10}-+-{:-<10}-+-{:-<8}-+-{:-<8}-+-{:-<6}",
        "", "", "", "", "", "", ""
    );
    for step in steps {
        println!(
            "{:>6.3} | {:>10.2} | {:>10.2} | {:>10.2} | {:>8.4} | {:>8.4} | {:>6}",
            step.probability,
            step.mean_best,
            step.mean_realized,
            step.mean_with_returned_stock,
            step.realized_success_rate,
            step.returned_success_rate,
            step.completed_trials
        );
    }
}

/// Calculate mean of a slice
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate sample standard deviation
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
