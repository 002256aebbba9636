use crate::analysis::StepSummary;
use crate::config::SweepParams;
use crate::error::{ExperimentError, Result};
use crate::generator::create_market;
use crate::mediator::Mediator;
use crate::sampler::break_market;
use crate::social_value::{better_social_value, max_social_value, true_social_value};
use crate::valuation::{SeededSource, ValuationSource};
use crate::{round_to, MarketError};
use serde::{Deserialize, Serialize};
use trials::{simple_progress_reporter, TrialRunner};

/// Scores of one generate → sample → clear round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Offline optimum of the ready market
    pub best: f64,
    /// Social value after clearing
    pub realized: f64,
    /// Social value after clearing with unsold stock returned
    pub with_returned_stock: f64,
    /// Pairs diverted to the sample
    pub sample_size: usize,
}

/// Run one full trial on a fresh market
///
/// The sample only sets the mediator's starting thresholds; it is excluded
/// from clearing and from every score.
pub fn run_trial<S>(
    source: &mut S,
    num_pairs: usize,
    max_value: f64,
    probability: f64,
) -> std::result::Result<TrialOutcome, MarketError>
where
    S: ValuationSource + ?Sized,
{
    let market = create_market(source, num_pairs, max_value)?;
    let (sample, ready) = break_market(source, &market, probability)?;

    let mut mediator = Mediator::from_sample(&sample, max_value);
    let clearing = mediator.clear(&ready);

    Ok(TrialOutcome {
        best: max_social_value(&ready),
        realized: true_social_value(&clearing.market),
        with_returned_stock: better_social_value(&clearing.market, &clearing.stock),
        sample_size: sample.len(),
    })
}

/// Sampling probabilities `0, step, 2*step, ...` up to 1
///
/// Points are computed from their index, capped at 1 and rounded to 3
/// decimals, so accumulated floating-point drift never pushes the last point
/// past 1.
pub fn probability_grid(step: f64) -> std::result::Result<Vec<f64>, MarketError> {
    if !(step > 0.0 && step <= 1.0) {
        return Err(MarketError::InvalidProbability(step));
    }
    // tolerance keeps 1/0.01 from flooring to 99
    let points = (1.0 / step + 1e-9).floor() as usize + 1;
    Ok((0..points)
        .map(|i| round_to((i as f64 * step).min(1.0), 3))
        .collect())
}

/// Seed for trial `trial` of grid point `step_index`
///
/// Arithmetic wraps in `u64`, so any parameters give a seed.
pub fn trial_seed(base_seed: u64, step_index: usize, trials_per_step: usize, trial: usize) -> u64 {
    (step_index as u64)
        .wrapping_mul(trials_per_step as u64)
        .wrapping_add(trial as u64)
        .wrapping_add(base_seed)
}

/// Run the full sweep, one `StepSummary` per grid point
///
/// Every trial of every step goes through a single parallel batch. Trials
/// that panic are logged and left out of their step's aggregate; an invalid
/// market parameter aborts the sweep.
pub fn run_sweep(params: &SweepParams) -> Result<Vec<StepSummary>> {
    let grid = probability_grid(params.probability_step)?;
    let per_step = params.trials_per_step;
    let total = grid.len().checked_mul(per_step).ok_or_else(|| {
        ExperimentError::InvalidConfig(format!(
            "{} steps of {} trials overflow the trial count",
            grid.len(),
            per_step
        ))
    })?;

    let mut runner = TrialRunner::new(total, |trial_id| {
        let (step_index, trial) = (trial_id / per_step, trial_id % per_step);
        let seed = trial_seed(params.base_seed, step_index, per_step, trial);
        let mut source = SeededSource::new(seed);
        run_trial(&mut source, params.num_pairs, params.max_value, grid[step_index])
    })
    .progress(simple_progress_reporter(per_step.saturating_mul(10)));
    if let Some(n) = params.num_threads {
        runner = runner.num_threads(n);
    }
    let results = runner.run();

    let mut summaries = Vec::with_capacity(grid.len());
    for (&probability, step_results) in grid.iter().zip(results.chunks(per_step.max(1))) {
        let mut outcomes = Vec::with_capacity(per_step);
        for (trial, result) in step_results.iter().enumerate() {
            match result {
                Ok(Ok(outcome)) => outcomes.push(*outcome),
                Ok(Err(e)) => return Err(ExperimentError::Market(e.clone())),
                Err(panic) => {
                    tracing::warn!(probability, trial, "skipping failed trial: {}", panic)
                }
            }
        }

        if outcomes.len() < per_step {
            tracing::warn!(
                probability,
                "{}/{} trials failed",
                per_step - outcomes.len(),
                per_step
            );
        }

        let summary = StepSummary::from_outcomes(probability, &outcomes);
        tracing::debug!(
            probability,
            realized = summary.realized_success_rate,
            returned = summary.returned_success_rate,
            "step complete"
        );
        summaries.push(summary);
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::ScriptedSource;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_probability_grid_hundredths() {
        let grid = probability_grid(0.01).unwrap();
        assert_eq!(grid.len(), 101);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[27], 0.27);
        assert_eq!(grid[100], 1.0);
    }

    #[test]
    fn test_probability_grid_uneven_step() {
        let grid = probability_grid(0.3).unwrap();
        assert_eq!(grid, vec![0.0, 0.3, 0.6, 0.9]);
    }

    #[test]
    fn test_probability_grid_single_step() {
        assert_eq!(probability_grid(1.0).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_probability_grid_rejects_bad_step() {
        assert!(probability_grid(0.0).is_err());
        assert!(probability_grid(-0.1).is_err());
        assert!(probability_grid(1.1).is_err());
    }

    #[test]
    fn test_trial_seeds_are_distinct_across_steps() {
        let a = trial_seed(42, 0, 10, 9);
        let b = trial_seed(42, 1, 10, 0);
        assert_eq!(a + 1, b);
    }

    #[test]
    fn test_trial_seed_wraps_instead_of_overflowing() {
        let seed = trial_seed(u64::MAX, usize::MAX, usize::MAX, usize::MAX);
        let expected = (usize::MAX as u64)
            .wrapping_mul(usize::MAX as u64)
            .wrapping_add(usize::MAX as u64)
            .wrapping_add(u64::MAX);
        assert_eq!(seed, expected);
        assert_eq!(trial_seed(u64::MAX, 0, 10, 1), 0);
    }

    #[test]
    fn test_run_trial_scripted() {
        // buyers 60, 1; sellers 5, 50; both pairs go to the ready market
        let mut source = ScriptedSource::new(vec![0.6, 0.01, 0.05, 0.5, 0.9, 0.9]);
        let outcome = run_trial(&mut source, 2, 100.0, 0.5).unwrap();

        // empty sample: thresholds start at 50/50 with zero weight
        // pair 0: 5 <= 50 bought, 60 >= 50 sold; pS=5, pB=60
        // pair 1: 50 > 5 kept, 1 < 60 not served
        assert_eq!(outcome.sample_size, 0);
        assert_abs_diff_eq!(outcome.best, 110.0);
        assert_abs_diff_eq!(outcome.realized, 110.0);
        assert_abs_diff_eq!(outcome.with_returned_stock, 110.0);
    }

    #[test]
    fn test_run_trial_everything_sampled() {
        let mut source = SeededSource::new(9);
        let outcome = run_trial(&mut source, 30, 1000.0, 1.0).unwrap();
        assert_eq!(outcome.sample_size, 30);
        assert_eq!(outcome.best, 0.0);
        assert_eq!(outcome.realized, 0.0);
    }

    #[test]
    fn test_run_trial_propagates_invalid_input() {
        let mut source = SeededSource::new(9);
        assert_eq!(
            run_trial(&mut source, 10, 1000.0, 1.2),
            Err(MarketError::InvalidProbability(1.2))
        );
        assert_eq!(
            run_trial(&mut source, 10, 0.0, 0.5),
            Err(MarketError::InvalidMaxValue(0.0))
        );
    }

    #[test]
    fn test_run_sweep_small() {
        let params = SweepParams {
            name: "test".to_string(),
            num_pairs: 20,
            max_value: 100.0,
            trials_per_step: 5,
            probability_step: 0.25,
            base_seed: 1,
            num_threads: Some(2),
        };

        let steps = run_sweep(&params).unwrap();
        assert_eq!(steps.len(), 5);
        for step in &steps {
            assert_eq!(step.completed_trials, 5);
            assert!(step.realized_success_rate <= step.returned_success_rate + 1e-9);
            assert!(step.returned_success_rate <= 1.0 + 1e-9);
        }
        // at p=1 nothing is left to clear
        assert_eq!(steps[4].mean_best, 0.0);
        assert_eq!(steps[4].realized_success_rate, 0.0);
    }

    #[test]
    fn test_run_sweep_step_matches_seeded_trials() {
        let params = SweepParams {
            num_pairs: 12,
            max_value: 500.0,
            trials_per_step: 3,
            probability_step: 0.5,
            base_seed: 7,
            num_threads: Some(3),
            ..SweepParams::default()
        };
        let steps = run_sweep(&params).unwrap();

        let outcomes: Vec<TrialOutcome> = (0..3)
            .map(|trial| {
                let mut source = SeededSource::new(trial_seed(7, 1, 3, trial));
                run_trial(&mut source, 12, 500.0, 0.5).unwrap()
            })
            .collect();
        assert_eq!(steps[1], StepSummary::from_outcomes(0.5, &outcomes));
    }

    #[test]
    fn test_run_sweep_rejects_overflowing_trial_count() {
        let params = SweepParams {
            trials_per_step: usize::MAX,
            probability_step: 0.5,
            ..SweepParams::default()
        };
        assert!(matches!(
            run_sweep(&params),
            Err(ExperimentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_sweep_is_deterministic() {
        let params = SweepParams {
            num_pairs: 15,
            trials_per_step: 4,
            probability_step: 0.5,
            ..SweepParams::default()
        };
        assert_eq!(run_sweep(&params).unwrap(), run_sweep(&params).unwrap());
    }
}
