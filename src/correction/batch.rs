//! Repeated randomized pipeline runs.

use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::info;

use super::pipeline::{BitFlipCode, ErrorSpec, LogicalState};
use super::sampler::Sampler;
use crate::error::{CodeError, CodeResult};

/// Success rate at or above which a run counts as near-perfect.
pub const NEAR_PERFECT: f64 = 0.95;

const BATCH_STATES: [LogicalState; 2] = [LogicalState::Zero, LogicalState::One];
const BATCH_ERRORS: [Option<usize>; 4] = [Some(0), Some(1), Some(2), None];

/// One run of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRun {
    pub initial_state: LogicalState,
    pub error_qubit: Option<usize>,
    pub success_rate: f64,
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub runs: Vec<BatchRun>,
    /// Runs where every corrected shot was right.
    pub perfect: usize,
    /// Runs below perfect but at or above [`NEAR_PERFECT`].
    pub near_perfect: usize,
    pub failed: usize,
    pub mean_success_rate: f64,
    pub min_success_rate: f64,
    pub max_success_rate: f64,
}

impl BatchSummary {
    fn from_runs(runs: Vec<BatchRun>) -> Self {
        let rates: Vec<f64> = runs.iter().map(|r| r.success_rate).collect();

        let perfect = rates.iter().filter(|&&r| r >= 1.0).count();
        let near_perfect = rates.iter().filter(|&&r| (NEAR_PERFECT..1.0).contains(&r)).count();

        BatchSummary {
            perfect,
            near_perfect,
            failed: runs.len() - perfect - near_perfect,
            mean_success_rate: rates.iter().sum::<f64>() / rates.len().max(1) as f64,
            min_success_rate: rates.iter().copied().fold(f64::INFINITY, f64::min),
            max_success_rate: rates.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            runs,
        }
    }
}

impl<S: Sampler> BitFlipCode<S> {
    /// Run the pipeline `runs` times with a random basis state and a random
    /// single error (or none).
    pub fn run_batch(&mut self, runs: usize) -> CodeResult<BatchSummary> {
        if runs == 0 {
            return Err(CodeError::InvalidConfig("a batch needs at least one run".to_string()));
        }

        let mut results = Vec::with_capacity(runs);
        for _ in 0..runs {
            let (state, error_qubit) = self.draw_batch_case();
            let spec = error_qubit.map_or(ErrorSpec::None, ErrorSpec::On);
            let report = self.run_with(state, &spec)?;

            results.push(BatchRun {
                initial_state: state,
                error_qubit,
                success_rate: report.success_rate,
            });
        }

        let summary = BatchSummary::from_runs(results);
        info!(
            runs,
            perfect = summary.perfect,
            failed = summary.failed,
            mean = summary.mean_success_rate,
            "batch finished"
        );
        Ok(summary)
    }

    fn draw_batch_case(&mut self) -> (LogicalState, Option<usize>) {
        let rng = self.rng_mut();
        let state = *BATCH_STATES.choose(rng).unwrap_or(&LogicalState::Zero);
        let error = *BATCH_ERRORS.choose(rng).unwrap_or(&None);
        (state, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rate: f64) -> BatchRun {
        BatchRun {
            initial_state: LogicalState::Zero,
            error_qubit: None,
            success_rate: rate,
        }
    }

    #[test]
    fn test_summary_buckets() {
        let summary = BatchSummary::from_runs(vec![run(1.0), run(0.97), run(0.5), run(1.0)]);
        assert_eq!(summary.perfect, 2);
        assert_eq!(summary.near_perfect, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.min_success_rate, 0.5);
        assert_eq!(summary.max_success_rate, 1.0);
        assert!((summary.mean_success_rate - 0.8675).abs() < 1e-12);
    }
}
