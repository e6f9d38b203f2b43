//! Pipeline configuration.
//!
//! Loaded from JSON or built in code; command-line flags override file values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::correction::pipeline::LogicalState;
use crate::error::{CodeError, CodeResult};

/// Settings shared by every run of a [`BitFlipCode`](crate::correction::BitFlipCode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Logical state prepared on qubit 0 before encoding.
    pub initial_state: LogicalState,
    /// Shots per sampling step.
    pub shots: usize,
    /// Seed for the simulator and error selection; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Chance that a random error is actually injected.
    pub error_probability: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            initial_state: LogicalState::Zero,
            shots: 1000,
            seed: None,
            error_probability: 1.0,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> CodeResult<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CodeResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn with_initial_state(mut self, state: LogicalState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_error_probability(mut self, probability: f64) -> Self {
        self.error_probability = probability;
        self
    }

    pub fn validate(&self) -> CodeResult<()> {
        if self.shots == 0 {
            return Err(CodeError::InvalidConfig("shots must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.error_probability) {
            return Err(CodeError::InvalidConfig(format!(
                "error_probability must lie in [0, 1], got {}",
                self.error_probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_shots_and_bad_probability() {
        assert!(PipelineConfig::default().with_shots(0).validate().is_err());
        assert!(PipelineConfig::default().with_error_probability(1.5).validate().is_err());
        assert!(PipelineConfig::default().with_error_probability(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config =
            PipelineConfig::from_json_str(r#"{"initial_state": "+", "shots": 64}"#).unwrap();
        assert_eq!(config.initial_state, LogicalState::Plus);
        assert_eq!(config.shots, 64);
        assert_eq!(config.seed, None);
        assert_eq!(config.error_probability, 1.0);
    }

    #[test]
    fn test_invalid_json_values_are_rejected() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"shots": 0}"#),
            Err(CodeError::InvalidConfig(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"initial_state": "2"}"#),
            Err(CodeError::Json(_))
        ));
    }
}
