//! Encode, inject, detect, correct, verify.
//!
//! [`BitFlipCode`] sequences circuit construction and sampling for the
//! 3-qubit repetition code. Detection votes on the most frequent outcome of
//! the noisy sample; correction appends an `X` on the qubit the vote blames
//! and the circuit is sampled again.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::bits::{BitTriple, Counts, CODE_QUBITS};
use super::majority::{majority_vote, MajorityVote};
use super::sampler::Sampler;
use crate::config::PipelineConfig;
use crate::error::{CodeError, CodeResult};
use crate::quantum::circuit::{CircuitBuilder, QuantumCircuit};
use crate::quantum::gate::StandardGate;
use crate::quantum::state::{Qubit, StateVector};
use crate::simulators::{Outcome, StatevectorSimulator};

/// The logical state prepared on qubit 0 before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalState {
    #[default]
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    /// `H|0⟩`
    #[serde(rename = "+")]
    Plus,
    /// `H X|0⟩`
    #[serde(rename = "-")]
    Minus,
}

impl LogicalState {
    pub fn qubit(&self) -> Qubit {
        match self {
            LogicalState::Zero => Qubit::zero(),
            LogicalState::One => Qubit::one(),
            LogicalState::Plus => Qubit::plus(),
            LogicalState::Minus => Qubit::minus(),
        }
    }

    /// Outcomes a faithful measurement of the encoded state can produce.
    pub fn expected_outcomes(&self) -> Vec<BitTriple> {
        match self {
            LogicalState::Zero => vec![BitTriple::uniform(Outcome::Zero)],
            LogicalState::One => vec![BitTriple::uniform(Outcome::One)],
            LogicalState::Plus | LogicalState::Minus => vec![
                BitTriple::uniform(Outcome::Zero),
                BitTriple::uniform(Outcome::One),
            ],
        }
    }

    fn prepare(&self, builder: &mut CircuitBuilder) -> CodeResult<()> {
        match self {
            LogicalState::Zero => {}
            LogicalState::One => {
                builder.x(0)?;
            }
            LogicalState::Plus => {
                builder.h(0)?;
            }
            LogicalState::Minus => {
                builder.x(0)?.h(0)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LogicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicalState::Zero => "0",
            LogicalState::One => "1",
            LogicalState::Plus => "+",
            LogicalState::Minus => "-",
        };
        f.write_str(s)
    }
}

impl FromStr for LogicalState {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(LogicalState::Zero),
            "1" => Ok(LogicalState::One),
            "+" | "plus" => Ok(LogicalState::Plus),
            "-" | "minus" => Ok(LogicalState::Minus),
            other => Err(CodeError::InvalidConfig(format!(
                "unknown logical state {:?}, expected one of 0, 1, +, -",
                other
            ))),
        }
    }
}

/// Which bit-flip errors to inject after encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorSpec {
    #[default]
    None,
    /// Flip one chosen qubit.
    On(usize),
    /// Flip a uniformly chosen qubit, with the configured error probability.
    Random,
    /// Flip several qubits. Two or more flips defeat the code.
    Multiple(Vec<usize>),
}

/// Prepare `state` on qubit 0 and copy it onto qubits 1 and 2.
pub fn encode_circuit(state: LogicalState) -> CodeResult<QuantumCircuit> {
    let mut builder = CircuitBuilder::new(CODE_QUBITS);
    state.prepare(&mut builder)?;
    builder.barrier("Init");
    builder.cnot(0, 1)?.cnot(0, 2)?;
    builder.barrier("Encode");
    Ok(builder.build())
}

/// Append a bit flip on `qubit`.
pub fn inject_error(circuit: &mut QuantumCircuit, qubit: usize) -> CodeResult<()> {
    circuit.add_gate(Box::new(StandardGate::X), &[qubit])?;
    circuit.barrier(format!("Error@q{}", qubit));
    Ok(())
}

/// Append the flip the vote calls for. Returns the corrected qubit, if any.
pub fn apply_correction(
    circuit: &mut QuantumCircuit,
    vote: &MajorityVote,
) -> CodeResult<Option<usize>> {
    match vote.error_position {
        Some(qubit) => {
            circuit.add_gate(Box::new(StandardGate::X), &[qubit])?;
            circuit.barrier(format!("Correct@q{}", qubit));
            Ok(Some(qubit))
        }
        None => Ok(None),
    }
}

/// Vote on the most frequent outcome of a sample.
pub fn detect(counts: &Counts) -> CodeResult<MajorityVote> {
    let (bits, _) = counts.most_common().ok_or(CodeError::NoMeasurements)?;
    Ok(majority_vote(bits))
}

/// Everything observed during one pass through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub initial_state: LogicalState,
    pub injected_errors: Vec<usize>,
    pub noisy_counts: Counts,
    pub syndrome: MajorityVote,
    pub corrected_qubit: Option<usize>,
    pub corrected_counts: Counts,
    pub expected_outcomes: Vec<BitTriple>,
    /// Fraction of corrected shots that landed on an expected outcome.
    pub success_rate: f64,
    /// Text diagram of the final circuit.
    pub circuit: String,
}

impl PipelineReport {
    /// Every corrected shot matched the logical state.
    pub fn is_restored(&self) -> bool {
        let expected: usize = self
            .expected_outcomes
            .iter()
            .map(|bits| self.corrected_counts.get(bits))
            .sum();
        expected == self.corrected_counts.total()
    }
}

/// Statevectors at each stage of the pipeline, without sampling.
#[derive(Debug, Clone)]
pub struct StateTrace {
    pub initial_state: LogicalState,
    pub encoded: StateVector,
    pub with_error: StateVector,
    pub corrected: StateVector,
    pub corrected_qubit: Option<usize>,
    /// Fidelity of the encoded state to α|000⟩ + β|111⟩.
    pub encoding_fidelity: f64,
    /// Fidelity of the corrected state to the encoded state.
    pub recovery_fidelity: f64,
}

/// The 3-qubit bit-flip code driven through a [`Sampler`].
pub struct BitFlipCode<S = StatevectorSimulator> {
    sampler: S,
    config: PipelineConfig,
    rng: StdRng,
}

impl BitFlipCode<StatevectorSimulator> {
    /// A code backed by the statevector simulator, seeded from the config.
    pub fn new(config: PipelineConfig) -> CodeResult<Self> {
        let simulator = match config.seed {
            Some(seed) => StatevectorSimulator::with_seed(CODE_QUBITS, seed),
            None => StatevectorSimulator::new(CODE_QUBITS),
        };
        Self::with_sampler(simulator, config)
    }
}

impl<S: Sampler> BitFlipCode<S> {
    pub fn with_sampler(sampler: S, config: PipelineConfig) -> CodeResult<Self> {
        config.validate()?;
        // Offset so error selection does not mirror the simulator's draws
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        Ok(BitFlipCode {
            sampler,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Turn an error spec into concrete qubit indices.
    pub fn resolve_errors(&mut self, spec: &ErrorSpec) -> CodeResult<Vec<usize>> {
        let qubits = match spec {
            ErrorSpec::None => Vec::new(),
            ErrorSpec::On(qubit) => vec![*qubit],
            ErrorSpec::Multiple(qubits) => qubits.clone(),
            ErrorSpec::Random => {
                if self.rng.gen::<f64>() < self.config.error_probability {
                    vec![self.rng.gen_range(0..CODE_QUBITS)]
                } else {
                    Vec::new()
                }
            }
        };

        if let Some(&qubit) = qubits.iter().find(|&&q| q >= CODE_QUBITS) {
            return Err(CodeError::QubitOutOfRange {
                qubit,
                qubit_count: CODE_QUBITS,
            });
        }

        Ok(qubits)
    }

    /// Sample `circuit` for the configured number of shots.
    pub fn sample(&mut self, circuit: &QuantumCircuit) -> CodeResult<Counts> {
        self.sampler.sample(circuit, self.config.shots)
    }

    /// Run the pipeline on the configured initial state.
    pub fn run(&mut self, spec: &ErrorSpec) -> CodeResult<PipelineReport> {
        self.run_with(self.config.initial_state, spec)
    }

    /// Run the pipeline on `state`.
    pub fn run_with(
        &mut self,
        state: LogicalState,
        spec: &ErrorSpec,
    ) -> CodeResult<PipelineReport> {
        let mut circuit = encode_circuit(state)?;
        debug!(%state, "encoded logical state");

        let injected_errors = self.resolve_errors(spec)?;
        for &qubit in &injected_errors {
            inject_error(&mut circuit, qubit)?;
        }
        debug!(errors = ?injected_errors, "injected bit flips");

        let noisy_counts = self.sample(&circuit)?;
        let syndrome = detect(&noisy_counts)?;
        debug!(?syndrome, "syndrome measured");

        let corrected_qubit = apply_correction(&mut circuit, &syndrome)?;
        let corrected_counts = self.sample(&circuit)?;

        let expected_outcomes = state.expected_outcomes();
        let hits: usize = expected_outcomes.iter().map(|bits| corrected_counts.get(bits)).sum();
        let success_rate = hits as f64 / corrected_counts.total().max(1) as f64;

        info!(
            %state,
            errors = ?injected_errors,
            corrected = ?corrected_qubit,
            success_rate,
            "pipeline finished"
        );

        Ok(PipelineReport {
            initial_state: state,
            injected_errors,
            noisy_counts,
            syndrome,
            corrected_qubit,
            corrected_counts,
            expected_outcomes,
            success_rate,
            circuit: circuit.draw(),
        })
    }

    /// Follow the statevector through encoding, error and correction.
    ///
    /// The syndrome is read from the most probable basis state of the noisy
    /// statevector.
    pub fn statevector_trace(&mut self, spec: &ErrorSpec) -> CodeResult<StateTrace> {
        let state = self.config.initial_state;
        let zero = StateVector::zero_state(CODE_QUBITS);

        let mut circuit = encode_circuit(state)?;
        let encoded = circuit.apply(&zero)?;

        for qubit in self.resolve_errors(spec)? {
            inject_error(&mut circuit, qubit)?;
        }
        let with_error = circuit.apply(&zero)?;

        let (label, _) = with_error
            .amplitude_map()
            .into_iter()
            .max_by(|a, b| a.1.norm_sqr().total_cmp(&b.1.norm_sqr()))
            .ok_or(CodeError::NotNormalized)?;
        let syndrome = majority_vote(label.parse()?);

        let corrected_qubit = apply_correction(&mut circuit, &syndrome)?;
        let corrected = circuit.apply(&zero)?;

        let ideal = StateVector::repetition_encoded(&state.qubit(), CODE_QUBITS);

        Ok(StateTrace {
            initial_state: state,
            encoding_fidelity: ideal.fidelity(&encoded)?,
            recovery_fidelity: encoded.fidelity(&corrected)?,
            encoded,
            with_error,
            corrected,
            corrected_qubit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_state_round_trips_through_text() {
        for state in [
            LogicalState::Zero,
            LogicalState::One,
            LogicalState::Plus,
            LogicalState::Minus,
        ] {
            assert_eq!(state.to_string().parse::<LogicalState>().unwrap(), state);
        }
        assert!("2".parse::<LogicalState>().is_err());
    }

    #[test]
    fn test_encode_circuit_stages() {
        let circuit = encode_circuit(LogicalState::Minus).unwrap();
        assert_eq!(circuit.gate_count(), 4);
        assert_eq!(circuit.stage_labels(), vec!["Init", "Encode"]);
    }

    #[test]
    fn test_detect_on_empty_counts() {
        assert!(matches!(detect(&Counts::new()), Err(CodeError::NoMeasurements)));
    }

    #[test]
    fn test_random_error_respects_zero_probability() {
        let config = PipelineConfig::default().with_seed(3).with_error_probability(0.0);
        let mut code = BitFlipCode::new(config).unwrap();
        for _ in 0..20 {
            assert!(code.resolve_errors(&ErrorSpec::Random).unwrap().is_empty());
        }
    }

    #[test]
    fn test_random_error_always_fires_at_probability_one() {
        let mut code = BitFlipCode::new(PipelineConfig::default().with_seed(5)).unwrap();
        for _ in 0..20 {
            let errors = code.resolve_errors(&ErrorSpec::Random).unwrap();
            assert_eq!(errors.len(), 1);
            assert!(errors[0] < CODE_QUBITS);
        }
    }

    #[test]
    fn test_out_of_range_error_qubit() {
        let mut code = BitFlipCode::new(PipelineConfig::default().with_seed(1)).unwrap();
        assert!(matches!(
            code.run(&ErrorSpec::On(3)),
            Err(CodeError::QubitOutOfRange { qubit: 3, .. })
        ));
    }
}
