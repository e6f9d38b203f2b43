//! Statevector simulator
//!
//! Runs circuits on a dense state vector and samples computational-basis
//! measurements. Outcome maps are ordered so a seeded simulator replays the
//! same shots.
use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array1;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{CodeError, CodeResult};
use crate::quantum::circuit::QuantumCircuit;
use crate::quantum::gate::QuantumGate;
use crate::quantum::state::{QuantumState, StateVector, AMPLITUDE_EPSILON};

/// A measurement outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    /// Measurement yielded 0
    Zero,
    /// Measurement yielded 1
    One,
}

impl Outcome {
    /// The other outcome
    pub fn flipped(self) -> Self {
        match self {
            Outcome::Zero => Outcome::One,
            Outcome::One => Outcome::Zero,
        }
    }

    pub fn from_bit(bit: usize) -> Self {
        if bit == 0 {
            Outcome::Zero
        } else {
            Outcome::One
        }
    }

    pub fn as_bit(self) -> usize {
        match self {
            Outcome::Zero => 0,
            Outcome::One => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Zero => write!(f, "0"),
            Outcome::One => write!(f, "1"),
        }
    }
}

/// An outcome of measuring multiple qubits
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOutcome {
    /// The outcomes for each measured qubit
    pub outcomes: Vec<Outcome>,
    /// The probability of this outcome
    pub probability: f64,
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            write!(f, "{}", outcome)?;
        }
        write!(f, " (p={})", self.probability)
    }
}

/// A statevector simulator for quantum circuits
#[derive(Clone, Debug)]
pub struct StatevectorSimulator {
    /// The current state of the simulator
    state: StateVector,
    /// Random number generator for measurements
    rng: StdRng,
}

impl StatevectorSimulator {
    /// Create a new statevector simulator with the specified number of qubits
    pub fn new(qubit_count: usize) -> Self {
        StatevectorSimulator {
            state: StateVector::zero_state(qubit_count),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a simulator whose measurements replay for the same seed
    pub fn with_seed(qubit_count: usize, seed: u64) -> Self {
        StatevectorSimulator {
            state: StateVector::zero_state(qubit_count),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Get the current state vector
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Set the state vector
    pub fn set_state(&mut self, state: StateVector) {
        self.state = state;
    }

    /// Reset the simulator to the |0...0⟩ state
    pub fn reset(&mut self) {
        self.state = StateVector::zero_state(self.state.qubit_count());
    }

    /// Get the number of qubits in the simulator
    pub fn qubit_count(&self) -> usize {
        self.state.qubit_count()
    }

    /// Apply a quantum gate to the specified qubits
    pub fn apply_gate(&mut self, gate: &dyn QuantumGate, qubits: &[usize]) -> CodeResult<()> {
        self.state = gate.apply_to_qubits(&self.state, qubits)?;
        Ok(())
    }

    /// Apply every gate of a circuit to the current state
    pub fn run_circuit(&mut self, circuit: &QuantumCircuit) -> CodeResult<()> {
        if circuit.qubit_count > self.qubit_count() {
            return Err(CodeError::DimensionMismatch {
                expected: self.qubit_count(),
                actual: circuit.qubit_count,
            });
        }

        self.state = circuit.apply(&self.state)?;
        trace!(gates = circuit.gate_count(), "ran circuit");
        Ok(())
    }

    fn check_qubit(&self, qubit: usize) -> CodeResult<()> {
        if qubit >= self.qubit_count() {
            return Err(CodeError::QubitOutOfRange {
                qubit,
                qubit_count: self.qubit_count(),
            });
        }
        Ok(())
    }

    // Big-endian: qubit 0 is the most significant bit of the basis index
    fn bit_of(&self, index: usize, qubit: usize) -> usize {
        (index >> (self.qubit_count() - 1 - qubit)) & 1
    }

    /// Probabilities of 0 and 1 on a single qubit, without collapsing the state
    pub fn measure_qubit_probability(&self, qubit: usize) -> CodeResult<BTreeMap<Outcome, f64>> {
        self.check_qubit(qubit)?;

        let mut probabilities = BTreeMap::from([(Outcome::Zero, 0.0), (Outcome::One, 0.0)]);
        for i in 0..self.state.dimension() {
            let outcome = Outcome::from_bit(self.bit_of(i, qubit));
            *probabilities.entry(outcome).or_insert(0.0) += self.state.probability(i);
        }

        Ok(probabilities)
    }

    /// Joint outcome distribution of several qubits, without collapsing the state
    pub fn measure_qubits_probability(
        &self,
        qubits: &[usize],
    ) -> CodeResult<BTreeMap<Vec<Outcome>, f64>> {
        for &q in qubits {
            self.check_qubit(q)?;
        }

        let mut probabilities = BTreeMap::new();
        for i in 0..self.state.dimension() {
            let prob = self.state.probability(i);
            if prob > AMPLITUDE_EPSILON {
                let outcomes: Vec<Outcome> = qubits
                    .iter()
                    .map(|&q| Outcome::from_bit(self.bit_of(i, q)))
                    .collect();

                *probabilities.entry(outcomes).or_insert(0.0) += prob;
            }
        }

        Ok(probabilities)
    }

    /// Measure a single qubit and collapse the state
    pub fn measure_qubit(&mut self, qubit: usize) -> CodeResult<Outcome> {
        let outcomes = self.measure_qubits(&[qubit])?;
        Ok(outcomes[0])
    }

    /// Measure multiple qubits and collapse the state
    pub fn measure_qubits(&mut self, qubits: &[usize]) -> CodeResult<Vec<Outcome>> {
        let probabilities = self.measure_qubits_probability(qubits)?;
        let distribution: Vec<(Vec<Outcome>, f64)> = probabilities.into_iter().collect();

        let measured = Self::draw(&mut self.rng, &distribution);
        self.collapse_to_outcomes(qubits, &measured)?;

        Ok(measured)
    }

    // Inverse-CDF draw from a non-empty distribution
    fn draw(rng: &mut StdRng, distribution: &[(Vec<Outcome>, f64)]) -> Vec<Outcome> {
        let total: f64 = distribution.iter().map(|(_, p)| p).sum();
        let random_val = rng.gen::<f64>() * total;

        let mut cumulative = 0.0;
        for (outcomes, prob) in distribution {
            cumulative += prob;
            if random_val < cumulative {
                return outcomes.clone();
            }
        }

        // Rounding can leave random_val at the very top of the range
        distribution
            .last()
            .map(|(outcomes, _)| outcomes.clone())
            .unwrap_or_default()
    }

    /// Project onto the subspace where `qubits` read `outcomes`, then renormalize
    fn collapse_to_outcomes(&mut self, qubits: &[usize], outcomes: &[Outcome]) -> CodeResult<()> {
        if qubits.len() != outcomes.len() {
            return Err(CodeError::DimensionMismatch {
                expected: qubits.len(),
                actual: outcomes.len(),
            });
        }

        let dim = self.state.dimension();
        let mut new_amplitudes = Array1::zeros(dim);
        let mut norm_factor = 0.0;

        for i in 0..dim {
            let matches = qubits
                .iter()
                .zip(outcomes)
                .all(|(&q, outcome)| self.bit_of(i, q) == outcome.as_bit());

            if matches {
                new_amplitudes[i] = self.state.amplitudes()[i];
                norm_factor += new_amplitudes[i].norm_sqr();
            }
        }

        if norm_factor < AMPLITUDE_EPSILON {
            return Err(CodeError::ZeroProbability {
                outcome: outcomes.iter().map(|o| o.to_string()).collect(),
                qubits: qubits.to_vec(),
            });
        }

        let scale = Complex64::new(1.0 / norm_factor.sqrt(), 0.0);
        new_amplitudes.mapv_inplace(|amp| amp * scale);

        self.state = StateVector::new(self.qubit_count(), new_amplitudes)?;
        Ok(())
    }

    /// Sample measurement outcomes `shots` times, leaving the state untouched
    pub fn sample_measurements(
        &mut self,
        qubits: &[usize],
        shots: usize,
    ) -> CodeResult<BTreeMap<Vec<Outcome>, usize>> {
        let distribution: Vec<(Vec<Outcome>, f64)> =
            self.measure_qubits_probability(qubits)?.into_iter().collect();

        let mut results = BTreeMap::new();
        if distribution.is_empty() {
            return Ok(results);
        }

        for _ in 0..shots {
            let outcome = Self::draw(&mut self.rng, &distribution);
            *results.entry(outcome).or_insert(0) += 1;
        }

        Ok(results)
    }

    /// All possible measurement outcomes with their probabilities, most likely first
    pub fn get_measurement_outcomes(
        &self,
        qubits: &[usize],
    ) -> CodeResult<Vec<MeasurementOutcome>> {
        let mut outcomes: Vec<MeasurementOutcome> = self
            .measure_qubits_probability(qubits)?
            .into_iter()
            .map(|(outcomes, probability)| MeasurementOutcome {
                outcomes,
                probability,
            })
            .collect();

        outcomes.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        Ok(outcomes)
    }
}
