// src/quantum/state.rs
//! Quantum state representations
//!
//! Qubit 0 is the most significant bit of a basis index, so the basis state
//! `|q0 q1 q2⟩` has index `q0·4 + q1·2 + q2` and prints as `q0q1q2`.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{CodeError, CodeResult};

/// Amplitudes with squared norm below this are treated as zero.
pub const AMPLITUDE_EPSILON: f64 = 1e-10;

/// Trait for quantum states in different representations
pub trait QuantumState: Clone + Debug {
    /// Returns the number of qubits in this quantum state
    fn qubit_count(&self) -> usize;

    /// Returns the dimension of the Hilbert space (2^n for n qubits)
    fn dimension(&self) -> usize {
        1 << self.qubit_count()
    }

    /// Check if the state is valid (e.g., normalized)
    fn is_valid(&self) -> bool;
}

/// State vector representation of a quantum state
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    /// Number of qubits
    pub qubit_count: usize,

    /// The state vector as an array of complex amplitudes
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Create a new state vector with the given amplitudes
    pub fn new(qubit_count: usize, amplitudes: Array1<Complex64>) -> CodeResult<Self> {
        let expected = 1 << qubit_count;

        if amplitudes.len() != expected {
            return Err(CodeError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }

        let state = StateVector {
            qubit_count,
            amplitudes,
        };

        if !state.is_valid() {
            return Err(CodeError::NotNormalized);
        }

        Ok(state)
    }

    /// Create a new state vector in the computational basis state |index⟩
    pub fn computational_basis(qubit_count: usize, index: usize) -> CodeResult<Self> {
        let dim = 1 << qubit_count;

        if index >= dim {
            return Err(CodeError::DimensionMismatch {
                expected: dim,
                actual: index + 1,
            });
        }

        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);

        Ok(StateVector {
            qubit_count,
            amplitudes,
        })
    }

    /// Create the zero state |00...0⟩
    pub fn zero_state(qubit_count: usize) -> Self {
        let mut amplitudes = Array1::zeros(1 << qubit_count);
        amplitudes[0] = Complex64::new(1.0, 0.0);

        StateVector {
            qubit_count,
            amplitudes,
        }
    }

    /// The repetition-code image of a single qubit: α|0…0⟩ + β|1…1⟩.
    pub fn repetition_encoded(qubit: &Qubit, copies: usize) -> Self {
        let dim = 1 << copies;
        let mut amplitudes = Array1::zeros(dim);
        amplitudes[0] = qubit.alpha();
        amplitudes[dim - 1] = qubit.beta();

        StateVector {
            qubit_count: copies,
            amplitudes,
        }
    }

    /// Inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &Self) -> CodeResult<Complex64> {
        if self.qubit_count != other.qubit_count {
            return Err(CodeError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }

        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Fidelity |⟨self|other⟩|² between two pure states
    pub fn fidelity(&self, other: &Self) -> CodeResult<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    /// Calculate the probability of measuring the given basis index
    pub fn probability(&self, bit_string: usize) -> f64 {
        if bit_string >= self.dimension() {
            return 0.0;
        }

        self.amplitudes[bit_string].norm_sqr()
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Non-negligible amplitudes keyed by basis label (`"010"`, ...)
    pub fn amplitude_map(&self) -> BTreeMap<String, Complex64> {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(_, amp)| amp.norm_sqr() > AMPLITUDE_EPSILON)
            .map(|(i, amp)| (self.basis_label(i), *amp))
            .collect()
    }

    /// Binary label for a basis index, qubit 0 first
    pub fn basis_label(&self, index: usize) -> String {
        format!("{:0width$b}", index, width = self.qubit_count)
    }

    /// Apply a full-system matrix to this state vector
    pub fn apply_matrix(&self, matrix: &Array2<Complex64>) -> CodeResult<Self> {
        let dim = self.dimension();

        if matrix.shape() != [dim, dim] {
            return Err(CodeError::DimensionMismatch {
                expected: dim,
                actual: matrix.shape()[0],
            });
        }

        Ok(StateVector {
            qubit_count: self.qubit_count,
            amplitudes: matrix.dot(&self.amplitudes),
        })
    }

    /// Tensor product |self⟩ ⊗ |other⟩
    pub fn tensor(&self, other: &Self) -> Self {
        let other_dim = other.dimension();
        let mut amplitudes = Array1::zeros(self.dimension() * other_dim);

        for (i, a) in self.amplitudes.iter().enumerate() {
            for (j, b) in other.amplitudes.iter().enumerate() {
                amplitudes[i * other_dim + j] = a * b;
            }
        }

        StateVector {
            qubit_count: self.qubit_count + other.qubit_count,
            amplitudes,
        }
    }
}

impl QuantumState for StateVector {
    fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    fn is_valid(&self) -> bool {
        let norm_sqr: f64 = self.amplitudes.iter().map(|amp| amp.norm_sqr()).sum();

        (norm_sqr - 1.0).abs() < AMPLITUDE_EPSILON
    }
}

impl Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-qubit state:", self.qubit_count)?;

        let entries = self.amplitude_map();
        if entries.is_empty() {
            return writeln!(f, "  (zero state)");
        }

        for (label, amp) in entries {
            writeln!(
                f,
                "  ({:.4}{:+.4}i) |{}⟩ [{:.1}%]",
                amp.re,
                amp.im,
                label,
                amp.norm_sqr() * 100.0
            )?;
        }

        Ok(())
    }
}

/// A single qubit state α|0⟩ + β|1⟩
#[derive(Clone, Debug, PartialEq)]
pub struct Qubit {
    alpha: Complex64,
    beta: Complex64,
}

impl Qubit {
    /// Create the |0⟩ state
    pub fn zero() -> Self {
        Qubit {
            alpha: Complex64::new(1.0, 0.0),
            beta: Complex64::new(0.0, 0.0),
        }
    }

    /// Create the |1⟩ state
    pub fn one() -> Self {
        Qubit {
            alpha: Complex64::new(0.0, 0.0),
            beta: Complex64::new(1.0, 0.0),
        }
    }

    /// Create the |+⟩ state
    pub fn plus() -> Self {
        Qubit {
            alpha: Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0),
            beta: Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0),
        }
    }

    /// Create the |-⟩ state
    pub fn minus() -> Self {
        Qubit {
            alpha: Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0),
            beta: Complex64::new(-std::f64::consts::FRAC_1_SQRT_2, 0.0),
        }
    }

    /// Amplitude of |0⟩
    pub fn alpha(&self) -> Complex64 {
        self.alpha
    }

    /// Amplitude of |1⟩
    pub fn beta(&self) -> Complex64 {
        self.beta
    }

    /// Convert to a StateVector
    pub fn to_state_vector(&self) -> StateVector {
        StateVector {
            qubit_count: 1,
            amplitudes: Array1::from(vec![self.alpha, self.beta]),
        }
    }
}

impl QuantumState for Qubit {
    fn qubit_count(&self) -> usize {
        1
    }

    fn is_valid(&self) -> bool {
        let norm_sqr = self.alpha.norm_sqr() + self.beta.norm_sqr();
        (norm_sqr - 1.0).abs() < AMPLITUDE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repetition_encoding_matches_tensor_of_basis_states() {
        let encoded = StateVector::repetition_encoded(&Qubit::one(), 3);
        let one = Qubit::one().to_state_vector();
        let expected = one.tensor(&one).tensor(&one);

        assert_eq!(encoded, expected);
        assert_eq!(encoded.amplitude_map().keys().collect::<Vec<_>>(), vec!["111"]);
    }

    #[test]
    fn test_fidelity_ignores_global_phase_only() {
        let plus = StateVector::repetition_encoded(&Qubit::plus(), 3);
        let minus = StateVector::repetition_encoded(&Qubit::minus(), 3);

        assert!((plus.fidelity(&plus).unwrap() - 1.0).abs() < 1e-10);
        assert!(plus.fidelity(&minus).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_qubit_amplitudes() {
        let minus = Qubit::minus();
        assert!((minus.alpha().re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((minus.beta().re + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(Qubit::one().alpha(), Complex64::new(0.0, 0.0));
        assert!(minus.is_valid());
    }

    #[test]
    fn test_rejects_unnormalized_amplitudes() {
        let amplitudes = Array1::from(vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)]);
        assert!(matches!(
            StateVector::new(1, amplitudes),
            Err(CodeError::NotNormalized)
        ));
    }
}
