// src/quantum/gate.rs
//! Quantum gates
//!
//! Gates expose their matrix on the qubits they act on. `apply_to_qubits`
//! lifts that matrix onto the full register before applying it.

use std::any::Any;
use std::fmt::Debug;

use ndarray::{array, Array1, Array2};
use num_complex::Complex64;

use super::state::{QuantumState, StateVector};
use crate::error::{CodeError, CodeResult};

/// Common complex numbers used in quantum gates
pub mod constants {
    use num_complex::Complex64;

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

/// Reject target lists that name a qubit twice.
pub(crate) fn check_distinct_qubits(qubits: &[usize]) -> CodeResult<()> {
    for (i, &q) in qubits.iter().enumerate() {
        if qubits[..i].contains(&q) {
            return Err(CodeError::DuplicateQubit { qubit: q });
        }
    }
    Ok(())
}

/// Trait for quantum gates
pub trait QuantumGate: Debug + Any + Send + Sync {
    /// Returns the number of qubits this gate acts on
    fn qubit_count(&self) -> usize;

    /// Returns the matrix representation of this gate
    fn matrix(&self) -> Array2<Complex64>;

    /// Returns a display name for this gate
    fn name(&self) -> String;

    /// Create a clone of this gate
    fn clone_box(&self) -> Box<dyn QuantumGate>;

    /// Convert to Any for runtime type checking
    fn as_any(&self) -> &dyn Any;

    /// Compares this gate with another gate by matrix
    fn equals(&self, other: &dyn QuantumGate) -> bool {
        let m1 = self.matrix();
        let m2 = other.matrix();

        if m1.shape() != m2.shape() {
            return false;
        }

        m1.iter()
            .zip(m2.iter())
            .all(|(a, b)| (a - b).norm_sqr() < 1e-20)
    }

    /// Apply this gate to specific qubits in a state
    fn apply_to_qubits(&self, state: &StateVector, qubits: &[usize]) -> CodeResult<StateVector> {
        if qubits.len() != self.qubit_count() {
            return Err(CodeError::GateArity {
                expected: self.qubit_count(),
                actual: qubits.len(),
            });
        }

        for &q in qubits {
            if q >= state.qubit_count() {
                return Err(CodeError::QubitOutOfRange {
                    qubit: q,
                    qubit_count: state.qubit_count(),
                });
            }
        }
        check_distinct_qubits(qubits)?;

        let full_matrix = self.tensor_to_full_system(state.qubit_count(), qubits);
        state.apply_matrix(&full_matrix)
    }

    /// Expand the gate matrix to act on `target_qubits` of a `total_qubits` register.
    ///
    /// Target order is significant: `target_qubits[0]` maps to the most
    /// significant bit of the gate matrix, so `CNOT` on `[2, 0]` uses qubit 2
    /// as control.
    fn tensor_to_full_system(
        &self,
        total_qubits: usize,
        target_qubits: &[usize],
    ) -> Array2<Complex64> {
        let gate_matrix = self.matrix();
        let dim = 1 << total_qubits;
        let num_target = target_qubits.len();
        let mut result = Array2::zeros((dim, dim));

        for i in 0..dim {
            for j in 0..dim {
                // Non-target bits must agree
                let spectators_match = (0..total_qubits)
                    .filter(|q| !target_qubits.contains(q))
                    .all(|q| {
                        let shift = total_qubits - 1 - q;
                        (i >> shift) & 1 == (j >> shift) & 1
                    });

                if !spectators_match {
                    continue;
                }

                let mut sub_i = 0;
                let mut sub_j = 0;
                for (k, &q) in target_qubits.iter().enumerate() {
                    let shift = total_qubits - 1 - q;
                    sub_i |= ((i >> shift) & 1) << (num_target - 1 - k);
                    sub_j |= ((j >> shift) & 1) << (num_target - 1 - k);
                }

                result[[i, j]] = gate_matrix[[sub_i, sub_j]];
            }
        }

        result
    }
}

impl Clone for Box<dyn QuantumGate> {
    fn clone(&self) -> Box<dyn QuantumGate> {
        self.clone_box()
    }
}

impl PartialEq for Box<dyn QuantumGate> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(&**other)
    }
}

/// Standard quantum gates
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StandardGate {
    /// Identity gate
    I(usize), // number of qubits

    /// Pauli-X gate (bit flip)
    X,

    /// Pauli-Y gate
    Y,

    /// Pauli-Z gate (phase flip)
    Z,

    /// Hadamard gate
    H,

    /// CNOT gate, control first
    CNOT,

    /// SWAP gate
    SWAP,
}

impl QuantumGate for StandardGate {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn qubit_count(&self) -> usize {
        match self {
            StandardGate::I(n) => *n,
            StandardGate::X | StandardGate::Y | StandardGate::Z | StandardGate::H => 1,
            StandardGate::CNOT | StandardGate::SWAP => 2,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        use constants::*;
        let o = Complex64::new(0.0, 0.0);
        let l = Complex64::new(1.0, 0.0);

        match self {
            StandardGate::I(n) => Array2::from_diag(&Array1::from_elem(1 << n, l)),
            StandardGate::X => array![[o, l], [l, o]],
            StandardGate::Y => array![[o, -I], [I, o]],
            StandardGate::Z => array![[l, o], [o, -l]],
            StandardGate::H => {
                let factor = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[factor, factor], [factor, -factor]]
            }
            StandardGate::CNOT => array![
                [l, o, o, o],
                [o, l, o, o],
                [o, o, o, l],
                [o, o, l, o]
            ],
            StandardGate::SWAP => array![
                [l, o, o, o],
                [o, o, l, o],
                [o, l, o, o],
                [o, o, o, l]
            ],
        }
    }

    fn name(&self) -> String {
        match self {
            StandardGate::I(n) => format!("I({})", n),
            StandardGate::X => "X".to_string(),
            StandardGate::Y => "Y".to_string(),
            StandardGate::Z => "Z".to_string(),
            StandardGate::H => "H".to_string(),
            StandardGate::CNOT => "CNOT".to_string(),
            StandardGate::SWAP => "SWAP".to_string(),
        }
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }
}
