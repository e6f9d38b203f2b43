//! The sampling seam between the correction pipeline and a simulator.

use super::bits::{Counts, CODE_QUBITS};
use crate::error::{CodeError, CodeResult};
use crate::quantum::circuit::QuantumCircuit;
use crate::quantum::state::StateVector;
use crate::simulators::StatevectorSimulator;

/// Runs a circuit from `|000⟩` and measures all three qubits `shots` times.
pub trait Sampler {
    fn sample(&mut self, circuit: &QuantumCircuit, shots: usize) -> CodeResult<Counts>;
}

impl Sampler for StatevectorSimulator {
    fn sample(&mut self, circuit: &QuantumCircuit, shots: usize) -> CodeResult<Counts> {
        if circuit.qubit_count != CODE_QUBITS {
            return Err(CodeError::DimensionMismatch {
                expected: CODE_QUBITS,
                actual: circuit.qubit_count,
            });
        }

        self.set_state(StateVector::zero_state(CODE_QUBITS));
        self.run_circuit(circuit)?;

        let qubits: Vec<usize> = (0..CODE_QUBITS).collect();
        Counts::try_from(self.sample_measurements(&qubits, shots)?)
    }
}
