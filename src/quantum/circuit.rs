use std::fmt;

use crate::error::{CodeError, CodeResult};
use crate::quantum::diagram;
use crate::quantum::gate::{check_distinct_qubits, QuantumGate, StandardGate};
use crate::quantum::state::{QuantumState, StateVector};

/// One step of a circuit
#[derive(Debug, Clone)]
pub enum Instruction {
    /// A gate applied to the listed qubits, in gate order
    Gate {
        gate: Box<dyn QuantumGate>,
        qubits: Vec<usize>,
    },
    /// A visual separator between pipeline stages; no effect on the state
    Barrier { label: String },
}

/// A quantum circuit consisting of a sequence of instructions
#[derive(Debug, Clone)]
pub struct QuantumCircuit {
    pub instructions: Vec<Instruction>,
    pub qubit_count: usize,
}

impl QuantumCircuit {
    /// Create a new empty quantum circuit
    pub fn new(qubit_count: usize) -> Self {
        QuantumCircuit {
            instructions: Vec::new(),
            qubit_count,
        }
    }

    pub fn add_gate(&mut self, gate: Box<dyn QuantumGate>, qubits: &[usize]) -> CodeResult<()> {
        for &q in qubits {
            if q >= self.qubit_count {
                return Err(CodeError::QubitOutOfRange {
                    qubit: q,
                    qubit_count: self.qubit_count,
                });
            }
        }

        if gate.qubit_count() != qubits.len() {
            return Err(CodeError::GateArity {
                expected: gate.qubit_count(),
                actual: qubits.len(),
            });
        }
        check_distinct_qubits(qubits)?;

        self.instructions.push(Instruction::Gate {
            gate,
            qubits: qubits.to_vec(),
        });
        Ok(())
    }

    /// Append a labelled barrier
    pub fn barrier(&mut self, label: impl Into<String>) {
        self.instructions.push(Instruction::Barrier {
            label: label.into(),
        });
    }

    /// Iterate over the gates, skipping barriers
    pub fn gates(&self) -> impl Iterator<Item = (&dyn QuantumGate, &[usize])> {
        self.instructions.iter().filter_map(|inst| match inst {
            Instruction::Gate { gate, qubits } => Some((&**gate, qubits.as_slice())),
            Instruction::Barrier { .. } => None,
        })
    }

    /// Get the number of gates in the circuit
    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    /// Barrier labels in circuit order
    pub fn stage_labels(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|inst| match inst {
                Instruction::Barrier { label } => Some(label.as_str()),
                Instruction::Gate { .. } => None,
            })
            .collect()
    }

    /// Apply the circuit to a quantum state
    pub fn apply(&self, state: &StateVector) -> CodeResult<StateVector> {
        if state.qubit_count() < self.qubit_count {
            return Err(CodeError::DimensionMismatch {
                expected: self.qubit_count,
                actual: state.qubit_count(),
            });
        }

        let mut current_state = state.clone();
        for (gate, qubits) in self.gates() {
            current_state = gate.apply_to_qubits(&current_state, qubits)?;
        }

        Ok(current_state)
    }

    /// Compose this circuit with another circuit: `self` runs first
    pub fn compose(&self, other: &QuantumCircuit) -> CodeResult<QuantumCircuit> {
        if self.qubit_count != other.qubit_count {
            return Err(CodeError::DimensionMismatch {
                expected: self.qubit_count,
                actual: other.qubit_count,
            });
        }

        let mut result = self.clone();
        result.instructions.extend(other.instructions.iter().cloned());
        Ok(result)
    }

    /// Render the circuit as a text diagram
    pub fn draw(&self) -> String {
        diagram::render(self)
    }
}

impl fmt::Display for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.draw())
    }
}

impl PartialEq for QuantumCircuit {
    fn eq(&self, other: &Self) -> bool {
        if self.qubit_count != other.qubit_count
            || self.instructions.len() != other.instructions.len()
        {
            return false;
        }

        self.instructions
            .iter()
            .zip(other.instructions.iter())
            .all(|pair| match pair {
                (
                    Instruction::Gate { gate: g1, qubits: q1 },
                    Instruction::Gate { gate: g2, qubits: q2 },
                ) => q1 == q2 && g1.name() == g2.name(),
                (Instruction::Barrier { label: l1 }, Instruction::Barrier { label: l2 }) => {
                    l1 == l2
                }
                _ => false,
            })
    }
}

/// A builder for quantum circuits
pub struct CircuitBuilder {
    circuit: QuantumCircuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    pub fn new(qubit_count: usize) -> Self {
        CircuitBuilder {
            circuit: QuantumCircuit::new(qubit_count),
        }
    }

    /// Build the quantum circuit
    pub fn build(self) -> QuantumCircuit {
        self.circuit
    }

    pub fn add_gate<G: QuantumGate + 'static>(
        &mut self,
        gate: G,
        qubits: &[usize],
    ) -> CodeResult<&mut Self> {
        self.circuit.add_gate(Box::new(gate), qubits)?;
        Ok(self)
    }

    /// Add a Hadamard gate
    pub fn h(&mut self, qubit: usize) -> CodeResult<&mut Self> {
        self.add_gate(StandardGate::H, &[qubit])
    }

    /// Add a Pauli-X gate
    pub fn x(&mut self, qubit: usize) -> CodeResult<&mut Self> {
        self.add_gate(StandardGate::X, &[qubit])
    }

    /// Add a Pauli-Y gate
    pub fn y(&mut self, qubit: usize) -> CodeResult<&mut Self> {
        self.add_gate(StandardGate::Y, &[qubit])
    }

    /// Add a Pauli-Z gate
    pub fn z(&mut self, qubit: usize) -> CodeResult<&mut Self> {
        self.add_gate(StandardGate::Z, &[qubit])
    }

    /// Add a CNOT gate
    pub fn cnot(&mut self, control: usize, target: usize) -> CodeResult<&mut Self> {
        self.add_gate(StandardGate::CNOT, &[control, target])
    }

    /// Add a SWAP gate
    pub fn swap(&mut self, qubit1: usize, qubit2: usize) -> CodeResult<&mut Self> {
        self.add_gate(StandardGate::SWAP, &[qubit1, qubit2])
    }

    /// Add a labelled barrier
    pub fn barrier(&mut self, label: impl Into<String>) -> &mut Self {
        self.circuit.barrier(label);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_qubit() {
        let mut circuit = QuantumCircuit::new(3);
        let err = circuit.add_gate(Box::new(StandardGate::X), &[3]).unwrap_err();
        assert!(matches!(err, CodeError::QubitOutOfRange { qubit: 3, qubit_count: 3 }));
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let mut circuit = QuantumCircuit::new(3);
        let err = circuit.add_gate(Box::new(StandardGate::CNOT), &[0]).unwrap_err();
        assert!(matches!(err, CodeError::GateArity { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_rejects_repeated_qubit() {
        let mut builder = CircuitBuilder::new(3);
        builder.x(0).unwrap();
        assert!(matches!(
            builder.cnot(0, 0),
            Err(CodeError::DuplicateQubit { qubit: 0 })
        ));

        let circuit = builder.build();
        assert_eq!(circuit.gate_count(), 1);
        assert!(circuit.apply(&StateVector::zero_state(3)).unwrap().is_valid());
    }

    #[test]
    fn test_barriers_do_not_count_as_gates() {
        let mut builder = CircuitBuilder::new(3);
        builder.x(0).unwrap().barrier("Init");
        builder.cnot(0, 1).unwrap().cnot(0, 2).unwrap().barrier("Encode");
        let circuit = builder.build();

        assert_eq!(circuit.gate_count(), 3);
        assert_eq!(circuit.stage_labels(), vec!["Init", "Encode"]);
    }

    #[test]
    fn test_compose_runs_self_first() {
        let mut first = CircuitBuilder::new(2);
        first.x(0).unwrap();
        let mut second = CircuitBuilder::new(2);
        second.cnot(0, 1).unwrap();

        let composed = first.build().compose(&second.build()).unwrap();
        let state = composed.apply(&StateVector::zero_state(2)).unwrap();

        assert!((state.probability(0b11) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cnot_with_control_below_target_index() {
        let mut builder = CircuitBuilder::new(3);
        builder.x(2).unwrap().cnot(2, 0).unwrap();
        let state = builder.build().apply(&StateVector::zero_state(3)).unwrap();

        assert!((state.probability(0b101) - 1.0).abs() < 1e-10);
    }
}
