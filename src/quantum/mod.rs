// src/quantum/mod.rs
//! Quantum states, gates and circuits
//!
//! The minimal circuit layer the bit-flip code runs on.

pub mod circuit;
pub mod diagram;
pub mod gate;
pub mod state;

pub use circuit::{CircuitBuilder, Instruction, QuantumCircuit};
pub use gate::{QuantumGate, StandardGate};
pub use state::{QuantumState, Qubit, StateVector};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{CircuitBuilder, QuantumCircuit};
    pub use super::{QuantumGate, StandardGate};
    pub use super::{QuantumState, Qubit, StateVector};
}
