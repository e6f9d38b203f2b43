//! 3-qubit bit-flip error correction
//!
//! Encodes one logical qubit into three physical qubits, injects bit-flip
//! errors, locates them by majority vote over sampled measurements, and
//! corrects them. Circuits run on a small statevector simulator.

pub mod config;
pub mod correction;
pub mod error;
pub mod quantum;
pub mod simulators;

pub use error::{CodeError, CodeResult};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::correction::{
        analyze, majority_vote, BitFlipCode, BitTriple, Counts, ErrorSpec, LogicalState,
        MajorityVote, Sampler,
    };
    pub use crate::error::{CodeError, CodeResult};
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::{Outcome, StatevectorSimulator};
}
