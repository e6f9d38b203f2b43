//! The 3-qubit bit-flip code
//!
//! One logical qubit is copied onto three physical qubits with two CNOTs. A
//! single bit flip on any of them is located by majority vote over the
//! measured bits and undone with an `X`.

pub mod batch;
pub mod bits;
pub mod majority;
pub mod pipeline;
pub mod sampler;

pub use batch::{BatchRun, BatchSummary};
pub use bits::{BitTriple, Counts, CODE_QUBITS};
pub use majority::{
    analyze, correct, majority_vote, majority_vote_str, MajorityVote, MeasurementAnalysis,
};
pub use pipeline::{
    apply_correction, detect, encode_circuit, inject_error, BitFlipCode, ErrorSpec, LogicalState,
    PipelineReport, StateTrace,
};
pub use sampler::Sampler;
