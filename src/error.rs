//! Error types for the bit-flip code and its simulation layer.

use thiserror::Error;

/// Errors produced while building, simulating, or correcting circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodeError {
    /// Input outside the 3-bit measurement domain.
    #[error("invalid bit string {0:?}: expected exactly three characters, each '0' or '1'")]
    InvalidBitString(String),

    /// A gate or measurement references a qubit the register does not have.
    #[error("qubit index {qubit} out of range for a {qubit_count}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the register.
        qubit_count: usize,
    },

    /// A gate was given the wrong number of target qubits.
    #[error("gate acts on {expected} qubits, but {actual} qubits were specified")]
    GateArity {
        /// Qubits the gate acts on.
        expected: usize,
        /// Qubits that were supplied.
        actual: usize,
    },

    /// A gate lists the same qubit more than once.
    #[error("qubit {qubit} appears more than once in a gate's targets")]
    DuplicateQubit {
        /// The repeated qubit index.
        qubit: usize,
    },

    /// Vector or matrix dimensions do not line up.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Dimension that was supplied.
        actual: usize,
    },

    /// State vector amplitudes do not have unit norm.
    #[error("state vector is not normalized")]
    NotNormalized,

    /// Tried to collapse onto an outcome that cannot occur.
    #[error("zero probability for outcome {outcome} on qubits {qubits:?}")]
    ZeroProbability {
        /// Requested outcome, as a bit string.
        outcome: String,
        /// Qubits that were measured.
        qubits: Vec<usize>,
    },

    /// A frequency mapping with no recorded shots.
    #[error("no measurement outcomes were recorded")]
    NoMeasurements,

    /// Pipeline configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a configuration file failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for bit-flip code operations.
pub type CodeResult<T> = Result<T, CodeError>;
