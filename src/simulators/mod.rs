//! Quantum circuit simulators
//!
//! A dense statevector simulator: small registers only.

pub mod statevector;

pub use statevector::{MeasurementOutcome, Outcome, StatevectorSimulator};
