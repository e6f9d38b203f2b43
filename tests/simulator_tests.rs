use num_complex::Complex64;

use bitflip::quantum::circuit::CircuitBuilder;
use bitflip::quantum::gate::StandardGate;
use bitflip::quantum::state::StateVector;
use bitflip::simulators::{Outcome, StatevectorSimulator};

/// Helper function for comparing complex numbers with tolerance
fn complex_approx_eq(a: Complex64, b: Complex64, epsilon: f64) -> bool {
    (a - b).norm() < epsilon
}

/// Helper function for comparing f64 with tolerance
fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_simulator_bell_state() {
    let mut builder = CircuitBuilder::new(2);
    builder.h(0).unwrap();
    builder.cnot(0, 1).unwrap();
    let circuit = builder.build();

    let mut simulator = StatevectorSimulator::new(2);
    simulator.run_circuit(&circuit).unwrap();

    let amplitudes = simulator.state().amplitudes();
    let sqrt2_inv = 1.0 / 2.0_f64.sqrt();

    assert!(complex_approx_eq(amplitudes[0], Complex64::new(sqrt2_inv, 0.0), 1e-10));
    assert!(complex_approx_eq(amplitudes[1], Complex64::new(0.0, 0.0), 1e-10));
    assert!(complex_approx_eq(amplitudes[2], Complex64::new(0.0, 0.0), 1e-10));
    assert!(complex_approx_eq(amplitudes[3], Complex64::new(sqrt2_inv, 0.0), 1e-10));

    let outcomes = simulator.get_measurement_outcomes(&[0, 1]).unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(approx_eq(outcomes[0].probability, 0.5, 1e-10));
    assert!(approx_eq(outcomes[1].probability, 0.5, 1e-10));
}

#[test]
fn test_qubit_zero_is_most_significant() {
    let mut simulator = StatevectorSimulator::new(3);
    simulator.apply_gate(&StandardGate::X, &[0]).unwrap();

    // |100⟩ sits at index 4
    assert!(approx_eq(simulator.state().probability(4), 1.0, 1e-10));
    assert_eq!(simulator.state().amplitude_map().keys().collect::<Vec<_>>(), vec!["100"]);
}

#[test]
fn test_cnot_with_control_below_target() {
    // Control on qubit 2, target qubit 0
    let mut builder = CircuitBuilder::new(3);
    builder.x(2).unwrap();
    builder.cnot(2, 0).unwrap();
    let circuit = builder.build();

    let mut simulator = StatevectorSimulator::new(3);
    simulator.run_circuit(&circuit).unwrap();

    let expected = StateVector::computational_basis(3, 0b101).unwrap();
    assert!(approx_eq(simulator.state().fidelity(&expected).unwrap(), 1.0, 1e-10));
}

#[test]
fn test_measure_qubit_collapses_state() {
    let mut builder = CircuitBuilder::new(3);
    builder.h(0).unwrap();
    builder.cnot(0, 1).unwrap().cnot(0, 2).unwrap();
    let circuit = builder.build();

    let mut simulator = StatevectorSimulator::with_seed(3, 11);
    simulator.run_circuit(&circuit).unwrap();

    let first = simulator.measure_qubit(0).unwrap();
    let rest = simulator.measure_qubits(&[1, 2]).unwrap();
    assert_eq!(rest, vec![first, first]);

    let probabilities = simulator.measure_qubit_probability(2).unwrap();
    assert!(approx_eq(probabilities[&first], 1.0, 1e-10));
}

#[test]
fn test_seeded_sampling_is_reproducible() {
    let mut builder = CircuitBuilder::new(3);
    builder.h(0).unwrap();
    builder.cnot(0, 1).unwrap().cnot(0, 2).unwrap();
    let circuit = builder.build();

    let sample = |seed| {
        let mut simulator = StatevectorSimulator::with_seed(3, seed);
        simulator.run_circuit(&circuit).unwrap();
        simulator.sample_measurements(&[0, 1, 2], 500).unwrap()
    };

    let first = sample(42);
    assert_eq!(first, sample(42));
    assert_eq!(first.values().sum::<usize>(), 500);
    for outcome in first.keys() {
        assert!(outcome.iter().all(|&bit| bit == outcome[0]));
    }
}

#[test]
fn test_sampling_leaves_state_untouched() {
    let mut builder = CircuitBuilder::new(2);
    builder.h(0).unwrap();
    let circuit = builder.build();

    let mut simulator = StatevectorSimulator::with_seed(2, 7);
    simulator.run_circuit(&circuit).unwrap();
    let before = simulator.state().clone();

    simulator.sample_measurements(&[0], 100).unwrap();
    assert_eq!(simulator.state(), &before);

    simulator.reset();
    let probabilities = simulator.measure_qubit_probability(0).unwrap();
    assert!(approx_eq(probabilities[&Outcome::Zero], 1.0, 1e-10));
}

#[test]
fn test_measuring_out_of_range_qubit_fails() {
    let simulator = StatevectorSimulator::new(2);
    assert!(simulator.measure_qubit_probability(2).is_err());
    assert!(simulator.get_measurement_outcomes(&[0, 5]).is_err());
}
