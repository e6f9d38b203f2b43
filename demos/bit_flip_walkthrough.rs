use bitflip::config::PipelineConfig;
use bitflip::correction::{
    analyze, apply_correction, detect, encode_circuit, inject_error, majority_vote_str,
    BitFlipCode, BitTriple, ErrorSpec, LogicalState,
};
use bitflip::CodeResult;

// ===========================================
// CONFIGURABLE PARAMETERS
// ===========================================

struct WalkthroughParams {
    shots: usize,              // Shots per sampling step
    seed: u64,                 // Seed for reproducible runs
    error_qubit: usize,        // Qubit flipped in the step-by-step section
    batch_runs: usize,         // Runs in the randomized batch
}

const PARAMS: WalkthroughParams = WalkthroughParams {
    shots: 1000,
    seed: 2024,
    error_qubit: 1,
    batch_runs: 12,
};

fn main() -> CodeResult<()> {
    println!("======= 3-QUBIT BIT-FLIP CODE WALKTHROUGH =======");

    majority_vote_table()?;
    step_by_step(LogicalState::Zero)?;
    step_by_step(LogicalState::Plus)?;
    statevector_view()?;
    two_error_failure()?;
    batch()?;

    println!("\n======= DONE =======");
    Ok(())
}

fn config(state: LogicalState) -> PipelineConfig {
    PipelineConfig::default()
        .with_initial_state(state)
        .with_shots(PARAMS.shots)
        .with_seed(PARAMS.seed)
}

fn majority_vote_table() -> CodeResult<()> {
    println!("\n--- Majority vote over every triple ---");
    for bits in BitTriple::all() {
        let vote = majority_vote_str(&bits.to_string())?;
        let position = vote
            .error_position
            .map_or("-".to_string(), |q| format!("q{}", q));
        println!("  {} -> majority {}, error {}", bits, vote.majority_bit, position);
    }
    Ok(())
}

fn step_by_step(state: LogicalState) -> CodeResult<()> {
    println!("\n--- Step by step, logical |{}⟩, error on q{} ---", state, PARAMS.error_qubit);
    let mut code = BitFlipCode::new(config(state))?;

    let mut circuit = encode_circuit(state)?;
    println!("\n1. Encoded:\n{}", circuit);
    print!("{}", code.sample(&circuit)?);

    inject_error(&mut circuit, PARAMS.error_qubit)?;
    let noisy = code.sample(&circuit)?;
    println!("\n2. After the error:");
    print!("{}", noisy);

    let syndrome = detect(&noisy)?;
    let analysis = analyze(&noisy);
    println!(
        "\n3. Vote: {} of {} shots disagree, blame {:?}",
        analysis.shots_with_error(),
        analysis.total_shots,
        syndrome.error_position
    );

    apply_correction(&mut circuit, &syndrome)?;
    println!("\n4. Corrected:\n{}", circuit);
    print!("{}", code.sample(&circuit)?);
    Ok(())
}

fn statevector_view() -> CodeResult<()> {
    println!("\n--- Statevectors for |-⟩ with an error on q2 ---");
    let mut code = BitFlipCode::new(config(LogicalState::Minus))?;
    let trace = code.statevector_trace(&ErrorSpec::On(2))?;
    print!("Encoded: {}", trace.encoded);
    print!("With error: {}", trace.with_error);
    print!("Corrected: {}", trace.corrected);
    println!("Recovery fidelity: {:.6}", trace.recovery_fidelity);
    Ok(())
}

fn two_error_failure() -> CodeResult<()> {
    println!("\n--- Two errors on |0⟩ (q0 and q1) ---");
    let mut code = BitFlipCode::new(config(LogicalState::Zero))?;
    let report = code.run(&ErrorSpec::Multiple(vec![0, 1]))?;
    print!("Noisy:\n{}", report.noisy_counts);
    print!("Corrected:\n{}", report.corrected_counts);
    if let Some(q) = report.corrected_qubit {
        println!("The vote blamed q{}, so correction landed on |111⟩", q);
    }
    println!("Success rate: {:.1}%", report.success_rate * 100.0);
    Ok(())
}

fn batch() -> CodeResult<()> {
    println!("\n--- {} randomized runs ---", PARAMS.batch_runs);
    let summary = BitFlipCode::new(config(LogicalState::Zero))?.run_batch(PARAMS.batch_runs)?;
    for run in &summary.runs {
        println!(
            "  |{}⟩ error {:?}: {:.1}%",
            run.initial_state,
            run.error_qubit,
            run.success_rate * 100.0
        );
    }
    println!(
        "Perfect: {}, near perfect: {}, failed: {}",
        summary.perfect, summary.near_perfect, summary.failed
    );
    Ok(())
}
