//! Command-line front end for the 3-qubit bit-flip code.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use bitflip::config::PipelineConfig;
use bitflip::correction::{
    analyze, encode_circuit, inject_error, majority_vote_str, BitFlipCode, Counts, ErrorSpec,
    LogicalState, MeasurementAnalysis, PipelineReport,
};

/// Encode, corrupt, detect and correct a logical qubit with the bit-flip code
#[derive(Parser)]
#[command(name = "bitflip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with pipeline settings; flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SamplingOpts {
    /// Number of shots per sampling step
    #[arg(long)]
    shots: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl SamplingOpts {
    fn apply(&self, mut config: PipelineConfig) -> Result<PipelineConfig> {
        if let Some(shots) = self.shots {
            config = config.with_shots(shots);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Clone)]
struct RunOpts {
    /// Logical state to encode (0, 1, +, -)
    #[arg(short, long)]
    state: Option<LogicalState>,

    /// Do not print circuit diagrams
    #[arg(long)]
    no_circuit: bool,

    #[command(flatten)]
    sampling: SamplingOpts,
}

impl RunOpts {
    fn json(&self) -> bool {
        self.sampling.json
    }

    fn config(&self, base: &PipelineConfig) -> Result<PipelineConfig> {
        let mut config = base.clone();
        if let Some(state) = self.state {
            config = config.with_initial_state(state);
        }
        self.sampling.apply(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a logical state and measure it
    Encode {
        #[command(flatten)]
        opts: RunOpts,
    },

    /// Encode, flip one qubit, and measure without correcting
    Error {
        #[command(flatten)]
        opts: RunOpts,

        /// Qubit to flip
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..3))]
        qubit: u8,
    },

    /// Encode, flip one qubit, detect and correct it
    Correct {
        #[command(flatten)]
        opts: RunOpts,

        /// Qubit to flip
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..3))]
        qubit: u8,
    },

    /// Run the full pipeline with a chosen, random, or no error
    Pipeline {
        #[command(flatten)]
        opts: RunOpts,

        /// Qubit to flip
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u8).range(0..3),
            conflicts_with = "random"
        )]
        qubit: Option<u8>,

        /// Flip a randomly chosen qubit
        #[arg(long)]
        random: bool,

        /// Chance a random error is injected
        #[arg(long, requires = "random")]
        error_probability: Option<f64>,
    },

    /// Majority vote on a literal 3-bit string, qubit 0 first
    Vote {
        /// Measured bits, e.g. 010
        bits: String,
    },

    /// Show the statevector after encoding, error and correction
    Statevector {
        #[command(flatten)]
        opts: RunOpts,

        /// Qubit to flip
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..3))]
        qubit: Option<u8>,
    },

    /// Run many randomized pipelines and summarize success rates
    Batch {
        #[command(flatten)]
        sampling: SamplingOpts,

        /// Number of runs
        #[arg(short, long, default_value = "20")]
        runs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let base = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Encode { opts } => encode(&base, &opts),
        Commands::Error { opts, qubit } => error(&base, &opts, qubit as usize),
        Commands::Correct { opts, qubit } => {
            let config = opts.config(&base)?;
            let report = BitFlipCode::new(config)?.run(&ErrorSpec::On(qubit as usize))?;
            print_report(&report, &opts)
        }
        Commands::Pipeline {
            opts,
            qubit,
            random,
            error_probability,
        } => {
            let mut config = opts.config(&base)?;
            if let Some(p) = error_probability {
                config = config.with_error_probability(p);
            }
            let spec = match (qubit, random) {
                (Some(q), _) => ErrorSpec::On(q as usize),
                (None, true) => ErrorSpec::Random,
                (None, false) => ErrorSpec::None,
            };
            let report = BitFlipCode::new(config)?.run(&spec)?;
            print_report(&report, &opts)
        }
        Commands::Vote { bits } => {
            let vote = majority_vote_str(&bits)?;
            println!("{}", serde_json::to_string_pretty(&vote)?);
            Ok(())
        }
        Commands::Statevector { opts, qubit } => statevector(&base, &opts, qubit),
        Commands::Batch { sampling, runs } => {
            let summary = BitFlipCode::new(sampling.apply(base)?)?.run_batch(runs)?;
            if sampling.json {
                return emit_json(&summary);
            }
            for (i, run) in summary.runs.iter().enumerate() {
                let error = run.error_qubit.map_or("none".to_string(), |q| format!("q{}", q));
                println!(
                    "Test {:>3}: state={} error={:<4} success={:5.1}%",
                    i + 1,
                    run.initial_state,
                    error,
                    run.success_rate * 100.0
                );
            }
            println!();
            println!("{}", style("Summary").bold());
            println!("  100%:   {}", summary.perfect);
            println!("  >=95%:  {}", summary.near_perfect);
            println!("  failed: {}", summary.failed);
            println!(
                "  success rate mean/min/max: {:.1}% / {:.1}% / {:.1}%",
                summary.mean_success_rate * 100.0,
                summary.min_success_rate * 100.0,
                summary.max_success_rate * 100.0
            );
            Ok(())
        }
    }
}

fn encode(base: &PipelineConfig, opts: &RunOpts) -> Result<()> {
    let config = opts.config(base)?;
    let circuit = encode_circuit(config.initial_state)?;
    let counts = BitFlipCode::new(config)?.sample(&circuit)?;

    if opts.json() {
        return emit_json(&analyze(&counts));
    }
    if !opts.no_circuit {
        println!("{}\n", circuit);
    }
    print_counts("Measured", &counts);
    Ok(())
}

fn error(base: &PipelineConfig, opts: &RunOpts, qubit: usize) -> Result<()> {
    let config = opts.config(base)?;
    let mut circuit = encode_circuit(config.initial_state)?;
    inject_error(&mut circuit, qubit)?;
    let counts = BitFlipCode::new(config)?.sample(&circuit)?;
    let analysis = analyze(&counts);

    if opts.json() {
        return emit_json(&analysis);
    }
    if !opts.no_circuit {
        println!("{}\n", circuit);
    }
    print_analysis(&analysis);
    Ok(())
}

fn statevector(base: &PipelineConfig, opts: &RunOpts, qubit: Option<u8>) -> Result<()> {
    let config = opts.config(base)?;
    let spec = qubit.map_or(ErrorSpec::None, |q| ErrorSpec::On(q as usize));
    let trace = BitFlipCode::new(config)?.statevector_trace(&spec)?;

    if opts.json() {
        let logical = trace.initial_state.qubit();
        return emit_json(&serde_json::json!({
            "initial_state": trace.initial_state,
            "logical_amplitudes": { "alpha": logical.alpha(), "beta": logical.beta() },
            "encoded": trace.encoded.amplitude_map(),
            "with_error": trace.with_error.amplitude_map(),
            "corrected": trace.corrected.amplitude_map(),
            "corrected_qubit": trace.corrected_qubit,
            "encoding_fidelity": trace.encoding_fidelity,
            "recovery_fidelity": trace.recovery_fidelity,
        }));
    }

    let logical = trace.initial_state.qubit();
    println!(
        "Logical |{}⟩ = ({:.4})|0⟩ + ({:.4})|1⟩\n",
        trace.initial_state,
        logical.alpha(),
        logical.beta()
    );
    println!("{}", style("After encoding").bold());
    print!("{}", trace.encoded);
    println!("{}", style("After error").bold());
    print!("{}", trace.with_error);
    println!("{}", style("After correction").bold());
    print!("{}", trace.corrected);
    println!();
    println!("Encoding fidelity: {:.6}", trace.encoding_fidelity);
    println!("Recovery fidelity: {:.6}", trace.recovery_fidelity);
    Ok(())
}

fn print_report(report: &PipelineReport, opts: &RunOpts) -> Result<()> {
    if opts.json() {
        return emit_json(report);
    }

    if !opts.no_circuit {
        println!("{}\n", report.circuit);
    }

    let errors = if report.injected_errors.is_empty() {
        "none".to_string()
    } else {
        report
            .injected_errors
            .iter()
            .map(|q| format!("q{}", q))
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("Initial state: |{}⟩   injected errors: {}", report.initial_state, errors);
    println!();

    print_counts("Before correction", &report.noisy_counts);
    match report.corrected_qubit {
        Some(q) => println!("{} flipping q{} back", style("Error detected:").yellow().bold(), q),
        None => println!("{}", style("No error detected").green()),
    }
    println!();
    print_counts("After correction", &report.corrected_counts);

    let verdict = if report.is_restored() {
        style(format!("Success rate: {:.1}%", report.success_rate * 100.0)).green().bold()
    } else {
        style(format!("Success rate: {:.1}%", report.success_rate * 100.0)).red().bold()
    };
    println!("{}", verdict);
    Ok(())
}

fn print_counts(title: &str, counts: &Counts) {
    println!("{} ({} shots)", style(title).bold(), counts.total());
    print!("{}", counts);
}

fn print_analysis(analysis: &MeasurementAnalysis) {
    println!("{} ({} shots)", style("Majority vote").bold(), analysis.total_shots);
    for outcome in &analysis.outcomes {
        println!(
            "  |{}⟩ {} times ({:.1}%) -> majority {}",
            outcome.bits, outcome.count, outcome.percentage, outcome.vote.majority_bit
        );
        match outcome.vote.error_position {
            Some(q) => println!(
                "    {} on q{}, corrects to |{}⟩",
                style("error").yellow(),
                q,
                outcome.corrected_to
            ),
            None => println!("    {}", style("no error").green()),
        }
    }
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
