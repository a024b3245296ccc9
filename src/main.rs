//! qteleport CLI
//!
//! Runs the stages of the teleportation walkthrough on the built-in
//! simulator and prints circuits, counts and histograms.
//!
//! # Usage
//!
//! ```bash
//! # Whole walkthrough with defaults
//! qteleport walkthrough
//!
//! # Teleport |-> and verify it with 2048 shots, reproducibly
//! qteleport --state minus --shots 2048 --seed 7 verify
//!
//! # Counts as JSON
//! qteleport --json superposition
//!
//! # Draw the teleportation circuit folded every 6 columns
//! qteleport draw teleport --fold 6
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use qteleport::config::{CliOverrides, Config};
use qteleport::protocols::VERIFY_REGISTER;
use qteleport::{
    Circuit, PreparedState, Result, SimulationResult, Simulator, conditional_test_circuit, plot_histogram,
    run_walkthrough, superposition_circuit, teleportation_circuit, verification_circuit,
};

/// Width of histogram bars in terminal cells.
const HISTOGRAM_WIDTH: usize = 40;
/// Columns per row when drawing the teleportation circuits.
const TELEPORT_FOLD: usize = 15;

/// Quantum teleportation walkthrough
#[derive(Parser)]
#[command(name = "qteleport")]
#[command(version)]
#[command(about = "Step-by-step quantum teleportation on a shot-based simulator")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Backend name
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Seed for measurement sampling
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Shots for every sampling stage
    #[arg(long, global = true)]
    shots: Option<u32>,

    /// State to teleport (zero, one, plus, minus, plus-i)
    #[arg(long, global = true)]
    state: Option<PreparedState>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hadamard on one qubit, then measure
    Superposition,

    /// Measure, then X conditioned on the measured bit
    Conditional,

    /// Run the teleportation circuit
    Teleport,

    /// Teleport and measure Bob's qubit in the basis of the sent state
    Verify,

    /// Run every stage in order
    Walkthrough,

    /// Print a circuit diagram without running it
    Draw {
        /// Which circuit to draw
        #[arg(value_enum)]
        circuit: CircuitKind,

        /// Wrap the diagram every N columns (teleport and verify default to 15)
        #[arg(long)]
        fold: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CircuitKind {
    Superposition,
    Conditional,
    Teleport,
    Verify,
}

impl CircuitKind {
    fn default_fold(self) -> Option<usize> {
        match self {
            CircuitKind::Superposition | CircuitKind::Conditional => None,
            CircuitKind::Teleport | CircuitKind::Verify => Some(TELEPORT_FOLD),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration, then layer CLI flags on top
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&CliOverrides {
        log_level: cli.log_level,
        backend: cli.backend,
        seed: cli.seed,
        shots: cli.shots,
        state: cli.state,
    });

    init_logging(&config.logging.level);
    config.validate()?;
    debug!(?config, "Effective configuration");

    let simulator = Simulator::from_config(&config.simulator)?;
    let w = &config.walkthrough;

    match cli.command {
        Commands::Superposition => {
            let circuit = superposition_circuit()?;
            let result = simulator.run(&circuit, w.superposition_shots)?;
            report("Superposition", &circuit, None, &result, cli.json)?;
        }

        Commands::Conditional => {
            let circuit = conditional_test_circuit()?;
            let result = simulator.run(&circuit, w.conditional_shots)?;
            report("Conditional operation test", &circuit, None, &result, cli.json)?;
        }

        Commands::Teleport => {
            let (circuit, _) = teleportation_circuit(w.state)?;
            let result = simulator.run(&circuit, w.teleport_shots)?;
            report(&format!("Teleportation of {}", w.state), &circuit, Some(TELEPORT_FOLD), &result, cli.json)?;
        }

        Commands::Verify => {
            let (teleport, layout) = teleportation_circuit(w.state)?;
            let circuit = verification_circuit(&teleport, &layout, w.state)?;
            let result = simulator.run(&circuit, w.verify_shots)?;
            report(&format!("Verification of {}", w.state), &circuit, Some(TELEPORT_FOLD), &result, cli.json)?;
            if !cli.json {
                let verify = result.register_counts(VERIFY_REGISTER)?;
                println!(
                    "'{}' register read {} in {:.1}% of shots",
                    VERIFY_REGISTER,
                    w.state.expected_bit(),
                    verify.probability(w.state.expected_bit()) * 100.0
                );
            }
        }

        Commands::Walkthrough => {
            info!(state = %w.state, "Running full walkthrough");
            let report = run_walkthrough(&simulator, w)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (title, kind, result) in [
                    ("Superposition", CircuitKind::Superposition, &report.superposition),
                    ("Conditional operation test", CircuitKind::Conditional, &report.conditional),
                    ("Teleportation", CircuitKind::Teleport, &report.teleportation),
                    ("Verification", CircuitKind::Verify, &report.verification),
                ] {
                    println!("== {} ==", title);
                    print!("{}", build(kind, w.state)?.draw(kind.default_fold()));
                    println!();
                    print!("{}", plot_histogram(result.counts(), HISTOGRAM_WIDTH));
                    println!();
                }
                print!("{}", report);
            }
        }

        Commands::Draw { circuit: kind, fold } => {
            let circuit = build(kind, w.state)?;
            print!("{}", circuit.draw(fold.or(kind.default_fold())));
        }
    }

    Ok(())
}

/// Initialize logging with tracing. Logs go to stderr so stdout stays
/// parseable with `--json`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn build(kind: CircuitKind, state: PreparedState) -> Result<Circuit> {
    match kind {
        CircuitKind::Superposition => superposition_circuit(),
        CircuitKind::Conditional => conditional_test_circuit(),
        CircuitKind::Teleport => teleportation_circuit(state).map(|(circuit, _)| circuit),
        CircuitKind::Verify => {
            let (teleport, layout) = teleportation_circuit(state)?;
            verification_circuit(&teleport, &layout, state)
        }
    }
}

fn report(title: &str, circuit: &Circuit, fold: Option<usize>, result: &SimulationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!("== {} ==", title);
    print!("{}", circuit.draw(fold));
    println!();
    println!("Counts: {}", result.counts());
    print!("{}", plot_histogram(result.counts(), HISTOGRAM_WIDTH));
    Ok(())
}
