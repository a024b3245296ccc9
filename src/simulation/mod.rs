// src/simulation/mod.rs

//! Shot-based execution of [`Circuit`]s.
//!
//! [`Simulator`] is the `qasm_simulator` backend: every shot starts from
//! `|0...0>`, applies the circuit in order, samples measurements with
//! Born-rule probabilities and records the classical bits as one count key.

mod results;
pub(crate) mod engine;

pub use results::{Counts, SimulationResult};

use crate::circuits::Circuit;
use crate::config::SimulatorConfig;
use crate::core::{Result, StateVector, TeleportError};
use engine::SimulationEngine;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Name of the default shot-based backend.
pub const QASM_SIMULATOR: &str = "qasm_simulator";
/// Alias accepted for the same backend.
pub const AER_SIMULATOR: &str = "aer_simulator";
/// Every backend name [`get_backend`] resolves.
pub const AVAILABLE_BACKENDS: &[&str] = &[QASM_SIMULATOR, AER_SIMULATOR];
/// Upper bound on shots for a single run.
pub const MAX_SHOTS: u32 = 1_000_000;

/// Something that can execute a circuit and report outcome counts.
pub trait Backend {
    /// Backend name.
    fn name(&self) -> &str;

    /// Runs `circuit` for `shots` repetitions.
    fn run(&self, circuit: &Circuit, shots: u32) -> Result<SimulationResult>;
}

/// Resolves a backend by name, like `Aer.get_backend("qasm_simulator")`.
pub fn get_backend(name: &str) -> Result<Simulator> {
    match name {
        QASM_SIMULATOR => Ok(Simulator::named(QASM_SIMULATOR)),
        AER_SIMULATOR => Ok(Simulator::named(AER_SIMULATOR)),
        _ => Err(TeleportError::BackendNotFound(name.to_string())),
    }
}

/// State-vector simulator with per-shot measurement sampling.
#[derive(Debug, Clone)]
pub struct Simulator {
    name: &'static str,
    seed: Option<u64>,
    validate_states: bool,
}

impl Simulator {
    /// Unseeded `qasm_simulator`.
    pub fn new() -> Self {
        Self::named(QASM_SIMULATOR)
    }

    fn named(name: &'static str) -> Self {
        Self { name, seed: None, validate_states: false }
    }

    /// `qasm_simulator` whose runs are reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::new() }
    }

    /// Builds the backend named in `config` with its seed and validation mode.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        let mut simulator = get_backend(&config.backend)?;
        simulator.seed = config.seed;
        simulator.validate_states = config.validate_states;
        Ok(simulator)
    }

    /// Enables or disables a normalisation check after every gate.
    pub fn validate_states(mut self, enabled: bool) -> Self {
        self.validate_states = enabled;
        self
    }

    /// Configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn make_rng(&self) -> (StdRng, u64) {
        let seed = self.seed.unwrap_or_else(rand::random::<u64>);
        (StdRng::seed_from_u64(seed), seed)
    }

    /// Runs `circuit` for `shots` repetitions and tallies the classical bits.
    ///
    /// # Errors
    /// * `InvalidOperation` if `shots` is zero or above [`MAX_SHOTS`].
    /// * Any error raised while executing an operation.
    pub fn run(&self, circuit: &Circuit, shots: u32) -> Result<SimulationResult> {
        if shots == 0 || shots > MAX_SHOTS {
            return Err(TeleportError::InvalidOperation {
                message: format!("Shot count {} outside 1..={}", shots, MAX_SHOTS),
            });
        }
        let (mut rng, seed) = self.make_rng();
        info!(
            backend = self.name,
            shots,
            seed,
            num_qubits = circuit.num_qubits(),
            num_clbits = circuit.num_clbits(),
            "Running circuit"
        );

        let registers = circuit.classical_registers();
        let mut result = SimulationResult::new(self.name, shots, seed, registers);
        let mut engine = SimulationEngine::init(circuit.num_qubits(), circuit.num_clbits(), self.validate_states)?;

        for shot in 0..shots {
            if shot > 0 {
                engine.reset()?;
            }
            for op in circuit.operations() {
                engine.execute(op, &mut rng)?;
            }
            result.record_shot(results::format_bitstring(registers, engine.clbits()));
        }

        debug!(counts = %result.counts(), "Run finished");
        Ok(result)
    }

    /// Final state vector of a single shot.
    ///
    /// For circuits with measurements the state is the post-measurement
    /// branch the sampled outcomes selected.
    pub fn statevector(&self, circuit: &Circuit) -> Result<StateVector> {
        let (mut rng, _) = self.make_rng();
        let mut engine = SimulationEngine::init(circuit.num_qubits(), circuit.num_clbits(), self.validate_states)?;
        for op in circuit.operations() {
            engine.execute(op, &mut rng)?;
        }
        Ok(engine.state().clone())
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Simulator {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&self, circuit: &Circuit, shots: u32) -> Result<SimulationResult> {
        Simulator::run(self, circuit, shots)
    }
}
