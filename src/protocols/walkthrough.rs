// src/protocols/walkthrough.rs
use super::{
    PreparedState, VERIFY_REGISTER, conditional_test_circuit, superposition_circuit, teleportation_circuit,
    verification_circuit,
};
use crate::config::WalkthroughConfig;
use crate::core::Result;
use crate::simulation::{Backend, SimulationResult};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Results of every stage of one walkthrough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkthroughReport {
    /// State that was teleported
    pub state: PreparedState,
    /// H + measure on a single qubit
    pub superposition: SimulationResult,
    /// Measure then conditional X
    pub conditional: SimulationResult,
    /// The bare teleportation circuit
    pub teleportation: SimulationResult,
    /// Teleportation followed by a measurement of Bob's qubit in ψ's basis
    pub verification: SimulationResult,
}

impl WalkthroughReport {
    /// Fraction of verification shots where the `verify` register read the
    /// bit expected for the teleported state.
    pub fn verification_success_rate(&self) -> Result<f64> {
        let verify = self.verification.register_counts(VERIFY_REGISTER)?;
        Ok(verify.probability(self.state.expected_bit()))
    }
}

impl fmt::Display for WalkthroughReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Superposition counts: {}", self.superposition.counts())?;
        writeln!(f, "Conditional test counts: {}", self.conditional.counts())?;
        writeln!(f, "Teleportation counts: {}", self.teleportation.counts())?;
        writeln!(f, "Verification counts ({}): {}", self.state, self.verification.counts())?;
        match self.verification_success_rate() {
            Ok(rate) => writeln!(f, "Verification success rate: {:.1}%", rate * 100.0),
            Err(e) => writeln!(f, "Verification success rate unavailable: {}", e),
        }
    }
}

/// Runs the four stages in order on `backend`: superposition, conditional
/// test, teleportation, verification.
pub fn run_walkthrough<B: Backend + ?Sized>(backend: &B, config: &WalkthroughConfig) -> Result<WalkthroughReport> {
    let state = config.state;
    info!(backend = backend.name(), %state, "Starting teleportation walkthrough");

    let superposition = superposition_circuit()?;
    info!(shots = config.superposition_shots, "Stage 1: superposition");
    let superposition = backend.run(&superposition, config.superposition_shots)?;

    let conditional = conditional_test_circuit()?;
    info!(shots = config.conditional_shots, "Stage 2: conditional operation test");
    let conditional = backend.run(&conditional, config.conditional_shots)?;

    let (teleport, layout) = teleportation_circuit(state)?;
    debug!(operations = teleport.len(), depth = teleport.depth(), "Teleportation circuit built");
    info!(shots = config.teleport_shots, "Stage 3: teleportation");
    let teleportation = backend.run(&teleport, config.teleport_shots)?;

    let verify = verification_circuit(&teleport, &layout, state)?;
    info!(shots = config.verify_shots, "Stage 4: verification");
    let verification = backend.run(&verify, config.verify_shots)?;

    let report = WalkthroughReport { state, superposition, conditional, teleportation, verification };
    let rate = report.verification_success_rate()?;
    info!(success_rate = rate, "Walkthrough finished");
    Ok(report)
}
