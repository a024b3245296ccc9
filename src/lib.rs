// src/lib.rs

//! `qteleport` - A step-by-step walkthrough of the quantum teleportation
//! protocol.
//!
//! The library provides a small circuit model (registers, gates, classically
//! conditioned operations), a shot-based state-vector simulator that samples
//! measurements with Born-rule probabilities, and the circuits of the
//! walkthrough itself: a superposition demo, a conditional-operation check,
//! the teleportation circuit and its verification.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod visualization;
pub mod config;
pub mod protocols;

// Re-export the most common types for easier top-level use
pub use crate::core::{ClbitId, QubitId, Result, StateVector, TeleportError};
pub use operations::{Condition, Gate, Operation};
pub use circuits::{Circuit, CircuitBuilder, ClassicalRegister, QuantumRegister};
pub use simulation::{get_backend, Backend, Counts, SimulationResult, Simulator};
pub use validation::{check_normalization, fidelity, qubit_probability_one};
pub use visualization::plot_histogram;
pub use config::Config;
pub use protocols::{
    conditional_test_circuit, run_walkthrough, superposition_circuit, teleportation_circuit, verification_circuit,
    PreparedState, TeleportationLayout, WalkthroughReport,
};

// Example 1: Single qubit superposition
// H puts |0> into an equal superposition; measuring it gives 0 and 1
// with roughly equal frequency.
/// ```
/// use qteleport::{get_backend, superposition_circuit, TeleportError};
///
/// fn main() -> Result<(), TeleportError> {
///     let circuit = superposition_circuit()?;
///     let backend = get_backend("qasm_simulator")?;
///     let result = backend.run(&circuit, 1024)?;
///
///     println!("Circuit:\n{}", circuit);
///     println!("Counts: {}", result.counts());
///
///     let counts = result.counts();
///     assert_eq!(counts.total(), 1024);
///     assert!(counts.get("0") > 400 && counts.get("1") > 400);
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Teleporting |+> and checking that Bob received it
// Rotating Bob's qubit back with H must always read 0 in the `verify` register.
/// ```
/// use qteleport::{teleportation_circuit, verification_circuit, PreparedState, Simulator, TeleportError};
///
/// fn main() -> Result<(), TeleportError> {
///     let (teleport, layout) = teleportation_circuit(PreparedState::Plus)?;
///     let verify = verification_circuit(&teleport, &layout, PreparedState::Plus)?;
///
///     let result = Simulator::with_seed(2024).run(&verify, 100)?;
///     let verify_counts = result.register_counts("verify")?;
///
///     println!("Circuit:\n{}", verify.draw(Some(8)));
///     println!("verify register: {}", verify_counts);
///     assert_eq!(verify_counts.get("0"), 100);
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = ();
