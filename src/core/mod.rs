// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

// Re-export public types for convenient access via `qteleport::core::TypeName`
pub use error::{ClbitId, QubitId, Result, TeleportError};
pub use state::{MAX_QUBITS, StateVector};
