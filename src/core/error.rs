//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Flat, circuit-wide index of a qubit.
///
/// Registers hand these out via [`QuantumRegister::bit`](crate::circuits::QuantumRegister::bit);
/// the index doubles as the bit position inside a state vector basis index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q({})", self.0)
    }
}

/// Flat, circuit-wide index of a classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClbitId(pub usize);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c({})", self.0)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TeleportError>;

/// Errors raised while building circuits, configuring or running a backend.
#[derive(Debug, Error)]
pub enum TeleportError {
    /// A qubit index outside the circuit or register.
    #[error("Invalid qubit index {index} (size {size})")]
    InvalidQubit {
        /// Offending index
        index: usize,
        /// Number of qubits available
        size: usize,
    },

    /// A classical bit index outside the circuit or register.
    #[error("Invalid classical bit index {index} (size {size})")]
    InvalidClbit {
        /// Offending index
        index: usize,
        /// Number of classical bits available
        size: usize,
    },

    /// An operation that is inconsistent with the circuit it is applied to.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// A register name that already exists in the circuit.
    #[error("Register '{name}' already exists in circuit")]
    DuplicateRegister {
        /// Register name
        name: String,
    },

    /// No backend is registered under the requested name.
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    /// Failure inside the simulator while evolving a shot.
    #[error("Simulation Process Error: {message}")]
    SimulationError {
        /// SimulationError failure message
        message: String,
    },

    /// The state vector drifted away from unit norm.
    #[error("Incoherence Violation: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for TeleportError {
    fn from(e: serde_yaml::Error) -> Self {
        TeleportError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for TeleportError {
    fn from(e: serde_json::Error) -> Self {
        TeleportError::Serialization(e.to_string())
    }
}
