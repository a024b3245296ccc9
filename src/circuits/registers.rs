// src/circuits/registers.rs

//! Named quantum and classical registers.
//!
//! A register is a handle onto a contiguous slice of the circuit's flat qubit
//! (or classical bit) space. Handles are created by
//! [`Circuit::add_quantum_register`](super::Circuit::add_quantum_register) and
//! [`Circuit::add_classical_register`](super::Circuit::add_classical_register),
//! which assign the offset.

use crate::core::{ClbitId, QubitId, Result, TeleportError};
use std::fmt;

/// Handle onto `size` qubits starting at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantumRegister {
    name: String,
    size: usize,
    offset: usize,
}

impl QuantumRegister {
    pub(crate) fn new(name: &str, size: usize, offset: usize) -> Self {
        Self { name: name.to_string(), size, offset }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits in the register.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat index of the register's first qubit.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Qubit `index` of this register.
    pub fn bit(&self, index: usize) -> Result<QubitId> {
        if index < self.size {
            Ok(QubitId(self.offset + index))
        } else {
            Err(TeleportError::InvalidQubit { index, size: self.size })
        }
    }

    /// All qubits of the register in order.
    pub fn bits(&self) -> Vec<QubitId> {
        (self.offset..self.offset + self.size).map(QubitId).collect()
    }

    /// Whether `qubit` belongs to this register.
    pub fn contains(&self, qubit: QubitId) -> bool {
        (self.offset..self.offset + self.size).contains(&qubit.0)
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuantumRegister({}, '{}')", self.size, self.name)
    }
}

/// Handle onto `size` classical bits starting at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalRegister {
    name: String,
    size: usize,
    offset: usize,
}

impl ClassicalRegister {
    pub(crate) fn new(name: &str, size: usize, offset: usize) -> Self {
        Self { name: name.to_string(), size, offset }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bits in the register.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat index of the register's first bit.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Classical bit `index` of this register.
    pub fn bit(&self, index: usize) -> Result<ClbitId> {
        if index < self.size {
            Ok(ClbitId(self.offset + index))
        } else {
            Err(TeleportError::InvalidClbit { index, size: self.size })
        }
    }

    /// All bits of the register in order.
    pub fn bits(&self) -> Vec<ClbitId> {
        (self.offset..self.offset + self.size).map(ClbitId).collect()
    }

    /// Whether `clbit` belongs to this register.
    pub fn contains(&self, clbit: ClbitId) -> bool {
        (self.offset..self.offset + self.size).contains(&clbit.0)
    }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassicalRegister({}, '{}')", self.size, self.name)
    }
}
