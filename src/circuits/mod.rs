// src/circuits/mod.rs

//! Ordered sequences of [`Operation`]s over named quantum and classical
//! registers.
//!
//! `Circuit` exposes qiskit-style gate methods (`h`, `cx`, `measure`, ...)
//! that return `&mut Self`, so a classical condition can be chained onto the
//! gate it guards:
//!
//! ```
//! # use qteleport::{Circuit, TeleportError};
//! # fn main() -> Result<(), TeleportError> {
//! let mut qc = Circuit::new();
//! let q = qc.add_quantum_register("tq", 1)?;
//! let c = qc.add_classical_register("tc", 1)?;
//! qc.measure(q.bit(0)?, c.bit(0)?)?;
//! qc.x(q.bit(0)?)?.c_if(c.bit(0)?, 1)?;
//! assert_eq!(qc.len(), 2);
//! # Ok(())
//! # }
//! ```

mod draw;
mod registers;

pub use registers::{ClassicalRegister, QuantumRegister};

use crate::core::{ClbitId, QubitId, Result, TeleportError};
use crate::operations::{Condition, Gate, Operation};
use std::collections::BTreeMap;
use std::fmt;

/// An ordered list of operations acting on a set of registers.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    /// Order is execution order.
    operations: Vec<Operation>,
    num_qubits: usize,
    num_clbits: usize,
}

impl Circuit {
    /// Creates a new, empty circuit with no registers.
    pub fn new() -> Self {
        Self {
            qregs: Vec::new(),
            cregs: Vec::new(),
            operations: Vec::new(),
            num_qubits: 0,
            num_clbits: 0,
        }
    }

    /// Creates a circuit with a quantum register `q` of `num_qubits` and a
    /// classical register `c` of `num_clbits`. Zero-sized registers are skipped.
    pub fn with_size(num_qubits: usize, num_clbits: usize) -> Self {
        let mut circuit = Self::new();
        if num_qubits > 0 {
            circuit.qregs.push(QuantumRegister::new("q", num_qubits, 0));
            circuit.num_qubits = num_qubits;
        }
        if num_clbits > 0 {
            circuit.cregs.push(ClassicalRegister::new("c", num_clbits, 0));
            circuit.num_clbits = num_clbits;
        }
        circuit
    }

    /// Appends a quantum register and returns its handle.
    pub fn add_quantum_register(&mut self, name: &str, size: usize) -> Result<QuantumRegister> {
        self.check_register_name(name)?;
        let reg = QuantumRegister::new(name, size, self.num_qubits);
        self.num_qubits += size;
        self.qregs.push(reg.clone());
        Ok(reg)
    }

    /// Appends a classical register and returns its handle.
    ///
    /// Bits of a later register sit to the *left* of earlier ones in count
    /// keys, see [`Counts`](crate::simulation::Counts).
    pub fn add_classical_register(&mut self, name: &str, size: usize) -> Result<ClassicalRegister> {
        self.check_register_name(name)?;
        let reg = ClassicalRegister::new(name, size, self.num_clbits);
        self.num_clbits += size;
        self.cregs.push(reg.clone());
        Ok(reg)
    }

    fn check_register_name(&self, name: &str) -> Result<()> {
        let taken = self.qregs.iter().any(|r| r.name() == name)
            || self.cregs.iter().any(|r| r.name() == name);
        if taken {
            return Err(TeleportError::DuplicateRegister { name: name.to_string() });
        }
        Ok(())
    }

    /// Quantum registers in the order they were added.
    pub fn quantum_registers(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in the order they were added.
    pub fn classical_registers(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Looks up a quantum register by name.
    pub fn quantum_register(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name() == name)
    }

    /// Looks up a classical register by name.
    pub fn classical_register(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name() == name)
    }

    /// Total number of qubits across all quantum registers.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total number of classical bits across all classical registers.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    fn check_qubit(&self, qubit: QubitId) -> Result<()> {
        if qubit.0 < self.num_qubits {
            Ok(())
        } else {
            Err(TeleportError::InvalidQubit { index: qubit.0, size: self.num_qubits })
        }
    }

    fn check_clbit(&self, clbit: ClbitId) -> Result<()> {
        if clbit.0 < self.num_clbits {
            Ok(())
        } else {
            Err(TeleportError::InvalidClbit { index: clbit.0, size: self.num_clbits })
        }
    }

    fn validate(&self, op: &Operation) -> Result<()> {
        for qubit in op.involved_qubits() {
            self.check_qubit(qubit)?;
        }
        for clbit in op.involved_clbits() {
            self.check_clbit(clbit)?;
        }
        match op {
            Operation::Controlled { control, target, .. } if control == target => {
                Err(TeleportError::InvalidOperation {
                    message: format!("Control and target cannot be the same qubit ({})", control),
                })
            }
            Operation::Conditioned { condition, op } => {
                if condition.value > 1 {
                    return Err(TeleportError::InvalidOperation {
                        message: format!("Condition value {} is not a bit value", condition.value),
                    });
                }
                self.validate(op)
            }
            _ => Ok(()),
        }
    }

    /// Appends an operation after checking every qubit and bit it touches.
    pub fn add_operation(&mut self, op: Operation) -> Result<&mut Self> {
        self.validate(&op)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Appends every operation from `ops`, stopping at the first invalid one.
    pub fn add_operations<I>(&mut self, ops: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op)?;
        }
        Ok(self)
    }

    /// Applies a single-qubit gate.
    pub fn gate(&mut self, gate: Gate, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Gate { gate, target })
    }

    /// Hadamard on `target`.
    pub fn h(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(Gate::H, target)
    }

    /// Pauli-X on `target`.
    pub fn x(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(Gate::X, target)
    }

    /// Pauli-Y on `target`.
    pub fn y(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(Gate::Y, target)
    }

    /// Pauli-Z on `target`.
    pub fn z(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(Gate::Z, target)
    }

    /// S gate on `target`.
    pub fn s(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(Gate::S, target)
    }

    /// T gate on `target`.
    pub fn t(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(Gate::T, target)
    }

    /// Controlled-X (CNOT).
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Controlled { gate: Gate::X, control, target })
    }

    /// Controlled-Z.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Controlled { gate: Gate::Z, control, target })
    }

    /// Measures `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> Result<&mut Self> {
        self.add_operation(Operation::Measure { qubit, clbit })
    }

    /// Barrier across every qubit in the circuit.
    pub fn barrier(&mut self) -> Result<&mut Self> {
        let qubits = (0..self.num_qubits).map(QubitId).collect();
        self.add_operation(Operation::Barrier { qubits })
    }

    /// Barrier across the given qubits only.
    pub fn barrier_on(&mut self, qubits: &[QubitId]) -> Result<&mut Self> {
        self.add_operation(Operation::Barrier { qubits: qubits.to_vec() })
    }

    /// Makes the most recently added operation conditional on `clbit == value`.
    ///
    /// Fails when the circuit is empty or the last operation is a
    /// measurement, a barrier or already conditioned.
    pub fn c_if(&mut self, clbit: ClbitId, value: u8) -> Result<&mut Self> {
        self.check_clbit(clbit)?;
        if value > 1 {
            return Err(TeleportError::InvalidOperation {
                message: format!("Condition value {} is not a bit value", value),
            });
        }
        let last = self.operations.pop().ok_or_else(|| TeleportError::InvalidOperation {
            message: "c_if called on an empty circuit".to_string(),
        })?;
        if !last.is_conditionable() {
            let message = format!("Operation '{}' cannot be classically conditioned", last.name());
            self.operations.push(last);
            return Err(TeleportError::InvalidOperation { message });
        }
        self.operations.push(Operation::Conditioned {
            condition: Condition { clbit, value },
            op: Box::new(last),
        });
        Ok(self)
    }

    /// Operations in execution order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations, barriers included.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Whether any operation is a measurement (conditioned or not).
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(|op| op.name() == "measure")
    }

    /// Number of layers on the longest wire. Barriers are not counted;
    /// classical bits count as wires so conditions serialise after the
    /// measurements they read.
    pub fn depth(&self) -> usize {
        let mut qubit_levels = vec![0usize; self.num_qubits];
        let mut clbit_levels = vec![0usize; self.num_clbits];
        let mut depth = 0;
        for op in &self.operations {
            if matches!(op, Operation::Barrier { .. }) {
                continue;
            }
            let qubits = op.involved_qubits();
            let clbits = op.involved_clbits();
            let level = qubits
                .iter()
                .map(|q| qubit_levels[q.0])
                .chain(clbits.iter().map(|c| clbit_levels[c.0]))
                .max()
                .unwrap_or(0)
                + 1;
            for q in qubits {
                qubit_levels[q.0] = level;
            }
            for c in clbits {
                clbit_levels[c.0] = level;
            }
            depth = depth.max(level);
        }
        depth
    }

    /// Tally of operation names, e.g. `{"h": 3, "cx": 2, "measure": 2}`.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.name()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.draw(None))
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Chainable builder for [`Circuit`].
///
/// Errors are held back until [`build`](Self::build), so a whole protocol can
/// be written as one expression.
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<TeleportError>,
}

impl CircuitBuilder {
    /// Builder over an empty circuit without registers.
    pub fn new() -> Self {
        Self { circuit: Circuit::new(), error: None }
    }

    /// Builder over [`Circuit::with_size`].
    pub fn with_size(num_qubits: usize, num_clbits: usize) -> Self {
        Self { circuit: Circuit::with_size(num_qubits, num_clbits), error: None }
    }

    fn apply<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Circuit) -> Result<()>,
    {
        if self.error.is_none() {
            if let Err(e) = f(&mut self.circuit) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Adds a single operation.
    pub fn add_op(self, op: Operation) -> Self {
        self.apply(|c| c.add_operation(op).map(|_| ()))
    }

    /// Adds every operation from `ops`.
    pub fn add_ops<I>(self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.apply(|c| c.add_operations(ops).map(|_| ()))
    }

    /// Hadamard on `target`.
    pub fn h(self, target: usize) -> Self {
        self.apply(|c| c.h(QubitId(target)).map(|_| ()))
    }

    /// Pauli-X on `target`.
    pub fn x(self, target: usize) -> Self {
        self.apply(|c| c.x(QubitId(target)).map(|_| ()))
    }

    /// Pauli-Z on `target`.
    pub fn z(self, target: usize) -> Self {
        self.apply(|c| c.z(QubitId(target)).map(|_| ()))
    }

    /// CNOT from `control` to `target`.
    pub fn cx(self, control: usize, target: usize) -> Self {
        self.apply(|c| c.cx(QubitId(control), QubitId(target)).map(|_| ()))
    }

    /// Measures `qubit` into `clbit`.
    pub fn measure(self, qubit: usize, clbit: usize) -> Self {
        self.apply(|c| c.measure(QubitId(qubit), ClbitId(clbit)).map(|_| ()))
    }

    /// Barrier across all qubits.
    pub fn barrier(self) -> Self {
        self.apply(|c| c.barrier().map(|_| ()))
    }

    /// Conditions the previous operation on `clbit == value`.
    pub fn c_if(self, clbit: usize, value: u8) -> Self {
        self.apply(|c| c.c_if(ClbitId(clbit), value).map(|_| ()))
    }

    /// Returns the built circuit, or the first error encountered while building.
    pub fn build(self) -> Result<Circuit> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
