//! Circuits of the walkthrough.
//!
//! Qubit layout of the teleportation circuit:
//!
//! | qubit  | role                                 |
//! |--------|--------------------------------------|
//! | `q[0]` | message ψ, the state being sent      |
//! | `q[1]` | Alice's half of the Bell pair        |
//! | `q[2]` | Bob's half, receives ψ               |
//!
//! `c[0]` carries the outcome of measuring `q[0]` (drives the Z correction)
//! and `c[1]` the outcome of measuring `q[1]` (drives the X correction).

use super::PreparedState;
use crate::circuits::{Circuit, ClassicalRegister, QuantumRegister};
use crate::core::{ClbitId, QubitId, Result};

/// Name of the classical register added by [`verification_circuit`].
pub const VERIFY_REGISTER: &str = "verify";

/// Where the protocol's qubits and bits live in the teleportation circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeleportationLayout {
    /// 3-qubit register `q`
    pub qreg: QuantumRegister,
    /// 2-bit register `c`
    pub creg: ClassicalRegister,
    /// `q[0]`
    pub message: QubitId,
    /// `q[1]`
    pub alice: QubitId,
    /// `q[2]`
    pub bob: QubitId,
    /// `c[0]`, result of measuring the message qubit
    pub z_bit: ClbitId,
    /// `c[1]`, result of measuring Alice's qubit
    pub x_bit: ClbitId,
}

/// One qubit put into superposition and measured.
pub fn superposition_circuit() -> Result<Circuit> {
    let mut qc = Circuit::with_size(1, 1);
    qc.h(QubitId(0))?;
    qc.measure(QubitId(0), ClbitId(0))?;
    Ok(qc)
}

/// Sanity check for classical conditions: measure `tq[0]` into `tc[0]`,
/// then flip `tq[0]` only if the bit read 1.
pub fn conditional_test_circuit() -> Result<Circuit> {
    let mut qc = Circuit::new();
    let tq = qc.add_quantum_register("tq", 1)?;
    let tc = qc.add_classical_register("tc", 1)?;
    qc.measure(tq.bit(0)?, tc.bit(0)?)?;
    qc.x(tq.bit(0)?)?.c_if(tc.bit(0)?, 1)?;
    Ok(qc)
}

/// Builds the teleportation protocol for `state`, steps separated by barriers.
pub fn teleportation_circuit(state: PreparedState) -> Result<(Circuit, TeleportationLayout)> {
    let mut qc = Circuit::new();
    let q = qc.add_quantum_register("q", 3)?;
    let c = qc.add_classical_register("c", 2)?;
    let layout = TeleportationLayout {
        message: q.bit(0)?,
        alice: q.bit(1)?,
        bob: q.bit(2)?,
        z_bit: c.bit(0)?,
        x_bit: c.bit(1)?,
        qreg: q,
        creg: c,
    };

    // Step 1: prepare ψ on the message qubit
    for gate in state.preparation() {
        qc.gate(*gate, layout.message)?;
    }
    qc.barrier()?;

    // Step 2: entangle Alice and Bob
    qc.h(layout.alice)?;
    qc.cx(layout.alice, layout.bob)?;
    qc.barrier()?;

    // Step 3: rotate ψ and A into the Bell basis
    qc.cx(layout.message, layout.alice)?;
    qc.h(layout.message)?;
    qc.barrier()?;

    // Step 4: measure ψ and A
    qc.measure(layout.message, layout.z_bit)?;
    qc.measure(layout.alice, layout.x_bit)?;
    qc.barrier()?;

    // Step 5: Bob's corrections
    qc.x(layout.bob)?.c_if(layout.x_bit, 1)?;
    qc.z(layout.bob)?.c_if(layout.z_bit, 1)?;

    Ok((qc, layout))
}

/// Copies `teleport` and appends a measurement of Bob's qubit in the basis of
/// `state`, written to a fresh 1-bit register [`VERIFY_REGISTER`].
pub fn verification_circuit(
    teleport: &Circuit,
    layout: &TeleportationLayout,
    state: PreparedState,
) -> Result<Circuit> {
    let mut qc = teleport.clone();
    qc.barrier()?;
    for gate in state.basis_change() {
        qc.gate(*gate, layout.bob)?;
    }
    let verify = qc.add_classical_register(VERIFY_REGISTER, 1)?;
    qc.measure(layout.bob, verify.bit(0)?)?;
    Ok(qc)
}
