// src/operations/mod.rs

//! Gates, measurements and classically conditioned operations that make up a
//! [`Circuit`](crate::circuits::Circuit).

use crate::core::{ClbitId, QubitId};
use num_complex::Complex;
use num_traits::{One, Zero};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};
use std::fmt;

/// 2x2 complex matrix acting on a single qubit.
pub type Matrix2 = [[Complex<f64>; 2]; 2];

/// Single-qubit gates available to circuits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Identity
    I,
    /// Hadamard
    H,
    /// Pauli-X (bit flip)
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z (phase flip)
    Z,
    /// Phase (PI/2)
    S,
    /// Inverse of `S`
    Sdg,
    /// Phase (PI/4)
    T,
    /// Inverse of `T`
    Tdg,
    /// Phase shift `diag(1, e^(i*theta))`
    Phase(f64),
}

impl Gate {
    /// Returns the 2x2 unitary for this gate in the `{|0>, |1>}` basis.
    pub fn matrix(&self) -> Matrix2 {
        let one = Complex::one();
        let zero = Complex::zero();
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        match self {
            Gate::I => [[one, zero], [zero, one]],
            Gate::H => [[h, h], [h, -h]],
            Gate::X => [[zero, one], [one, zero]],
            Gate::Y => [[zero, -Complex::i()], [Complex::i(), zero]],
            Gate::Z => [[one, zero], [zero, -one]],
            Gate::S => phase_matrix(2.0 * FRAC_PI_4),
            Gate::Sdg => phase_matrix(-2.0 * FRAC_PI_4),
            Gate::T => phase_matrix(FRAC_PI_4),
            Gate::Tdg => phase_matrix(-FRAC_PI_4),
            Gate::Phase(theta) => phase_matrix(*theta),
        }
    }

    /// Lower-case gate name as used by `count_ops`.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::I => "id",
            Gate::H => "h",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::Phase(_) => "p",
        }
    }

    /// Symbol drawn in circuit diagrams.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::I => "I",
            Gate::H => "H",
            Gate::X => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::S => "S",
            Gate::Sdg => "S†",
            Gate::T => "T",
            Gate::Tdg => "T†",
            Gate::Phase(_) => "P",
        }
    }
}

fn phase_matrix(theta: f64) -> Matrix2 {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), Complex::new(theta.cos(), theta.sin())],
    ]
}

/// Classical condition attached to an operation: run only if `clbit == value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// Classical bit that is tested.
    pub clbit: ClbitId,
    /// Required value (0 or 1).
    pub value: u8,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.clbit, self.value)
    }
}

/// A single step of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Single-qubit gate.
    Gate {
        /// Gate to apply
        gate: Gate,
        /// Target qubit
        target: QubitId,
    },
    /// Gate applied to `target` when `control` is `|1>` (CX, CZ, ...).
    Controlled {
        /// Gate applied to the target
        gate: Gate,
        /// Control qubit
        control: QubitId,
        /// Target qubit
        target: QubitId,
    },
    /// Projective measurement of `qubit` in the computational basis,
    /// result written to `clbit`.
    Measure {
        /// Measured qubit
        qubit: QubitId,
        /// Destination classical bit
        clbit: ClbitId,
    },
    /// Separator between protocol steps. No effect on the state.
    Barrier {
        /// Qubits the barrier spans
        qubits: Vec<QubitId>,
    },
    /// `op` executed only when `condition` holds at that point of the shot.
    Conditioned {
        /// Classical condition
        condition: Condition,
        /// Wrapped operation
        op: Box<Operation>,
    },
}

impl Operation {
    /// Qubits directly mentioned by the operation.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Gate { target, .. } => vec![*target],
            Operation::Controlled { control, target, .. } => vec![*control, *target],
            Operation::Measure { qubit, .. } => vec![*qubit],
            Operation::Barrier { qubits } => qubits.clone(),
            Operation::Conditioned { op, .. } => op.involved_qubits(),
        }
    }

    /// Classical bits read or written by the operation.
    pub fn involved_clbits(&self) -> Vec<ClbitId> {
        match self {
            Operation::Measure { clbit, .. } => vec![*clbit],
            Operation::Conditioned { condition, op } => {
                let mut bits = vec![condition.clbit];
                bits.extend(op.involved_clbits());
                bits
            }
            _ => Vec::new(),
        }
    }

    /// Name used when tallying operations.
    pub fn name(&self) -> String {
        match self {
            Operation::Gate { gate, .. } => gate.name().to_string(),
            Operation::Controlled { gate, .. } => format!("c{}", gate.name()),
            Operation::Measure { .. } => "measure".to_string(),
            Operation::Barrier { .. } => "barrier".to_string(),
            Operation::Conditioned { op, .. } => op.name(),
        }
    }

    /// Whether a classical condition may wrap this operation.
    pub(crate) fn is_conditionable(&self) -> bool {
        matches!(self, Operation::Gate { .. } | Operation::Controlled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a - b).norm() < 1e-12
    }

    fn mat_mul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
        let mut out = [[Complex::zero(); 2]; 2];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
            }
        }
        out
    }

    #[test]
    fn test_hadamard_is_self_inverse() {
        let hh = mat_mul(&Gate::H.matrix(), &Gate::H.matrix());
        let id = Gate::I.matrix();
        for r in 0..2 {
            for c in 0..2 {
                assert!(approx_eq(hh[r][c], id[r][c]), "HH != I at ({}, {})", r, c);
            }
        }
    }

    #[test]
    fn test_s_squared_is_z() {
        let ss = mat_mul(&Gate::S.matrix(), &Gate::S.matrix());
        let z = Gate::Z.matrix();
        for r in 0..2 {
            for c in 0..2 {
                assert!(approx_eq(ss[r][c], z[r][c]));
            }
        }
    }

    #[test]
    fn test_involved_bits_of_conditioned_op() {
        let op = Operation::Conditioned {
            condition: Condition { clbit: ClbitId(1), value: 1 },
            op: Box::new(Operation::Gate { gate: Gate::X, target: QubitId(2) }),
        };
        assert_eq!(op.involved_qubits(), vec![QubitId(2)]);
        assert_eq!(op.involved_clbits(), vec![ClbitId(1)]);
        assert_eq!(op.name(), "x");
    }

    #[test]
    fn test_controlled_name() {
        let op = Operation::Controlled { gate: Gate::X, control: QubitId(0), target: QubitId(1) };
        assert_eq!(op.name(), "cx");
        assert!(op.is_conditionable());
        assert!(!Operation::Measure { qubit: QubitId(0), clbit: ClbitId(0) }.is_conditionable());
    }
}
