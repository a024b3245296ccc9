// src/core/state.rs

use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

use super::error::{QubitId, Result, TeleportError};

/// Largest register the state vector will allocate: `2^24` amplitudes, 256 MiB.
pub const MAX_QUBITS: usize = 24;

/// Amplitudes of an `n`-qubit register, `2^n` entries long.
///
/// Qubit `k` corresponds to bit `k` of the basis index, so for three qubits
/// the amplitude of `|q2 q1 q0> = |100>` sits at index 4.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
    num_qubits: usize,
}

impl StateVector {
    /// Creates `|0...0>` for `num_qubits` qubits.
    ///
    /// Fails with `SimulationError` above [`MAX_QUBITS`].
    pub fn zero_state(num_qubits: usize) -> Result<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(TeleportError::SimulationError {
                message: format!("{} qubits exceed the simulator limit of {}", num_qubits, MAX_QUBITS),
            });
        }
        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Ok(Self { amplitudes, num_qubits })
    }

    /// Wraps an explicit amplitude vector. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Result<Self> {
        let dim = amplitudes.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(TeleportError::InvalidOperation {
                message: format!("State vector length {} is not a power of two", dim),
            });
        }
        Ok(Self { num_qubits: dim.trailing_zeros() as usize, amplitudes })
    }

    /// Read-only view of the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of basis states (`2^n`).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits represented.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    pub(crate) fn check_qubit(&self, qubit: QubitId) -> Result<usize> {
        if qubit.0 < self.num_qubits {
            Ok(qubit.0)
        } else {
            Err(TeleportError::InvalidQubit { index: qubit.0, size: self.num_qubits })
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateVector[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
