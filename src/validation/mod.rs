// src/validation/mod.rs

//! Checks and measures on [`StateVector`]s: normalisation, overlap between
//! states and single-qubit marginals.

use crate::core::{QubitId, Result, StateVector, TeleportError};
use num_complex::Complex;
use num_traits::Zero;

// Default tolerance values (can be overridden by caller)
const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `1e-9`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(TeleportError::Incoherence)` if normalization fails.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq: f64 = state.amplitudes().iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(TeleportError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Fidelity `|<a|b>|^2` between two pure states of the same dimension.
pub fn fidelity(a: &StateVector, b: &StateVector) -> Result<f64> {
    if a.dim() != b.dim() {
        return Err(TeleportError::InvalidOperation {
            message: format!("Cannot compare states of dimension {} and {}", a.dim(), b.dim()),
        });
    }
    let overlap: Complex<f64> = a
        .amplitudes()
        .iter()
        .zip(b.amplitudes())
        .fold(Complex::zero(), |acc, (x, y)| acc + x.conj() * y);
    Ok(overlap.norm_sqr())
}

/// Marginal probability of reading `1` on `qubit`.
pub fn qubit_probability_one(state: &StateVector, qubit: QubitId) -> Result<f64> {
    let q = state.check_qubit(qubit)?;
    let mask = 1usize << q;
    Ok(state
        .amplitudes()
        .iter()
        .enumerate()
        .filter(|(i, _)| i & mask != 0)
        .map(|(_, c)| c.norm_sqr())
        .sum())
}
