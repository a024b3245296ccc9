// src/simulation/engine.rs
use crate::core::{ClbitId, QubitId, Result, StateVector, TeleportError};
use crate::operations::{Matrix2, Operation};
use crate::validation::check_normalization;
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;

/// Probabilities below this are treated as exactly zero when sampling.
const PROBABILITY_TOLERANCE: f64 = 1e-12;

/// Evolves one shot: the state vector plus the classical bits written so far.
/// (Internal visibility)
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    state: StateVector,
    clbits: Vec<u8>,
    num_qubits: usize,
    validate_states: bool,
}

impl SimulationEngine {
    /// Initializes the engine in `|0...0>` with every classical bit cleared.
    pub(crate) fn init(num_qubits: usize, num_clbits: usize, validate_states: bool) -> Result<Self> {
        Ok(Self {
            state: StateVector::zero_state(num_qubits)?,
            clbits: vec![0; num_clbits],
            num_qubits,
            validate_states,
        })
    }

    /// Returns to `|0...0>` and zeroed classical bits for the next shot.
    pub(crate) fn reset(&mut self) -> Result<()> {
        self.state = StateVector::zero_state(self.num_qubits)?;
        self.clbits.iter_mut().for_each(|b| *b = 0);
        Ok(())
    }

    // Add a crate-visible method to set the state directly for testing
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<()> {
        if state.dim() != self.state.dim() {
            return Err(TeleportError::SimulationError {
                message: format!(
                    "Cannot set state: provided dimension {} does not match engine dimension {}",
                    state.dim(),
                    self.state.dim()
                ),
            });
        }
        self.state = state;
        Ok(())
    }

    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    pub(crate) fn clbits(&self) -> &[u8] {
        &self.clbits
    }

    /// Applies one operation of the circuit to the current shot.
    pub(crate) fn execute<R: Rng>(&mut self, op: &Operation, rng: &mut R) -> Result<()> {
        match op {
            Operation::Gate { gate, target } => {
                let target = self.state.check_qubit(*target)?;
                self.apply_single_qubit_gate(target, &gate.matrix());
            }
            Operation::Controlled { gate, control, target } => {
                let control = self.state.check_qubit(*control)?;
                let target = self.state.check_qubit(*target)?;
                if control == target {
                    return Err(TeleportError::InvalidOperation {
                        message: "Control and target qubits cannot be the same for controlled operation".to_string(),
                    });
                }
                self.apply_controlled_gate(control, target, &gate.matrix());
            }
            Operation::Measure { qubit, clbit } => {
                let outcome = self.measure(*qubit, rng)?;
                self.write_clbit(*clbit, outcome)?;
                return Ok(());
            }
            Operation::Barrier { .. } => return Ok(()),
            Operation::Conditioned { condition, op } => {
                if self.read_clbit(condition.clbit)? == condition.value {
                    return self.execute(op, rng);
                }
                return Ok(());
            }
        }
        if self.validate_states {
            check_normalization(&self.state, None)?;
        }
        Ok(())
    }

    fn read_clbit(&self, clbit: ClbitId) -> Result<u8> {
        self.clbits
            .get(clbit.0)
            .copied()
            .ok_or(TeleportError::InvalidClbit { index: clbit.0, size: self.clbits.len() })
    }

    fn write_clbit(&mut self, clbit: ClbitId, value: u8) -> Result<()> {
        let size = self.clbits.len();
        let slot = self
            .clbits
            .get_mut(clbit.0)
            .ok_or(TeleportError::InvalidClbit { index: clbit.0, size })?;
        *slot = value;
        Ok(())
    }

    /// Applies a 2x2 matrix to `target`, pairing basis states that differ
    /// only in that bit.
    fn apply_single_qubit_gate(&mut self, target: usize, matrix: &Matrix2) {
        let mask = 1usize << target;
        let amps = self.state.amplitudes_mut();
        for i0 in (0..amps.len()).filter(|i| i & mask == 0) {
            let i1 = i0 | mask;
            let (psi_0, psi_1) = (amps[i0], amps[i1]);
            amps[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amps[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Same as `apply_single_qubit_gate`, restricted to the control = 1 subspace.
    fn apply_controlled_gate(&mut self, control: usize, target: usize, matrix: &Matrix2) {
        let c_mask = 1usize << control;
        let t_mask = 1usize << target;
        let amps = self.state.amplitudes_mut();
        for i0 in (0..amps.len()).filter(|i| i & c_mask != 0 && i & t_mask == 0) {
            let i1 = i0 | t_mask;
            let (psi_0, psi_1) = (amps[i0], amps[i1]);
            amps[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amps[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Samples `qubit` in the computational basis with Born-rule
    /// probabilities, then collapses and renormalises the state.
    fn measure<R: Rng>(&mut self, qubit: QubitId, rng: &mut R) -> Result<u8> {
        let q = self.state.check_qubit(qubit)?;
        let mask = 1usize << q;
        let p_one: f64 = self
            .state
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum();

        let outcome: u8 = if p_one < PROBABILITY_TOLERANCE {
            0
        } else if p_one > 1.0 - PROBABILITY_TOLERANCE {
            1
        } else if rng.random::<f64>() < p_one {
            1
        } else {
            0
        };

        let p_outcome = if outcome == 1 { p_one } else { 1.0 - p_one };
        if p_outcome < PROBABILITY_TOLERANCE {
            return Err(TeleportError::SimulationError {
                message: format!("Measurement of {} selected an outcome with zero probability", qubit),
            });
        }
        let scale = 1.0 / p_outcome.sqrt();
        for (i, amp) in self.state.amplitudes_mut().iter_mut().enumerate() {
            let bit = u8::from(i & mask != 0);
            if bit == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{Condition, Gate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i,
                actual[i],
                expected[i],
                context
            );
        }
    }

    fn c(re: f64) -> Complex<f64> {
        Complex::new(re, 0.0)
    }

    #[test]
    fn test_hadamard_on_zero() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 0, true)?;
        let mut rng = StdRng::seed_from_u64(1);
        engine.execute(&Operation::Gate { gate: Gate::H, target: QubitId(0) }, &mut rng)?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &[c(FRAC_1_SQRT_2), c(FRAC_1_SQRT_2)], "H|0>");
        Ok(())
    }

    #[test]
    fn test_little_endian_qubit_order() -> Result<()> {
        // X on qubit 1 of two qubits: |q1 q0> = |10>, index 2
        let mut engine = SimulationEngine::init(2, 0, false)?;
        let mut rng = StdRng::seed_from_u64(1);
        engine.execute(&Operation::Gate { gate: Gate::X, target: QubitId(1) }, &mut rng)?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &[c(0.0), c(0.0), c(1.0), c(0.0)], "X on q1");
        Ok(())
    }

    #[test]
    fn test_bell_pair() -> Result<()> {
        let mut engine = SimulationEngine::init(2, 0, true)?;
        let mut rng = StdRng::seed_from_u64(1);
        engine.execute(&Operation::Gate { gate: Gate::H, target: QubitId(0) }, &mut rng)?;
        engine.execute(&Operation::Controlled { gate: Gate::X, control: QubitId(0), target: QubitId(1) }, &mut rng)?;
        assert_complex_vec_approx_equal(
            engine.state().amplitudes(),
            &[c(FRAC_1_SQRT_2), c(0.0), c(0.0), c(FRAC_1_SQRT_2)],
            "Bell |Φ+>",
        );
        Ok(())
    }

    #[test]
    fn test_measure_basis_state_is_deterministic() -> Result<()> {
        let mut engine = SimulationEngine::init(2, 2, false)?;
        // |q1 q0> = |01>
        engine.set_state(StateVector::from_amplitudes(vec![c(0.0), c(1.0), c(0.0), c(0.0)])?)?;
        let mut rng = StdRng::seed_from_u64(99);
        engine.execute(&Operation::Measure { qubit: QubitId(0), clbit: ClbitId(0) }, &mut rng)?;
        engine.execute(&Operation::Measure { qubit: QubitId(1), clbit: ClbitId(1) }, &mut rng)?;
        assert_eq!(engine.clbits(), &[1, 0]);
        Ok(())
    }

    #[test]
    fn test_measure_collapses_entangled_partner() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let mut engine = SimulationEngine::init(2, 2, true)?;
            engine.set_state(StateVector::from_amplitudes(vec![c(FRAC_1_SQRT_2), c(0.0), c(0.0), c(FRAC_1_SQRT_2)])?)?;
            engine.execute(&Operation::Measure { qubit: QubitId(0), clbit: ClbitId(0) }, &mut rng)?;
            engine.execute(&Operation::Measure { qubit: QubitId(1), clbit: ClbitId(1) }, &mut rng)?;
            assert_eq!(engine.clbits()[0], engine.clbits()[1], "Bell pair outcomes must agree");
        }
        Ok(())
    }

    #[test]
    fn test_conditioned_gate_reads_current_clbit() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 1, false)?;
        let mut rng = StdRng::seed_from_u64(3);
        let flip_if_one = Operation::Conditioned {
            condition: Condition { clbit: ClbitId(0), value: 1 },
            op: Box::new(Operation::Gate { gate: Gate::X, target: QubitId(0) }),
        };
        // Bit is 0: no flip
        engine.execute(&flip_if_one, &mut rng)?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &[c(1.0), c(0.0)], "no flip");

        engine.execute(&Operation::Gate { gate: Gate::X, target: QubitId(0) }, &mut rng)?;
        engine.execute(&Operation::Measure { qubit: QubitId(0), clbit: ClbitId(0) }, &mut rng)?;
        engine.execute(&flip_if_one, &mut rng)?;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &[c(1.0), c(0.0)], "flipped back");
        Ok(())
    }

    #[test]
    fn test_reset_clears_state_and_bits() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 1, false)?;
        let mut rng = StdRng::seed_from_u64(3);
        engine.execute(&Operation::Gate { gate: Gate::X, target: QubitId(0) }, &mut rng)?;
        engine.execute(&Operation::Measure { qubit: QubitId(0), clbit: ClbitId(0) }, &mut rng)?;
        engine.reset()?;
        assert_eq!(engine.clbits(), &[0]);
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &[c(1.0), c(0.0)], "reset");
        Ok(())
    }

    #[test]
    fn test_unknown_qubit_is_rejected() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 0, false)?;
        let mut rng = StdRng::seed_from_u64(3);
        let result = engine.execute(&Operation::Gate { gate: Gate::H, target: QubitId(4) }, &mut rng);
        assert!(matches!(result, Err(TeleportError::InvalidQubit { index: 4, size: 1 })));
        Ok(())
    }
}
