// tests/teleportation_tests.rs

use qteleport::config::{Config, WalkthroughConfig};
use qteleport::protocols::VERIFY_REGISTER;
use qteleport::{
    Circuit, Operation, PreparedState, QubitId, Simulator, StateVector, TeleportError, conditional_test_circuit,
    fidelity, get_backend, run_walkthrough, superposition_circuit, teleportation_circuit, verification_circuit,
};

const VERIFY_THRESHOLD: f64 = 0.95;

#[test]
fn test_superposition_counts_are_roughly_even() -> Result<(), TeleportError> {
    let circuit = superposition_circuit()?;
    let result = Simulator::with_seed(1024).run(&circuit, 1024)?;
    let counts = result.counts();

    assert_eq!(counts.total(), 1024);
    assert_eq!(counts.len(), 2, "Expected both outcomes, got {}", counts);
    let p0 = counts.probability("0");
    assert!((0.4..=0.6).contains(&p0), "p(0) = {}", p0);
    Ok(())
}

#[test]
fn test_conditional_operation_counts() -> Result<(), TeleportError> {
    let circuit = conditional_test_circuit()?;
    let result = get_backend("qasm_simulator")?.run(&circuit, 100)?;

    assert_eq!(result.counts().get("0"), 100);
    assert_eq!(result.register_counts("tc")?.get("0"), 100);
    Ok(())
}

#[test]
fn test_teleportation_single_shot_key_shape() -> Result<(), TeleportError> {
    let (circuit, _) = teleportation_circuit(PreparedState::Plus)?;
    let result = Simulator::new().run(&circuit, 1)?;

    let (key, n) = result.counts().iter().next().expect("one outcome");
    assert_eq!(n, 1);
    assert_eq!(key.len(), 2);
    assert!(key.chars().all(|c| c == '0' || c == '1'));
    Ok(())
}

#[test]
fn test_teleportation_measurements_are_uniform() -> Result<(), TeleportError> {
    // Every Bell measurement outcome is equally likely whatever the sent state
    let (circuit, _) = teleportation_circuit(PreparedState::One)?;
    let result = Simulator::with_seed(8).run(&circuit, 4000)?;

    for key in ["00", "01", "10", "11"] {
        let p = result.counts().probability(key);
        assert!((p - 0.25).abs() < 0.04, "p({}) = {}", key, p);
    }
    Ok(())
}

#[test]
fn test_verify_plus_reads_zero() -> Result<(), TeleportError> {
    let (teleport, layout) = teleportation_circuit(PreparedState::Plus)?;
    let verify = verification_circuit(&teleport, &layout, PreparedState::Plus)?;
    let result = Simulator::new().run(&verify, 1024)?;

    // Keys are "<verify> <c1 c0>"
    for (key, _) in result.counts().iter() {
        let (verify_bits, c_bits) = key.split_once(' ').expect("two registers");
        assert_eq!(verify_bits.len(), 1);
        assert_eq!(c_bits.len(), 2);
    }

    let verify_counts = result.register_counts(VERIFY_REGISTER)?;
    let success = verify_counts.probability("0");
    assert!(success >= VERIFY_THRESHOLD, "verify read 0 in only {:.3} of shots", success);
    Ok(())
}

#[test]
fn test_every_state_teleports() -> Result<(), TeleportError> {
    for state in PreparedState::ALL {
        let (teleport, layout) = teleportation_circuit(state)?;
        let verify = verification_circuit(&teleport, &layout, state)?;
        let result = Simulator::with_seed(31).run(&verify, 256)?;
        let rate = result.register_counts(VERIFY_REGISTER)?.probability(state.expected_bit());
        assert!(rate >= VERIFY_THRESHOLD, "{} verified in {:.3} of shots", state, rate);
    }
    Ok(())
}

#[test]
fn test_without_corrections_verification_fails() -> Result<(), TeleportError> {
    // Dropping Bob's conditioned corrections leaves him with a mixed state
    let (teleport, layout) = teleportation_circuit(PreparedState::Plus)?;
    let mut uncorrected = Circuit::new();
    uncorrected.add_quantum_register("q", 3)?;
    uncorrected.add_classical_register("c", 2)?;
    uncorrected.add_operations(
        teleport
            .operations()
            .iter()
            .filter(|op| !matches!(op, Operation::Conditioned { .. }))
            .cloned(),
    )?;
    let verify = verification_circuit(&uncorrected, &layout, PreparedState::Plus)?;
    let result = Simulator::with_seed(5).run(&verify, 2000)?;

    let rate = result.register_counts(VERIFY_REGISTER)?.probability("0");
    assert!(rate < 0.8, "uncorrected teleportation verified in {:.3} of shots", rate);
    Ok(())
}

#[test]
fn test_bob_holds_the_sent_state() -> Result<(), TeleportError> {
    // Reduce Bob's qubit from a single shot's post-measurement state: the
    // measured qubits are in a basis state, so Bob's amplitudes are the two
    // entries that share those bits.
    for state in PreparedState::ALL {
        let (teleport, layout) = teleportation_circuit(state)?;
        let final_state = Simulator::with_seed(12).statevector(&teleport)?;
        let amps = final_state.amplitudes();
        let bob_mask = 1usize << layout.bob.0;
        let weight = |i: usize| amps[i].norm_sqr() + amps[i | bob_mask].norm_sqr();
        let low = (0..bob_mask).max_by(|&a, &b| weight(a).total_cmp(&weight(b))).expect("non-empty range");
        let bob = StateVector::from_amplitudes(vec![amps[low], amps[low | bob_mask]])?;

        let mut prep = Circuit::with_size(1, 0);
        for gate in state.preparation() {
            prep.gate(*gate, QubitId(0))?;
        }
        let expected = Simulator::new().statevector(&prep)?;
        let f = fidelity(&bob, &expected)?;
        assert!((f - 1.0).abs() < 1e-9, "{}: fidelity {}", state, f);
    }
    Ok(())
}

#[test]
fn test_walkthrough_with_default_config() -> Result<(), TeleportError> {
    let config = Config::default();
    let simulator = Simulator::from_config(&config.simulator)?;
    let report = run_walkthrough(&simulator, &config.walkthrough)?;

    assert_eq!(report.state, PreparedState::Plus);
    assert_eq!(report.superposition.shots(), 1024);
    assert_eq!(report.conditional.shots(), 100);
    assert_eq!(report.teleportation.shots(), 1);
    assert_eq!(report.verification.shots(), 100);
    assert!(report.verification_success_rate()? >= VERIFY_THRESHOLD);
    Ok(())
}

#[test]
fn test_walkthrough_through_trait_object() -> Result<(), TeleportError> {
    let backend: Box<dyn qteleport::Backend> = Box::new(Simulator::with_seed(77));
    let config = WalkthroughConfig { state: PreparedState::Minus, ..WalkthroughConfig::default() };
    let report = run_walkthrough(backend.as_ref(), &config)?;

    assert_eq!(report.verification.register_counts(VERIFY_REGISTER)?.get("1"), 100);
    let json = serde_json::to_value(&report)?;
    assert_eq!(json["state"], "minus");
    Ok(())
}

#[test]
fn test_walkthrough_rejects_zero_shots() {
    let config = WalkthroughConfig { verify_shots: 0, ..WalkthroughConfig::default() };
    let result = run_walkthrough(&Simulator::with_seed(1), &config);
    assert!(matches!(result, Err(TeleportError::InvalidOperation { .. })));
}
