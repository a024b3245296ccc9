//! The teleportation walkthrough: the circuits it builds and the runner that
//! executes them stage by stage.

pub mod teleportation;
pub mod walkthrough;

pub use teleportation::{
    conditional_test_circuit, superposition_circuit, teleportation_circuit, verification_circuit,
    TeleportationLayout, VERIFY_REGISTER,
};
pub use walkthrough::{run_walkthrough, WalkthroughReport};

use crate::core::TeleportError;
use crate::operations::Gate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single-qubit state placed on the message qubit and sent to Bob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreparedState {
    /// |0>
    Zero,
    /// |1>
    One,
    /// |+> = (|0> + |1>)/√2
    #[default]
    Plus,
    /// |-> = (|0> - |1>)/√2
    Minus,
    /// |+i> = (|0> + i|1>)/√2
    PlusI,
}

impl PreparedState {
    /// Every supported state.
    pub const ALL: [PreparedState; 5] = [
        PreparedState::Zero,
        PreparedState::One,
        PreparedState::Plus,
        PreparedState::Minus,
        PreparedState::PlusI,
    ];

    /// Gates taking `|0>` to this state.
    pub fn preparation(&self) -> &'static [Gate] {
        match self {
            PreparedState::Zero => &[],
            PreparedState::One => &[Gate::X],
            PreparedState::Plus => &[Gate::H],
            PreparedState::Minus => &[Gate::X, Gate::H],
            PreparedState::PlusI => &[Gate::H, Gate::S],
        }
    }

    /// Gates rotating this state back onto a computational basis state.
    pub fn basis_change(&self) -> &'static [Gate] {
        match self {
            PreparedState::Zero | PreparedState::One => &[],
            PreparedState::Plus | PreparedState::Minus => &[Gate::H],
            PreparedState::PlusI => &[Gate::Sdg, Gate::H],
        }
    }

    /// Bit a verification measurement reads after `basis_change`.
    pub fn expected_bit(&self) -> &'static str {
        match self {
            PreparedState::Zero | PreparedState::Plus | PreparedState::PlusI => "0",
            PreparedState::One | PreparedState::Minus => "1",
        }
    }
}

impl fmt::Display for PreparedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ket = match self {
            PreparedState::Zero => "|0>",
            PreparedState::One => "|1>",
            PreparedState::Plus => "|+>",
            PreparedState::Minus => "|->",
            PreparedState::PlusI => "|+i>",
        };
        f.write_str(ket)
    }
}

impl FromStr for PreparedState {
    type Err = TeleportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(PreparedState::Zero),
            "one" | "1" => Ok(PreparedState::One),
            "plus" | "+" => Ok(PreparedState::Plus),
            "minus" | "-" => Ok(PreparedState::Minus),
            "plus-i" | "+i" => Ok(PreparedState::PlusI),
            other => Err(TeleportError::Config(format!(
                "Unknown state '{}' (expected zero, one, plus, minus or plus-i)",
                other
            ))),
        }
    }
}
