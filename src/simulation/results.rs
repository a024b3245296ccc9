// src/simulation/results.rs
use crate::circuits::ClassicalRegister;
use crate::core::{Result, TeleportError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Measurement outcome counts: bitstring -> number of shots.
///
/// A key lists every classical register, separated by a space. The most
/// recently added register comes first, and bits inside a register run from
/// the highest index down to bit 0. For registers `c` (2 bits) then
/// `verify` (1 bit), the key `"0 10"` means `verify[0]=0`, `c[1]=1`, `c[0]=0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// Creates an empty count map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub(crate) fn record(&mut self, key: String) {
        *self.0.entry(key).or_insert(0) += 1;
    }

    /// Count for `key`, zero when never observed.
    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Fraction of shots that produced `key`.
    pub fn probability(&self, key: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(key) as f64 / total as f64
        }
    }

    /// Most frequently observed outcome. Ties go to the smaller key.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.0
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (k, &v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((k.as_str(), v)),
            })
    }

    /// Outcomes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Underlying ordered map.
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.0
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (key, n) in iter {
            *counts.0.entry(key).or_insert(0) += n;
        }
        counts
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            write!(f, "{}'{}': {}", if i > 0 { ", " } else { "" }, k, v)?;
        }
        write!(f, "}}")
    }
}

/// Formats the classical bits of one shot as a count key.
pub(crate) fn format_bitstring(registers: &[ClassicalRegister], clbits: &[u8]) -> String {
    registers
        .iter()
        .rev()
        .map(|reg| {
            reg.bits()
                .iter()
                .rev()
                .map(|bit| if clbits[bit.0] == 1 { '1' } else { '0' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Holds the outcome of running a circuit for a number of shots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    backend_name: String,
    shots: u32,
    seed: u64,
    counts: Counts,
    /// Classical register names in the order they were added.
    register_names: Vec<String>,
}

impl SimulationResult {
    pub(crate) fn new(backend_name: &str, shots: u32, seed: u64, registers: &[ClassicalRegister]) -> Self {
        Self {
            backend_name: backend_name.to_string(),
            shots,
            seed,
            counts: Counts::new(),
            register_names: registers.iter().map(|r| r.name().to_string()).collect(),
        }
    }

    pub(crate) fn record_shot(&mut self, key: String) {
        self.counts.record(key);
    }

    /// Name of the backend that produced the result.
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Number of shots requested.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Seed of the random stream used for measurement sampling.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Outcome counts across every classical register.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Counts marginalised onto a single classical register.
    pub fn register_counts(&self, name: &str) -> Result<Counts> {
        let position = self
            .register_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| TeleportError::InvalidOperation {
                message: format!("No classical register named '{}' in result", name),
            })?;
        // Keys list registers last-added first.
        let segment = self.register_names.len() - 1 - position;
        Ok(self
            .counts
            .iter()
            .filter_map(|(key, n)| key.split(' ').nth(segment).map(|bits| (bits.to_string(), n)))
            .collect())
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        writeln!(f, "  Backend: {}  Shots: {}  Seed: {}", self.backend_name, self.shots, self.seed)?;
        if self.counts.is_empty() {
            writeln!(f, "  No shots were recorded.")?;
        } else {
            writeln!(f, "  Counts:")?;
            for (key, n) in self.counts.iter() {
                writeln!(f, "    {}: {}", key, n)?;
            }
        }
        Ok(())
    }
}
