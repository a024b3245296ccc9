//! Configuration for the simulator backend and the teleportation walkthrough.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (QTELEPORT_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::core::{Result, TeleportError};
use crate::protocols::PreparedState;
use crate::simulation::{AVAILABLE_BACKENDS, MAX_SHOTS, QASM_SIMULATOR};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend selection and sampling
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Shot counts and teleported state for each walkthrough stage
    #[serde(default)]
    pub walkthrough: WalkthroughConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["qteleport.yaml", "qteleport.yml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `QTELEPORT_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("QTELEPORT_BACKEND") {
            self.simulator.backend = val;
        }
        if let Some(val) = lookup("QTELEPORT_SEED") {
            let seed = val
                .parse()
                .map_err(|_| TeleportError::Config(format!("QTELEPORT_SEED is not a u64: '{}'", val)))?;
            self.simulator.seed = Some(seed);
        }
        if let Some(val) = lookup("QTELEPORT_SHOTS") {
            let shots = val
                .parse()
                .map_err(|_| TeleportError::Config(format!("QTELEPORT_SHOTS is not a u32: '{}'", val)))?;
            self.walkthrough.set_sampling_shots(shots);
        }
        if let Some(val) = lookup("QTELEPORT_LOG_LEVEL") {
            self.logging.level = val;
        }
        Ok(())
    }

    /// Applies command-line flags, the last and strongest layer.
    pub fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if let Some(backend) = &cli.backend {
            self.simulator.backend = backend.clone();
        }
        if let Some(seed) = cli.seed {
            self.simulator.seed = Some(seed);
        }
        if let Some(shots) = cli.shots {
            self.walkthrough.set_sampling_shots(shots);
        }
        if let Some(state) = cli.state {
            self.walkthrough.state = state;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if !AVAILABLE_BACKENDS.contains(&self.simulator.backend.as_str()) {
            return Err(TeleportError::Config(format!(
                "Unknown backend '{}' (available: {})",
                self.simulator.backend,
                AVAILABLE_BACKENDS.join(", ")
            )));
        }
        let w = &self.walkthrough;
        for (name, shots) in [
            ("superposition_shots", w.superposition_shots),
            ("conditional_shots", w.conditional_shots),
            ("teleport_shots", w.teleport_shots),
            ("verify_shots", w.verify_shots),
        ] {
            if shots == 0 || shots > MAX_SHOTS {
                return Err(TeleportError::Config(format!(
                    "walkthrough.{} must be in 1..={}, got {}",
                    name, MAX_SHOTS, shots
                )));
            }
        }
        Ok(())
    }
}

/// Values given on the command line. `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub backend: Option<String>,
    pub seed: Option<u64>,
    /// Shots for every sampling stage
    pub shots: Option<u32>,
    pub state: Option<PreparedState>,
}

/// Backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Backend name passed to `get_backend`
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Fixed seed for reproducible counts; random when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Check normalisation after every gate
    #[serde(default)]
    pub validate_states: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { backend: default_backend(), seed: None, validate_states: false }
    }
}

fn default_backend() -> String {
    QASM_SIMULATOR.to_string()
}

/// Shot counts per walkthrough stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkthroughConfig {
    /// Single-qubit H + measure demo
    #[serde(default = "default_superposition_shots")]
    pub superposition_shots: u32,

    /// Conditional-X check
    #[serde(default = "default_conditional_shots")]
    pub conditional_shots: u32,

    /// Teleportation circuit itself
    #[serde(default = "default_teleport_shots")]
    pub teleport_shots: u32,

    /// Teleportation plus verification measurement
    #[serde(default = "default_verify_shots")]
    pub verify_shots: u32,

    /// State sent from the message qubit to Bob
    #[serde(default)]
    pub state: PreparedState,
}

impl WalkthroughConfig {
    /// Sets the shot count of every sampling stage. The single-shot
    /// teleportation run is left alone.
    pub fn set_sampling_shots(&mut self, shots: u32) {
        self.superposition_shots = shots;
        self.conditional_shots = shots;
        self.verify_shots = shots;
    }
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            superposition_shots: default_superposition_shots(),
            conditional_shots: default_conditional_shots(),
            teleport_shots: default_teleport_shots(),
            verify_shots: default_verify_shots(),
            state: PreparedState::default(),
        }
    }
}

fn default_superposition_shots() -> u32 {
    1024
}

fn default_conditional_shots() -> u32 {
    100
}

fn default_teleport_shots() -> u32 {
    1
}

fn default_verify_shots() -> u32 {
    100
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write as _;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulator.backend, "qasm_simulator");
        assert_eq!(config.simulator.seed, None);
        assert_eq!(config.walkthrough.superposition_shots, 1024);
        assert_eq!(config.walkthrough.conditional_shots, 100);
        assert_eq!(config.walkthrough.teleport_shots, 1);
        assert_eq!(config.walkthrough.verify_shots, 100);
        assert_eq!(config.walkthrough.state, PreparedState::Plus);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let mut bad_config = Config::default();
        bad_config.walkthrough.verify_shots = 0;
        assert!(bad_config.validate().is_err());

        let mut bad_backend = Config::default();
        bad_backend.simulator.backend = "ibm_brisbane".to_string();
        assert!(bad_backend.validate().is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
simulator:
  seed: 7
  validate_states: true
walkthrough:
  verify_shots: 2048
  state: minus
"#
        )
        .unwrap();

        let config = Config::load(Some(f.path())).unwrap();
        assert_eq!(config.simulator.seed, Some(7));
        assert!(config.simulator.validate_states);
        assert_eq!(config.simulator.backend, "qasm_simulator");
        assert_eq!(config.walkthrough.verify_shots, 2048);
        assert_eq!(config.walkthrough.superposition_shots, 1024);
        assert_eq!(config.walkthrough.state, PreparedState::Minus);
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let path = Path::new("/tmp/does_not_exist_qteleport_test.yaml");
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.walkthrough.superposition_shots, 1024);
    }

    #[test]
    fn test_config_load_invalid_yaml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{{{{not: valid: yaml::::").unwrap();
        let result = Config::load(Some(f.path()));
        assert!(matches!(result, Err(TeleportError::Serialization(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                ("QTELEPORT_BACKEND", "aer_simulator"),
                ("QTELEPORT_SEED", "1234"),
                ("QTELEPORT_SHOTS", "512"),
                ("QTELEPORT_LOG_LEVEL", "debug"),
            ]))
            .unwrap();
        assert_eq!(config.simulator.backend, "aer_simulator");
        assert_eq!(config.simulator.seed, Some(1234));
        assert_eq!(config.walkthrough.superposition_shots, 512);
        assert_eq!(config.walkthrough.verify_shots, 512);
        assert_eq!(config.walkthrough.teleport_shots, 1);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_validation_rejects_too_many_shots() {
        let mut config = Config::default();
        config.walkthrough.superposition_shots = MAX_SHOTS;
        assert!(config.validate().is_ok());

        config.walkthrough.superposition_shots = MAX_SHOTS + 1;
        assert!(matches!(config.validate(), Err(TeleportError::Config(_))));
    }

    #[test]
    fn test_cli_flags_beat_environment() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                ("QTELEPORT_BACKEND", "aer_simulator"),
                ("QTELEPORT_SEED", "1"),
                ("QTELEPORT_SHOTS", "256"),
                ("QTELEPORT_LOG_LEVEL", "warn"),
            ]))
            .unwrap();
        config.apply_cli(&CliOverrides {
            log_level: Some("trace".to_string()),
            backend: Some("qasm_simulator".to_string()),
            seed: Some(2),
            shots: Some(64),
            state: None,
        });
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.simulator.backend, "qasm_simulator");
        assert_eq!(config.simulator.seed, Some(2));
        assert_eq!(config.walkthrough.superposition_shots, 64);
        assert_eq!(config.walkthrough.conditional_shots, 64);
        assert_eq!(config.walkthrough.verify_shots, 64);
    }

    #[test]
    fn test_cli_shots_leave_teleport_stage_alone() {
        let mut config = Config::default();
        config.apply_cli(&CliOverrides { shots: Some(4096), ..CliOverrides::default() });
        assert_eq!(config.walkthrough.teleport_shots, 1);
        assert_eq!(config.walkthrough.verify_shots, 4096);
    }

    #[test]
    fn test_cli_state_overrides_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "walkthrough:\n  state: one\n  verify_shots: 10").unwrap();

        let mut config = Config::load(Some(f.path())).unwrap();
        assert_eq!(config.walkthrough.state, PreparedState::One);

        config.apply_cli(&CliOverrides { state: Some(PreparedState::PlusI), ..CliOverrides::default() });
        assert_eq!(config.walkthrough.state, PreparedState::PlusI);
        assert_eq!(config.walkthrough.verify_shots, 10);
    }

    #[test]
    fn test_empty_cli_changes_nothing() {
        let mut config = Config::default();
        config.apply_cli(&CliOverrides::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_override_rejects_bad_seed() {
        let mut config = Config::default();
        let result = config.apply_overrides(lookup_from(&[("QTELEPORT_SEED", "not-a-number")]));
        assert!(matches!(result, Err(TeleportError::Config(_))));
    }
}
