//! Session configuration.
//!
//! ```yaml
//! name: living-room
//! default_timeout_secs: 5.0
//! timeouts:
//!   PON: 30.0
//! max_frame_length: 256
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use oppo_protocol::{Code, Command, MAX_FRAME_LENGTH};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Longest advisory timeout a configuration may ask for (one day).
pub const MAX_TIMEOUT_SECS: f64 = 86_400.0;

/// Configuration for a protocol session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session name, used as a log prefix.
    pub name: String,
    /// Timeout applied to every command without a per-code override.
    /// When unset, each command's own timeout is used.
    pub default_timeout_secs: Option<f64>,
    /// Per-code timeout overrides in seconds, keyed by command code.
    pub timeouts: BTreeMap<String, f64>,
    /// Longest incoming frame accepted by the frame codec.
    pub max_frame_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            name: "Session".to_string(),
            default_timeout_secs: None,
            timeouts: BTreeMap::new(),
            max_frame_length: MAX_FRAME_LENGTH,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> SessionResult<Self> {
        let config: SessionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SessionResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check that every timeout is positive and at most [`MAX_TIMEOUT_SECS`],
    /// and that every override key is a valid code.
    pub fn validate(&self) -> SessionResult<()> {
        if self.max_frame_length < 4 {
            return Err(SessionError::InvalidConfig(format!(
                "max_frame_length {} is too small",
                self.max_frame_length
            )));
        }
        if let Some(secs) = self.default_timeout_secs {
            check_timeout("default_timeout_secs", secs)?;
        }
        for (code, secs) in &self.timeouts {
            code.parse::<Code>()
                .map_err(|e| SessionError::InvalidConfig(format!("timeouts: {}", e)))?;
            check_timeout(code, *secs)?;
        }
        Ok(())
    }

    /// Advisory timeout for `command`: the per-code override, then the
    /// session default, then the command's own timeout.
    pub fn timeout_for(&self, command: &Command) -> Duration {
        self.timeouts
            .get(command.code().as_str())
            .or(self.default_timeout_secs.as_ref())
            .and_then(|secs| Duration::try_from_secs_f64(*secs).ok())
            .unwrap_or_else(|| command.timeout())
    }
}

fn check_timeout(what: &str, secs: f64) -> SessionResult<()> {
    if secs > 0.0 && secs <= MAX_TIMEOUT_SECS {
        Ok(())
    } else {
        Err(SessionError::InvalidConfig(format!(
            "{}: timeout must be in (0, {}] seconds, got {}",
            what, MAX_TIMEOUT_SECS, secs
        )))
    }
}
