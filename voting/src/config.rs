//! Engine configuration with TOML file support.

use crate::error::VotingError;
use serde::{Deserialize, Serialize};
use slcr_types::PollParams;
use slcr_utils::{init_logging, LogFormat};

/// Configuration shared by every engine a factory spawns.
///
/// Can be loaded from a TOML file via [`VotingConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Parameters used by `start_poll_with_defaults`.
    #[serde(default)]
    pub default_poll: PollParams,

    /// Upper bound on the length of a batched commit, reveal, or rescue.
    #[serde(default = "default_max_batch_len")]
    pub max_batch_len: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_batch_len() -> usize {
    64
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl VotingConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, VotingError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| VotingError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, VotingError> {
        let config: Self = toml::from_str(s).map_err(|e| VotingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, VotingError> {
        toml::to_string_pretty(self).map_err(|e| VotingError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), VotingError> {
        if !self.default_poll.quorum_is_valid() {
            return Err(VotingError::InvalidQuorum(self.default_poll.quorum_percent));
        }
        if self.max_batch_len == 0 {
            return Err(VotingError::Config("max_batch_len must be at least 1".into()));
        }
        self.parsed_log_format()?;
        Ok(())
    }

    pub fn parsed_log_format(&self) -> Result<LogFormat, VotingError> {
        self.log_format.parse().map_err(VotingError::Config)
    }

    /// Install the global tracing subscriber described by this config.
    ///
    /// Returns `Ok(false)` if a subscriber was already installed.
    pub fn init_logging(&self) -> Result<bool, VotingError> {
        Ok(init_logging(self.parsed_log_format()?, &self.log_level))
    }
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            default_poll: PollParams::default(),
            max_batch_len: default_max_batch_len(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
