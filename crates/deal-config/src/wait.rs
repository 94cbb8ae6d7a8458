//! Synchronization with asynchronous server-side work (alert generation).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How to wait for the CRM to reach an expected state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitMode {
    /// Sleep once for the configured settle time, then check once.
    #[default]
    Fixed,
    /// Check repeatedly with doubling backoff until the state appears.
    Poll,
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_initial_backoff_ms() -> u64 {
    250
}

const fn default_max_backoff_ms() -> u64 {
    4000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WaitConfig {
    #[serde(default)]
    pub strategy: WaitMode,

    /// Upper bound on probes in `poll` mode.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            strategy: WaitMode::default(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl WaitConfig {
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    #[must_use]
    pub const fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy == WaitMode::Poll && self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "wait.max_attempts".into(),
                reason: "poll mode needs at least one attempt".into(),
            });
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ConfigError::InvalidValue {
                field: "wait.max_backoff_ms".into(),
                reason: format!(
                    "must be >= initial_backoff_ms ({})",
                    self.initial_backoff_ms
                ),
            });
        }
        Ok(())
    }
}
