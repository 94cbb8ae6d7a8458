//! Fixed pauses between calls that race server-side processing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_update_pause_ms() -> u64 {
    500
}

const fn default_alert_settle_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Pause between rapid-fire status/priority updates on the same item.
    #[serde(default = "default_update_pause_ms")]
    pub update_pause_ms: u64,

    /// Pause (or first poll delay) after triggering alert generation.
    #[serde(default = "default_alert_settle_ms")]
    pub alert_settle_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            update_pause_ms: default_update_pause_ms(),
            alert_settle_ms: default_alert_settle_ms(),
        }
    }
}

impl PacingConfig {
    #[must_use]
    pub const fn update_pause(&self) -> Duration {
        Duration::from_millis(self.update_pause_ms)
    }

    #[must_use]
    pub const fn alert_settle(&self) -> Duration {
        Duration::from_millis(self.alert_settle_ms)
    }
}
