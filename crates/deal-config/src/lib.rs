//! # deal-config
//!
//! Layered configuration for the dealprobe harness, built on figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`DEALPROBE_*` prefix, `__` as section separator)
//! 2. Project-level `.dealprobe/config.toml`
//! 3. User-level `~/.config/dealprobe/config.toml`
//! 4. Built-in defaults
//!
//! `DEALPROBE_API__BASE_URL` maps to `api.base_url`,
//! `DEALPROBE_WAIT__STRATEGY` to `wait.strategy`, and so on. Command-line
//! flags are applied by the binary on top of the extracted value.
//!
//! ```no_run
//! use deal_config::DealProbeConfig;
//!
//! let config = DealProbeConfig::load_with_dotenv().expect("config");
//! println!("target: {}", config.api.base_url);
//! ```

mod api;
mod error;
mod pacing;
mod report;
mod wait;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use pacing::PacingConfig;
pub use report::ReportConfig;
pub use wait::{WaitConfig, WaitMode};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every config key.
pub const ENV_PREFIX: &str = "DEALPROBE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DealProbeConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub wait: WaitConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl DealProbeConfig {
    /// Load and validate configuration from TOML files and the environment.
    ///
    /// Does not read `.env`; see [`Self::load_with_dotenv`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load `.env` (if present) into the process environment, then [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary provider chain.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain used by [`Self::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".dealprobe/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.wait.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dealprobe").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DealProbeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.wait.strategy, WaitMode::Fixed);
        assert!(!config.report.strict);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config = DealProbeConfig::load().expect("defaults extract");
            assert_eq!(config.api.base_url, "http://localhost:3000/api");
            assert_eq!(config.pacing.update_pause_ms, 500);
            assert_eq!(config.pacing.alert_settle_ms, 2000);
            Ok(())
        });
    }
}
