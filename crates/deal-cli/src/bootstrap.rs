use anyhow::Context;
use deal_config::DealProbeConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, TOML and `DEALPROBE_*` settings, then apply CLI overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<DealProbeConfig> {
    let mut config =
        DealProbeConfig::load_with_dotenv().context("failed to load dealprobe configuration")?;
    apply_overrides(&mut config, flags)?;
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");
    Ok(config)
}

fn apply_overrides(config: &mut DealProbeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(base_url) = &flags.base_url {
        config.api.base_url.clone_from(base_url);
        config
            .validate()
            .with_context(|| format!("invalid --base-url '{base_url}'"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::OutputFormat;

    fn flags(base_url: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Text,
            quiet: false,
            verbose: false,
            base_url: base_url.map(str::to_string),
        }
    }

    #[test]
    fn base_url_flag_wins() {
        let mut config = DealProbeConfig::default();
        apply_overrides(&mut config, &flags(Some("https://crm.example.com/api"))).unwrap();
        assert_eq!(config.api.base_url, "https://crm.example.com/api");
    }

    #[test]
    fn no_flag_keeps_loaded_value() {
        let mut config = DealProbeConfig::default();
        apply_overrides(&mut config, &flags(None)).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
    }

    #[test]
    fn invalid_base_url_flag_is_rejected() {
        let mut config = DealProbeConfig::default();
        let err = apply_overrides(&mut config, &flags(Some("ftp://crm"))).unwrap_err();
        assert!(format!("{err:#}").contains("--base-url"));
    }
}
