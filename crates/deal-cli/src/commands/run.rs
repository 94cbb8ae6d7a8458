use anyhow::Context;
use deal_client::CrmClient;
use deal_config::DealProbeConfig;
use deal_suites::{RunSettings, run_suites};

use crate::cli::{GlobalFlags, OutputFormat, RunArgs};
use crate::output;

/// Handle `dealprobe run`.
///
/// Scenario failures never abort the run; they only affect the exit status
/// when strict mode is on.
pub async fn handle(args: &RunArgs, flags: &GlobalFlags, config: DealProbeConfig) -> anyhow::Result<()> {
    let strict = args.strict || config.report.strict;
    let client = CrmClient::new(&config.api).context("failed to build CRM HTTP client")?;
    let settings = RunSettings::from_config(&config, flags.format == OutputFormat::Text);
    let suites = args.suite.suites();

    tracing::info!(base_url = client.base_url(), suites = suites.len(), strict, "starting run");
    let report = run_suites(&client, &settings, &suites).await;

    output::report(&report, flags.format)?;

    if strict && report.has_failures() {
        anyhow::bail!(
            "{} of {} scenarios failed (strict mode)",
            report.failed,
            report.total
        );
    }
    Ok(())
}
