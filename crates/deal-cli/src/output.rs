use deal_suites::CombinedReport;

use crate::cli::OutputFormat;

/// Render the end-of-run report in the requested format.
pub fn render(report: &CombinedReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("\n{}\n{}", "=".repeat(100), report.render())),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Print the end-of-run report in the requested format.
pub fn report(report: &CombinedReport, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(report, format)?;
    println!("{rendered}");
    Ok(())
}
