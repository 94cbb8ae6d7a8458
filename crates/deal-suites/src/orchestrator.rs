//! Runs the selected suites in order and combines their reports.

use deal_client::CrmClient;
use serde::Serialize;

use crate::context::{RunSettings, SuiteContext};
use crate::recorder::percentage;
use crate::suites::{self, Suite, SuiteReport};

/// Totals across every suite that ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedReport {
    pub base_url: String,
    pub suites: Vec<SuiteReport>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

impl CombinedReport {
    #[must_use]
    pub fn new(base_url: impl Into<String>, suites: Vec<SuiteReport>) -> Self {
        let total = suites.iter().map(|s| s.summary.total).sum();
        let passed = suites.iter().map(|s| s.summary.passed).sum();
        Self {
            base_url: base_url.into(),
            suites,
            total,
            passed,
            failed: total - passed,
            pass_rate: percentage(passed, total),
        }
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// `Suite: passed/total tests passed` lines plus the grand total.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("🎯 COMBINED TESTING SUMMARY\n");
        for report in &self.suites {
            out.push_str(&format!(
                "{}: {}/{} tests passed\n",
                report.suite, report.summary.passed, report.summary.total
            ));
        }
        out.push_str(&format!(
            "Overall: {}/{} tests passed ({:.1}%)\n",
            self.passed, self.total, self.pass_rate
        ));
        out
    }
}

/// Run one suite with a fresh recorder.
pub async fn run_suite(client: &CrmClient, settings: &RunSettings, suite: Suite) -> SuiteReport {
    let mut ctx = SuiteContext::new(client.clone(), settings);
    let banner = "=".repeat(80);
    if settings.echo {
        println!("🚀 STARTING {} TESTING\n{banner}", suite.title().to_uppercase());
    }
    tracing::info!(%suite, base_url = client.base_url(), "suite started");

    match suite {
        Suite::Timeline => suites::timeline::run(&mut ctx).await,
        Suite::Alerts => suites::alerts::run(&mut ctx).await,
    }

    let report = SuiteReport::new(suite, ctx.recorder.into_results()).with_created(ctx.created);
    tracing::info!(
        %suite,
        passed = report.summary.passed,
        total = report.summary.total,
        transactions = report.created.transactions.len(),
        checklist_items = report.created.checklist_items.len(),
        "suite finished"
    );
    if settings.echo {
        println!("\n{banner}\n📊 {} SUMMARY\n{banner}", suite.title().to_uppercase());
        print!("{}", report.summary.render());
        if !report.created.is_empty() {
            println!(
                "Left on the CRM: {} transactions, {} checklist items",
                report.created.transactions.len(),
                report.created.checklist_items.len()
            );
        }
        println!("\n🎯 {} TESTING COMPLETE", suite.title().to_uppercase());
    }
    report
}

/// Run `selection` strictly one after another.
pub async fn run_suites(client: &CrmClient, settings: &RunSettings, selection: &[Suite]) -> CombinedReport {
    let mut reports = Vec::with_capacity(selection.len());
    for (index, suite) in selection.iter().enumerate() {
        if settings.echo && index > 0 {
            println!("\n{}", "=".repeat(100));
        }
        reports.push(run_suite(client, settings, *suite).await);
    }
    CombinedReport::new(client.base_url(), reports)
}
