//! Append-only log of scenario outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Outcome of one scenario check. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// Name and message of a failed scenario, for the summary listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTest {
    pub name: String,
    pub message: String,
}

/// Counts over a result log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage in `0.0..=100.0`; `0.0` for an empty log.
    pub pass_rate: f64,
    pub failed_tests: Vec<FailedTest>,
}

impl SuiteSummary {
    #[must_use]
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.success).count();
        let failed_tests: Vec<FailedTest> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| FailedTest {
                name: r.name.clone(),
                message: r.message.clone(),
            })
            .collect();
        Self {
            total,
            passed,
            failed: total - passed,
            pass_rate: percentage(passed, total),
            failed_tests,
        }
    }

    /// Console block printed at the end of a suite.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "Total Tests: {}\nPassed: {} ✅\nFailed: {} ❌\nSuccess Rate: {:.1}%\n",
            self.total, self.passed, self.failed, self.pass_rate
        );
        if !self.failed_tests.is_empty() {
            out.push_str("\n❌ FAILED TESTS:\n");
            for failed in &self.failed_tests {
                out.push_str(&format!("  - {}: {}\n", failed.name, failed.message));
            }
        }
        out
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Collects [`TestResult`]s for one suite and optionally echoes them to stdout.
#[derive(Debug)]
pub struct Recorder {
    results: Vec<TestResult>,
    echo: bool,
}

impl Recorder {
    #[must_use]
    pub const fn new(echo: bool) -> Self {
        Self {
            results: Vec::new(),
            echo,
        }
    }

    pub fn pass(&mut self, name: impl Into<String>, message: impl Into<String>, details: Option<Value>) {
        self.record(name, true, message, details);
    }

    pub fn fail(&mut self, name: impl Into<String>, message: impl Into<String>, details: Option<Value>) {
        self.record(name, false, message, details);
    }

    pub fn record(
        &mut self,
        name: impl Into<String>,
        success: bool,
        message: impl Into<String>,
        details: Option<Value>,
    ) {
        let result = TestResult {
            name: name.into(),
            success,
            message: message.into(),
            details,
            timestamp: Utc::now(),
        };

        if success {
            tracing::info!(test = %result.name, "{}", result.message);
        } else {
            tracing::warn!(test = %result.name, "{}", result.message);
        }
        if self.echo {
            let status = if success { "✅ PASS" } else { "❌ FAIL" };
            println!("{status} - {}: {}", result.name, result.message);
            if let Some(details) = &result.details {
                println!("   Details: {}", render_details(details));
            }
        }

        self.results.push(result);
    }

    /// Progress line for a sub-step that is not itself a result.
    pub fn note(&self, line: impl AsRef<str>) {
        tracing::debug!("{}", line.as_ref());
        if self.echo {
            println!("  {}", line.as_ref());
        }
    }

    /// Section banner.
    pub fn section(&self, title: &str) {
        if self.echo {
            println!("\n{title}\n{}", "-".repeat(50));
        }
    }

    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    #[must_use]
    pub fn summary(&self) -> SuiteSummary {
        SuiteSummary::from_results(&self.results)
    }

    #[must_use]
    pub fn into_results(self) -> Vec<TestResult> {
        self.results
    }
}

fn render_details(details: &Value) -> String {
    match details {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn results_keep_insertion_order() {
        let mut recorder = Recorder::new(false);
        recorder.pass("create", "created t-1", None);
        recorder.fail("update", "HTTP 500", Some(json!({"body": "boom"})));
        recorder.pass("fetch", "ok", None);

        let names: Vec<&str> = recorder.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["create", "update", "fetch"]);
        assert_eq!(recorder.results()[1].details, Some(json!({"body": "boom"})));
    }

    #[test]
    fn summary_counts_and_lists_failures() {
        let mut recorder = Recorder::new(false);
        recorder.pass("a", "ok", None);
        recorder.pass("b", "ok", None);
        recorder.pass("c", "ok", None);
        recorder.fail("d", "missing key 'transaction'", None);

        let summary = recorder.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert!((summary.pass_rate - 75.0).abs() < f64::EPSILON);
        assert_eq!(
            summary.failed_tests,
            vec![FailedTest {
                name: "d".into(),
                message: "missing key 'transaction'".into()
            }]
        );
    }

    #[test]
    fn empty_log_has_zero_pass_rate() {
        let summary = Recorder::new(false).summary();
        assert_eq!(summary.total, 0);
        assert!(summary.pass_rate.abs() < f64::EPSILON);
        assert!(summary.failed_tests.is_empty());
    }

    #[test]
    fn render_lists_failed_tests_only_when_present() {
        let mut recorder = Recorder::new(false);
        recorder.pass("a", "ok", None);
        let clean = recorder.summary().render();
        assert!(clean.contains("Success Rate: 100.0%"));
        assert!(!clean.contains("FAILED TESTS"));

        recorder.fail("b", "HTTP 404", None);
        let dirty = recorder.summary().render();
        assert!(dirty.contains("Success Rate: 50.0%"));
        assert!(dirty.contains("  - b: HTTP 404"));
    }
}
