//! The two independent suites and their reports.

pub mod alerts;
pub mod timeline;

use std::fmt;

use serde::Serialize;

use crate::context::CreatedIds;
use crate::recorder::{SuiteSummary, TestResult};

/// A suite the orchestrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Transactions, checklist items and stage transitions.
    Timeline,
    /// Agent commands, deal summaries and smart alerts.
    Alerts,
}

impl Suite {
    pub const ALL: [Self; 2] = [Self::Timeline, Self::Alerts];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Timeline => "Transaction Timeline + Checklist",
            Self::Alerts => "Deal Summary + Smart Alerts",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Results of one suite run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub suite: Suite,
    pub summary: SuiteSummary,
    pub results: Vec<TestResult>,
    /// Entities the suite left behind on the CRM.
    pub created: CreatedIds,
}

impl SuiteReport {
    #[must_use]
    pub fn new(suite: Suite, results: Vec<TestResult>) -> Self {
        Self {
            suite,
            summary: SuiteSummary::from_results(&results),
            results,
            created: CreatedIds::default(),
        }
    }

    #[must_use]
    pub fn with_created(mut self, created: CreatedIds) -> Self {
        self.created = created;
        self
    }
}
