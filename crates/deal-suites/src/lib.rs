//! # deal-suites
//!
//! Conformance suites for the CRM API.
//!
//! - [`recorder`]: append-only [`TestResult`] log and summaries
//! - [`scenarios`]: one runner per API behaviour
//! - [`suites`]: the timeline/checklist and summary/alerts suites
//! - [`orchestrator`]: runs suites in order and builds a [`CombinedReport`]
//!
//! Runners never propagate errors: every transport or contract failure
//! becomes a failed result and the suite moves on.

pub mod context;
pub mod fixtures;
pub mod orchestrator;
pub mod recorder;
pub mod roundtrip;
pub mod scenarios;
pub mod suites;
pub mod wait;

pub use context::{CreatedIds, RunSettings, SuiteContext};
pub use orchestrator::{CombinedReport, run_suite, run_suites};
pub use recorder::{Recorder, SuiteSummary, TestResult};
pub use suites::{Suite, SuiteReport};
pub use wait::WaitStrategy;
