use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ChecklistItem, Transaction};

/// Keys a model-backed deal analysis is expected to carry.
pub const AI_ANALYSIS_FIELDS: [&str; 6] = [
    "summary",
    "current_status",
    "progress_assessment",
    "critical_actions",
    "next_steps",
    "recommendations",
];

/// Task counters computed by the CRM for a deal summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChecklistSummary {
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    /// Absent when the CRM does not perform overdue detection.
    pub overdue_tasks: Option<u32>,
    pub current_stage_progress: Option<f64>,
    pub current_stage_tasks: Option<u32>,
}

/// Flat body of `GET /deals/summary/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DealSummary {
    pub transaction: Transaction,
    pub checklist_summary: ChecklistSummary,
    #[serde(default)]
    pub overdue_tasks: Vec<ChecklistItem>,
    /// Free-form model output; `null` when analysis was unavailable.
    pub ai_analysis: Option<serde_json::Value>,
    pub generated_at: DateTime<Utc>,
}

impl DealSummary {
    /// How many of [`AI_ANALYSIS_FIELDS`] the analysis carries.
    #[must_use]
    pub fn ai_fields_present(&self) -> usize {
        self.ai_analysis
            .as_ref()
            .and_then(serde_json::Value::as_object)
            .map_or(0, |analysis| {
                AI_ANALYSIS_FIELDS
                    .iter()
                    .filter(|field| analysis.contains_key(**field))
                    .count()
            })
    }
}
