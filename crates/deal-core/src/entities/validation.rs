use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ChecklistStatus, Priority};

/// An open task the stage validator considers blocking.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MissingTask {
    pub id: Option<String>,
    pub title: String,
    pub priority: Option<Priority>,
    pub status: Option<ChecklistStatus>,
}

/// Validator verdict attached to an accepted stage transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ValidationResult {
    #[serde(default)]
    pub valid: bool,
    /// Percentage in `0..=100`.
    pub confidence: Option<f64>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub missing_critical: Vec<String>,
    pub can_proceed_with_warnings: Option<bool>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub incomplete_count: Option<u32>,
    pub blocked_count: Option<u32>,
    #[serde(default)]
    pub missing_tasks: Vec<MissingTask>,
}

/// Body of a `422` stage-transition response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StageRejection {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    #[serde(default)]
    pub validation_errors: Vec<String>,
    #[serde(default)]
    pub missing_tasks: Vec<MissingTask>,
    pub can_force: Option<bool>,
}

impl StageRejection {
    /// A rejection must say why: validator errors or the open tasks.
    #[must_use]
    pub fn has_explanation(&self) -> bool {
        !self.validation_errors.is_empty() || !self.missing_tasks.is_empty()
    }
}
