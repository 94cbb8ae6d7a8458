use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ChecklistStatus, Priority, Stage};

/// A checklist task attached to one stage of a transaction.
///
/// Decoding succeeds only when `status` and `priority` hold one of the
/// documented wire values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: String,
    pub transaction_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub stage: Stage,
    pub status: ChecklistStatus,
    pub priority: Priority,
    pub assignee: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub order: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ChecklistItem {
    #[must_use]
    pub fn to_ref(&self) -> ChecklistItemRef {
        ChecklistItemRef {
            id: self.id.clone(),
            stage: self.stage,
            status: self.status,
        }
    }

    /// Whether the item is past due and still open at `now`.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.status != ChecklistStatus::Completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Cached identity of a checklist item created during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItemRef {
    pub id: String,
    pub stage: Stage,
    pub status: ChecklistStatus,
}
