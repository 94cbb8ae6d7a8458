use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AlertType, Priority};

/// A smart alert produced by the CRM's alert generator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Alert {
    pub id: String,
    pub alert_type: AlertType,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub transaction_id: Option<String>,
    pub property_address: Option<String>,
    pub client_name: Option<String>,
    pub assigned_agent: Option<String>,
    pub status: Option<String>,
    /// Generator-specific payload (overdue counts, days to closing, ...).
    pub details: Option<serde_json::Value>,
}

impl Alert {
    #[must_use]
    pub fn has_details(&self) -> bool {
        self.details
            .as_ref()
            .is_some_and(|details| !details.is_null())
    }
}
