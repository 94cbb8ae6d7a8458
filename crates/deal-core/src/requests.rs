//! Request payloads sent to the CRM.
//!
//! `None` fields are omitted on the wire so partial updates only touch the
//! fields the caller set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{AlertType, ChecklistStatus, Priority, Stage, TransactionType};

/// Body of `POST /transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub property_address: String,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /transactions/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<String>,
}

/// Body of `POST /transactions/:id/checklist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChecklistItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stage: Stage,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /checklist/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ChecklistStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /transactions/:id/stage-transition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransitionRequest {
    pub target_stage: Stage,
    pub force: bool,
}

impl StageTransitionRequest {
    #[must_use]
    pub const fn validated(target_stage: Stage) -> Self {
        Self {
            target_stage,
            force: false,
        }
    }

    #[must_use]
    pub const fn forced(target_stage: Stage) -> Self {
        Self {
            target_stage,
            force: true,
        }
    }
}

/// Body of `POST /agent/command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCommandRequest {
    pub command: String,
}

/// Query filters for `GET /alerts/smart`. Each filter is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub priority: Option<Priority>,
    pub alert_type: Option<AlertType>,
    pub agent: Option<String>,
}

impl AlertFilter {
    /// `(name, value)` query pairs in a stable order, values not yet encoded.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(alert_type) = self.alert_type {
            pairs.push(("type", alert_type.as_str().to_string()));
        }
        if let Some(agent) = &self.agent {
            pairs.push(("agent", agent.clone()));
        }
        pairs
    }
}
