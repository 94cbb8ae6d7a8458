//! Canned payloads the suites send.
//!
//! Dates are relative to a caller-supplied `now` so tests can pin them.

use chrono::{DateTime, Duration, Utc};
use deal_core::enums::{AlertType, ChecklistStatus, Priority, Stage, TransactionType};
use deal_core::requests::{AlertFilter, ChecklistUpdate, NewChecklistItem, NewTransaction, TransactionUpdate};

/// Agent that owns the alerts-suite fixture deal.
pub const ALERTS_AGENT: &str = "Sarah Johnson";

/// Seeded pre-listing tasks the stage-specific check looks for.
pub const EXPECTED_PRE_LISTING_TITLES: [&str; 4] = [
    "Property Condition Assessment",
    "Comparative Market Analysis (CMA)",
    "Pricing Strategy Development",
    "Listing Agreement Execution",
];

/// Natural-language commands sent to the agent endpoint.
pub const AGENT_COMMANDS: [&str; 5] = [
    "Summarize 125 Maple Ave deal",
    "Show me deal summary for 125 Maple Ave",
    "Get alerts for my deals",
    "Show me all smart alerts",
    "What's the status of the Maple Ave transaction?",
];

/// Minimum size of a new deal's seeded pre-listing checklist.
pub const MIN_DEFAULT_ITEMS: usize = 8;

#[must_use]
pub fn timeline_transaction(now: DateTime<Utc>) -> NewTransaction {
    NewTransaction {
        property_address: "123 Test Property Lane, Dallas, TX 75201".into(),
        client_name: "John Smith".into(),
        client_email: Some("john.smith@email.com".into()),
        client_phone: Some("(555) 123-4567".into()),
        transaction_type: TransactionType::Sale,
        assigned_agent: Some("Agent Test".into()),
        listing_price: Some(450_000),
        closing_date: Some(now + Duration::days(45)),
    }
}

#[must_use]
pub fn transaction_update() -> TransactionUpdate {
    TransactionUpdate {
        listing_price: Some(475_000),
        contract_price: Some(465_000),
        assigned_agent: Some("Updated Agent Name".into()),
    }
}

#[must_use]
pub fn custom_item(now: DateTime<Utc>) -> NewChecklistItem {
    NewChecklistItem {
        title: "Custom Test Task".into(),
        description: Some("This is a custom task added for testing".into()),
        stage: Stage::PreListing,
        priority: Priority::High,
        assignee: Some("Test Agent".into()),
        due_date: Some(now + Duration::days(7)),
        notes: Some("Test notes for custom task".into()),
    }
}

#[must_use]
pub fn custom_item_update() -> ChecklistUpdate {
    ChecklistUpdate {
        status: Some(ChecklistStatus::InProgress),
        notes: Some("Updated notes - task is now in progress".into()),
        assignee: Some("Updated Agent".into()),
        ..ChecklistUpdate::default()
    }
}

#[must_use]
pub fn due_date_item(now: DateTime<Utc>) -> NewChecklistItem {
    NewChecklistItem {
        title: "Due Date Test Task".into(),
        description: Some("Testing due date calculations and assignee management".into()),
        stage: Stage::PreListing,
        priority: Priority::Medium,
        assignee: Some("Test Agent Smith".into()),
        due_date: Some(now + Duration::days(14)),
        notes: Some("Testing due date and assignee functionality".into()),
    }
}

#[must_use]
pub fn reassignment() -> ChecklistUpdate {
    ChecklistUpdate {
        assignee: Some("Updated Agent Johnson".into()),
        notes: Some("Reassigned to different agent".into()),
        ..ChecklistUpdate::default()
    }
}

#[must_use]
pub fn block_for_validation() -> ChecklistUpdate {
    ChecklistUpdate {
        status: Some(ChecklistStatus::Blocked),
        notes: Some("Blocked for testing AI validation - waiting for client approval".into()),
        ..ChecklistUpdate::default()
    }
}

/// Status walk exercised on one item: `(from, to)` pairs.
pub const STATUS_CYCLE: [(ChecklistStatus, ChecklistStatus); 4] = [
    (ChecklistStatus::NotStarted, ChecklistStatus::InProgress),
    (ChecklistStatus::InProgress, ChecklistStatus::Completed),
    (ChecklistStatus::Completed, ChecklistStatus::Blocked),
    (ChecklistStatus::Blocked, ChecklistStatus::InProgress),
];

#[must_use]
pub fn alerts_transaction(now: DateTime<Utc>) -> NewTransaction {
    NewTransaction {
        property_address: "125 Maple Ave, Dallas, TX 75201".into(),
        client_name: "John Smith".into(),
        client_email: Some("john.smith@email.com".into()),
        client_phone: Some("555-0123".into()),
        transaction_type: TransactionType::Sale,
        assigned_agent: Some(ALERTS_AGENT.into()),
        listing_price: Some(450_000),
        closing_date: Some(now + Duration::days(30)),
    }
}

/// An urgent task already five days late, so overdue detection has something to find.
#[must_use]
pub fn overdue_item(now: DateTime<Utc>) -> NewChecklistItem {
    NewChecklistItem {
        title: "Property Assessment - OVERDUE".into(),
        description: Some("Urgent property assessment needed".into()),
        stage: Stage::PreListing,
        priority: Priority::Urgent,
        assignee: Some(ALERTS_AGENT.into()),
        due_date: Some(now - Duration::days(5)),
        notes: None,
    }
}

/// The three independent alert filters, with a label for each.
#[must_use]
pub fn alert_filters() -> Vec<(&'static str, AlertFilter)> {
    vec![
        (
            "priority filter",
            AlertFilter {
                priority: Some(Priority::High),
                ..AlertFilter::default()
            },
        ),
        (
            "type filter",
            AlertFilter {
                alert_type: Some(AlertType::OverdueTasks),
                ..AlertFilter::default()
            },
        ),
        (
            "agent filter",
            AlertFilter {
                agent: Some(ALERTS_AGENT.into()),
                ..AlertFilter::default()
            },
        ),
    ]
}
