//! Stage, status, priority, and alert enums observed on the CRM API.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! matching the wire values the CRM emits. `Stage` carries the forward-only
//! progression the stage-transition endpoint enforces.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Resolve `value` against the wire names of `variants`.
fn parse_variant<T: Copy>(
    kind: &'static str,
    value: &str,
    variants: &[T],
    as_str: impl Fn(T) -> &'static str,
) -> Result<T, CoreError> {
    variants
        .iter()
        .copied()
        .find(|variant| as_str(*variant) == value)
        .ok_or_else(|| CoreError::UnknownVariant {
            kind,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Lifecycle stage of a transaction.
///
/// ```text
/// pre_listing → listing → under_contract → escrow_closing
/// ```
///
/// Stages cannot be skipped; the CRM only moves a deal one stage forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PreListing,
    Listing,
    UnderContract,
    EscrowClosing,
}

impl Stage {
    /// Every stage in progression order.
    pub const ALL: [Self; 4] = [
        Self::PreListing,
        Self::Listing,
        Self::UnderContract,
        Self::EscrowClosing,
    ];

    /// One-based position used by the CRM to sort checklist items.
    #[must_use]
    pub const fn order(self) -> u8 {
        match self {
            Self::PreListing => 1,
            Self::Listing => 2,
            Self::UnderContract => 3,
            Self::EscrowClosing => 4,
        }
    }

    /// The stage that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PreListing => Some(Self::Listing),
            Self::Listing => Some(Self::UnderContract),
            Self::UnderContract => Some(Self::EscrowClosing),
            Self::EscrowClosing => None,
        }
    }

    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreListing => "pre_listing",
            Self::Listing => "listing",
            Self::UnderContract => "under_contract",
            Self::EscrowClosing => "escrow_closing",
        }
    }

    /// Title-cased label used in scenario names (`Pre Listing`).
    #[must_use]
    pub fn label(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("stage", s, &Self::ALL, Self::as_str)
    }
}

// ---------------------------------------------------------------------------
// ChecklistStatus
// ---------------------------------------------------------------------------

/// Status of a checklist item.
///
/// The CRM accepts any status change; the harness exercises
/// `not_started → in_progress → completed → blocked → in_progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    NotStarted,
    InProgress,
    Completed,
    Blocked,
}

impl ChecklistStatus {
    pub const ALL: [Self; 4] = [
        Self::NotStarted,
        Self::InProgress,
        Self::Completed,
        Self::Blocked,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecklistStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("checklist status", s, &Self::ALL, Self::as_str)
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority shared by checklist items and smart alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("priority", s, &Self::ALL, Self::as_str)
    }
}

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Purchase,
    Lease,
}

impl TransactionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::Lease => "lease",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AlertType
// ---------------------------------------------------------------------------

/// Category of a smart alert.
///
/// The CRM is free to add categories; values the harness does not know
/// decode to [`AlertType::Unrecognized`] instead of failing the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    OverdueTasks,
    DealInactivity,
    #[serde(alias = "approaching_closing")]
    ClosingApproaching,
    #[serde(other)]
    Unrecognized,
}

impl AlertType {
    /// Categories the harness knows how to reason about.
    pub const RECOGNIZED: [Self; 3] = [
        Self::OverdueTasks,
        Self::DealInactivity,
        Self::ClosingApproaching,
    ];

    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OverdueTasks => "overdue_tasks",
            Self::DealInactivity => "deal_inactivity",
            Self::ClosingApproaching => "closing_approaching",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "approaching_closing" {
            return Ok(Self::ClosingApproaching);
        }
        parse_variant("alert type", s, &Self::RECOGNIZED, Self::as_str)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn stage_progression_is_linear() {
        let mut stage = Stage::PreListing;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert!(stage.can_transition_to(next));
            assert!(stage.order() < next.order());
            stage = next;
            visited.push(stage);
        }
        assert_eq!(visited, Stage::ALL.to_vec());
    }

    #[rstest]
    #[case(Stage::PreListing, Stage::UnderContract)]
    #[case(Stage::Listing, Stage::PreListing)]
    #[case(Stage::EscrowClosing, Stage::EscrowClosing)]
    fn stage_rejects_skips_and_backward_moves(#[case] from: Stage, #[case] to: Stage) {
        assert!(!from.can_transition_to(to));
    }

    #[test]
    fn stage_label_is_title_cased() {
        assert_eq!(Stage::PreListing.label(), "Pre Listing");
        assert_eq!(Stage::EscrowClosing.label(), "Escrow Closing");
    }

    #[rstest]
    #[case("under_contract", Stage::UnderContract)]
    #[case("escrow_closing", Stage::EscrowClosing)]
    fn stage_parses_wire_names(#[case] raw: &str, #[case] expected: Stage) {
        assert_eq!(raw.parse::<Stage>().unwrap(), expected);
    }

    #[test]
    fn unknown_priority_is_an_error() {
        let err = "critical".parse::<Priority>().unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownVariant {
                kind: "priority",
                ..
            }
        ));
    }

    #[test]
    fn alert_type_accepts_both_closing_spellings() {
        let a: AlertType = serde_json::from_str("\"closing_approaching\"").unwrap();
        let b: AlertType = serde_json::from_str("\"approaching_closing\"").unwrap();
        assert_eq!(a, AlertType::ClosingApproaching);
        assert_eq!(b, AlertType::ClosingApproaching);
        assert_eq!(
            "approaching_closing".parse::<AlertType>().unwrap(),
            AlertType::ClosingApproaching
        );
    }

    #[test]
    fn alert_type_tolerates_new_categories() {
        let parsed: AlertType = serde_json::from_str("\"price_drop\"").unwrap();
        assert_eq!(parsed, AlertType::Unrecognized);
        assert!(!parsed.is_recognized());
        assert!(AlertType::OverdueTasks.is_recognized());
    }

    #[test]
    fn checklist_status_serializes_snake_case() {
        let json = serde_json::to_string(&ChecklistStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not_started\"");
        assert_eq!(
            "in_progress".parse::<ChecklistStatus>().unwrap(),
            ChecklistStatus::InProgress
        );
    }
}
