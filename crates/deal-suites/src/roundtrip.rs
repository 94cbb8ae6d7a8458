//! Compare the fields a request sent with what the CRM echoed back.
//!
//! An update only counts as applied when three observations agree with the
//! payload: the reply to the PUT, a fresh GET of the same entity, and the
//! reply to sending the identical PUT again.

use serde::Serialize;
use serde_json::Value;

/// A field whose observed value differs from the value sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMismatch {
    pub field: String,
    pub sent: Value,
    pub observed: Option<Value>,
}

/// Every top-level key of `sent` whose value is absent from, or differs in, `observed`.
///
/// Numbers compare by value so `475000` matches `475000.0`.
#[must_use]
pub fn mismatched_fields(sent: &Value, observed: &Value) -> Vec<FieldMismatch> {
    let Some(sent) = sent.as_object() else {
        return Vec::new();
    };
    sent.iter()
        .filter_map(|(field, expected)| {
            let actual = observed.get(field);
            if actual.is_some_and(|actual| values_match(expected, actual)) {
                return None;
            }
            Some(FieldMismatch {
                field: field.clone(),
                sent: expected.clone(),
                observed: actual.cloned(),
            })
        })
        .collect()
}

fn values_match(expected: &Value, actual: &Value) -> bool {
    match (expected.as_f64(), actual.as_f64()) {
        (Some(a), Some(b)) if expected.is_number() && actual.is_number() => (a - b).abs() < 1e-9,
        _ => expected == actual,
    }
}

/// `field: sent → observed` lines for a failure message.
#[must_use]
pub fn describe(mismatches: &[FieldMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| {
            let observed = m
                .observed
                .as_ref()
                .map_or_else(|| "<absent>".to_string(), Value::to_string);
            format!("{}: sent {} got {observed}", m.field, m.sent)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// One of the reads an update is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The body returned by the update itself.
    Echo,
    /// A separate read issued after the update.
    Reread,
    /// The body returned by repeating the same update.
    Repeat,
}

impl Observation {
    const fn failure(self) -> &'static str {
        match self {
            Self::Echo => "Updates not applied",
            Self::Reread => "Updates not persisted",
            Self::Repeat => "Repeating the update changed the result",
        }
    }
}

/// Failure message when `observed` disagrees with `sent`, or `None`.
#[must_use]
pub fn divergence(observation: Observation, sent: &Value, observed: &Value) -> Option<String> {
    let mismatches = mismatched_fields(sent, observed);
    if mismatches.is_empty() {
        None
    } else {
        Some(format!("{}: {}", observation.failure(), describe(&mismatches)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn integer_and_float_prices_match() {
        let sent = json!({"listing_price": 475_000, "assigned_agent": "Updated Agent Name"});
        let observed = json!({"listing_price": 475_000.0, "assigned_agent": "Updated Agent Name", "id": "t-1"});
        assert!(mismatched_fields(&sent, &observed).is_empty());
    }

    #[test]
    fn absent_and_changed_fields_are_reported() {
        let sent = json!({"status": "in_progress", "notes": "n", "assignee": "Updated Agent"});
        let observed = json!({"status": "not_started", "notes": "n"});
        let mismatches = mismatched_fields(&sent, &observed);
        assert_eq!(
            mismatches,
            vec![
                FieldMismatch {
                    field: "assignee".into(),
                    sent: json!("Updated Agent"),
                    observed: None,
                },
                FieldMismatch {
                    field: "status".into(),
                    sent: json!("in_progress"),
                    observed: Some(json!("not_started")),
                },
            ]
        );
        assert_eq!(
            describe(&mismatches),
            "assignee: sent \"Updated Agent\" got <absent>; status: sent \"in_progress\" got \"not_started\""
        );
    }

    #[test]
    fn numeric_string_does_not_match_number() {
        let sent = json!({"listing_price": 450_000});
        let observed = json!({"listing_price": "450000"});
        assert_eq!(mismatched_fields(&sent, &observed).len(), 1);
    }

    #[test]
    fn stale_reread_names_the_observation_and_field() {
        let sent = json!({"listing_price": 475_000, "assigned_agent": "Updated Agent Name"});
        let reread = json!({"listing_price": 450_000, "assigned_agent": "Updated Agent Name"});
        assert_eq!(
            divergence(Observation::Reread, &sent, &reread).as_deref(),
            Some("Updates not persisted: listing_price: sent 475000 got 450000")
        );
        assert_eq!(divergence(Observation::Echo, &sent, &sent), None);
    }
}
