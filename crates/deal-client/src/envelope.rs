//! Response contract checks shared by every endpoint.
//!
//! A CRM reply is accepted in layers: expected status, a JSON body, a
//! `success: true` flag, the entity key, the entity's required fields, and
//! finally a typed decode. Each layer maps to one [`ContractError`] variant
//! so the failure message says exactly which layer broke.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ApiResponse, ContractError, ResponseBody};

/// Required keys of a transaction entity.
pub const TRANSACTION_FIELDS: &[&str] = &[
    "id",
    "property_address",
    "client_name",
    "current_stage",
    "stage_history",
];

/// Required keys of a checklist item entity.
pub const CHECKLIST_ITEM_FIELDS: &[&str] = &["id", "title", "stage", "status", "priority"];

/// Required keys of a smart alert.
pub const ALERT_FIELDS: &[&str] = &["id", "alert_type", "priority", "title", "message", "created_at"];

/// Required top-level keys of a deal summary body.
pub const DEAL_SUMMARY_FIELDS: &[&str] =
    &["transaction", "checklist_summary", "ai_analysis", "generated_at"];

/// A decoded entity together with the JSON it came from.
///
/// Round-trip and key-presence checks look at `raw`; everything else uses
/// the typed `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observed<T> {
    pub value: T,
    pub raw: Value,
}

/// A JSON body whose status has already been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Accept the response only if its status is one of `expected` and the body is JSON.
    ///
    /// # Errors
    ///
    /// [`ContractError::UnexpectedStatus`] carrying the raw body, or
    /// [`ContractError::Decode`] when the body is not JSON.
    pub fn expect_status(self, expected: &[u16]) -> Result<Envelope, ContractError> {
        if !expected.contains(&self.status) {
            return Err(ContractError::UnexpectedStatus {
                expected: expected
                    .iter()
                    .map(u16::to_string)
                    .collect::<Vec<_>>()
                    .join(" or "),
                status: self.status,
                body: self.body.render(),
            });
        }
        match self.body {
            ResponseBody::Json(body) => Ok(Envelope {
                status: self.status,
                body,
            }),
            ResponseBody::Text(text) => Err(ContractError::Decode {
                key: "<body>".into(),
                reason: format!("expected JSON, got {text:?}"),
            }),
        }
    }
}

impl Envelope {
    /// Require `success: true`.
    ///
    /// # Errors
    ///
    /// [`ContractError::NotSuccessful`] with the server's `error` text if any.
    pub fn require_success(self) -> Result<Self, ContractError> {
        if self.body.get("success").and_then(Value::as_bool) == Some(true) {
            return Ok(self);
        }
        let reason = self
            .body
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(
                || "success flag missing or false".to_string(),
                str::to_string,
            );
        Err(ContractError::NotSuccessful { reason })
    }

    /// The value under `key`.
    ///
    /// # Errors
    ///
    /// [`ContractError::MissingKey`] listing the keys that were present.
    pub fn key(&self, key: &str) -> Result<&Value, ContractError> {
        self.body.get(key).ok_or_else(|| ContractError::MissingKey {
            key: key.to_string(),
            observed: observed_keys(&self.body),
        })
    }

    /// Decode the entity under `key` after checking its required fields.
    ///
    /// # Errors
    ///
    /// [`ContractError::MissingKey`], [`ContractError::MissingFields`], or
    /// [`ContractError::Decode`].
    pub fn entity<T: DeserializeOwned>(
        &self,
        key: &str,
        required: &[&str],
    ) -> Result<Observed<T>, ContractError> {
        let raw = self.key(key)?;
        require_fields(key, raw, required)?;
        Ok(Observed {
            value: decode(key, raw)?,
            raw: raw.clone(),
        })
    }

    /// Decode the array under `key`, checking `required` on every element.
    ///
    /// # Errors
    ///
    /// As [`Self::entity`]; also [`ContractError::Decode`] if `key` is not an array.
    pub fn list<T: DeserializeOwned>(
        &self,
        key: &str,
        required: &[&str],
    ) -> Result<Observed<Vec<T>>, ContractError> {
        let raw = self.key(key)?;
        let items = raw.as_array().ok_or_else(|| ContractError::Decode {
            key: key.to_string(),
            reason: "expected an array".into(),
        })?;
        for (index, item) in items.iter().enumerate() {
            require_fields(&format!("{key}[{index}]"), item, required)?;
        }
        Ok(Observed {
            value: decode(key, raw)?,
            raw: raw.clone(),
        })
    }

    /// Decode the whole body (for endpoints whose entity is the envelope itself).
    ///
    /// # Errors
    ///
    /// [`ContractError::MissingFields`] or [`ContractError::Decode`].
    pub fn whole<T: DeserializeOwned>(&self, required: &[&str]) -> Result<Observed<T>, ContractError> {
        require_fields("response", &self.body, required)?;
        Ok(Observed {
            value: decode("<body>", &self.body)?,
            raw: self.body.clone(),
        })
    }
}

/// Check that `value` is an object containing every key in `required`.
///
/// # Errors
///
/// [`ContractError::MissingFields`] naming the absent keys.
pub fn require_fields(entity: &str, value: &Value, required: &[&str]) -> Result<(), ContractError> {
    let missing: Vec<String> = match value.as_object() {
        Some(object) => required
            .iter()
            .filter(|field| !object.contains_key(**field))
            .map(|field| (*field).to_string())
            .collect(),
        None => required.iter().map(|field| (*field).to_string()).collect(),
    };
    if missing.is_empty() {
        return Ok(());
    }
    Err(ContractError::MissingFields {
        entity: entity.to_string(),
        fields: missing,
        observed: observed_keys(value),
    })
}

fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, ContractError> {
    T::deserialize(value).map_err(|e| ContractError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Comma-separated top-level keys, or the JSON type name for non-objects.
#[must_use]
pub fn observed_keys(value: &Value) -> String {
    match value {
        Value::Object(object) => object.keys().cloned().collect::<Vec<_>>().join(", "),
        Value::Array(_) => "<array>".into(),
        Value::Null => "<null>".into(),
        _ => "<scalar>".into(),
    }
}

#[cfg(test)]
mod tests {
    use deal_core::entities::{ChecklistItem, Transaction};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn json_response(status: u16, body: Value) -> ApiResponse {
        ApiResponse {
            status,
            body: ResponseBody::Json(body),
        }
    }

    fn transaction_json() -> Value {
        json!({
            "id": "t-1",
            "property_address": "123 Test Property Lane, Dallas, TX 75201",
            "client_name": "John Smith",
            "current_stage": "pre_listing",
            "stage_history": [{"stage": "pre_listing", "status": "active"}]
        })
    }

    #[test]
    fn wrong_status_keeps_the_raw_body() {
        let err = json_response(500, json!({"error": "boom"}))
            .expect_status(&[201])
            .unwrap_err();
        match err {
            ContractError::UnexpectedStatus {
                expected,
                status,
                body,
            } => {
                assert_eq!(expected, "201");
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn text_body_with_right_status_is_a_decode_error() {
        let err = ApiResponse {
            status: 200,
            body: ResponseBody::Text("ok".into()),
        }
        .expect_status(&[200])
        .unwrap_err();
        assert!(matches!(err, ContractError::Decode { .. }));
    }

    #[test]
    fn false_success_reports_server_error_text() {
        let err = json_response(200, json!({"success": false, "error": "Alert not found"}))
            .expect_status(&[200])
            .and_then(Envelope::require_success)
            .unwrap_err();
        assert_eq!(err.to_string(), "response reported failure: Alert not found");
    }

    #[test]
    fn missing_entity_key_lists_observed_keys() {
        let envelope = json_response(201, json!({"success": true, "message": "ok"}))
            .expect_status(&[201])
            .unwrap();
        let err = envelope
            .entity::<Transaction>("transaction", TRANSACTION_FIELDS)
            .unwrap_err();
        match err {
            ContractError::MissingKey { key, observed } => {
                assert_eq!(key, "transaction");
                assert_eq!(observed, "message, success");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_required_fields_are_named() {
        let mut transaction = transaction_json();
        transaction.as_object_mut().unwrap().remove("stage_history");
        let envelope = json_response(200, json!({"success": true, "transaction": transaction}))
            .expect_status(&[200])
            .unwrap();
        let err = envelope
            .entity::<Transaction>("transaction", TRANSACTION_FIELDS)
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::MissingFields { ref fields, .. } if fields == &["stage_history".to_string()]
        ));
    }

    #[test]
    fn entity_keeps_raw_json_next_to_typed_value() {
        let envelope = json_response(201, json!({"success": true, "transaction": transaction_json()}))
            .expect_status(&[201])
            .and_then(Envelope::require_success)
            .unwrap();
        let observed = envelope
            .entity::<Transaction>("transaction", TRANSACTION_FIELDS)
            .unwrap();
        assert_eq!(observed.value.id, "t-1");
        assert_eq!(observed.raw["client_name"], "John Smith");
    }

    #[test]
    fn out_of_range_priority_fails_decode() {
        let envelope = json_response(
            200,
            json!({"success": true, "checklist_items": [{
                "id": "c-1", "title": "Survey", "stage": "pre_listing",
                "status": "not_started", "priority": "critical"
            }]}),
        )
        .expect_status(&[200])
        .unwrap();
        let err = envelope
            .list::<ChecklistItem>("checklist_items", CHECKLIST_ITEM_FIELDS)
            .unwrap_err();
        assert!(matches!(err, ContractError::Decode { ref key, .. } if key == "checklist_items"));
    }

    #[test]
    fn list_reports_index_of_incomplete_element() {
        let envelope = json_response(
            200,
            json!({"success": true, "checklist_items": [
                {"id": "c-1", "title": "A", "stage": "pre_listing", "status": "not_started", "priority": "low"},
                {"id": "c-2", "title": "B", "stage": "pre_listing", "priority": "low"}
            ]}),
        )
        .expect_status(&[200])
        .unwrap();
        let err = envelope
            .list::<ChecklistItem>("checklist_items", CHECKLIST_ITEM_FIELDS)
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::MissingFields { ref entity, .. } if entity == "checklist_items[1]"
        ));
    }

    #[test]
    fn non_object_has_every_field_missing() {
        let err = require_fields("transaction", &json!("t-1"), &["id", "client_name"]).unwrap_err();
        assert!(matches!(
            err,
            ContractError::MissingFields { ref fields, ref observed, .. }
                if fields.len() == 2 && observed == "<scalar>"
        ));
    }
}
