use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ValidationResult;
use crate::enums::{Stage, TransactionType};

/// One entry of a transaction's stage history, appended on every accepted
/// (or forced) stage transition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StageHistoryEntry {
    pub stage: Stage,
    pub entered_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub transitioned_from: Option<Stage>,
    pub validation_result: Option<ValidationResult>,
}

/// A real-estate deal as returned under the `transaction` envelope key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub property_address: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub current_stage: Stage,
    pub assigned_agent: Option<String>,
    pub listing_price: Option<f64>,
    pub contract_price: Option<f64>,
    /// Echoed back verbatim from the create/update payload.
    pub closing_date: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub stage_history: Vec<StageHistoryEntry>,
}

impl Transaction {
    #[must_use]
    pub fn to_ref(&self) -> TransactionRef {
        TransactionRef {
            id: self.id.clone(),
            current_stage: self.current_stage,
            history_len: self.stage_history.len(),
        }
    }
}

/// The slice of a transaction the harness carries between scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRef {
    pub id: String,
    pub current_stage: Stage,
    pub history_len: usize,
}

impl TransactionRef {
    /// Refresh the cached stage and history length from a newer observation.
    pub fn observe(&mut self, transaction: &Transaction) {
        if transaction.id == self.id {
            self.current_stage = transaction.current_stage;
            self.history_len = transaction.stage_history.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const CREATED: &str = r#"{
        "id": "2f1c0f2e-6a43-4d55-9b43-0c1d8b7e4a10",
        "property_address": "123 Test Property Lane, Dallas, TX 75201",
        "client_name": "John Smith",
        "client_email": "john.smith@email.com",
        "transaction_type": "sale",
        "current_stage": "pre_listing",
        "listing_price": 450000,
        "closing_date": "2026-12-03T10:00:00.000000",
        "created_at": "2026-10-19T10:00:00.000Z",
        "stage_history": [
            {"stage": "pre_listing", "entered_at": "2026-10-19T10:00:00.000Z", "status": "active"}
        ]
    }"#;

    #[test]
    fn decodes_created_transaction() {
        let tx: Transaction = serde_json::from_str(CREATED).unwrap();
        assert_eq!(tx.current_stage, Stage::PreListing);
        assert_eq!(tx.listing_price, Some(450_000.0));
        assert_eq!(tx.stage_history.len(), 1);
        assert!(tx.contract_price.is_none());
        assert_eq!(
            tx.closing_date.as_deref(),
            Some("2026-12-03T10:00:00.000000")
        );
    }

    #[test]
    fn missing_stage_history_fails_decoding() {
        let mut value: serde_json::Value = serde_json::from_str(CREATED).unwrap();
        value.as_object_mut().unwrap().remove("stage_history");
        let err = serde_json::from_value::<Transaction>(value).unwrap_err();
        assert!(err.to_string().contains("stage_history"));
    }

    #[test]
    fn ref_tracks_newer_observations_of_same_id_only() {
        let tx: Transaction = serde_json::from_str(CREATED).unwrap();
        let mut cached = tx.to_ref();

        let mut moved = tx.clone();
        moved.current_stage = Stage::Listing;
        moved.stage_history.push(StageHistoryEntry {
            stage: Stage::Listing,
            entered_at: None,
            status: Some("active".into()),
            transitioned_from: Some(Stage::PreListing),
            validation_result: None,
        });
        cached.observe(&moved);
        assert_eq!(cached.current_stage, Stage::Listing);
        assert_eq!(cached.history_len, 2);

        let mut other = moved.clone();
        other.id = "someone-else".into();
        other.current_stage = Stage::EscrowClosing;
        cached.observe(&other);
        assert_eq!(cached.current_stage, Stage::Listing);
    }
}
