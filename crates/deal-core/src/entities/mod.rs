//! Entity structs decoded from CRM response envelopes.
//!
//! Required fields are plain types so a missing field fails decoding with a
//! named-field error; everything the CRM may omit is `Option` or defaulted.
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod alert;
mod checklist;
mod summary;
mod transaction;
mod validation;

pub use alert::Alert;
pub use checklist::{ChecklistItem, ChecklistItemRef};
pub use summary::{AI_ANALYSIS_FIELDS, ChecklistSummary, DealSummary};
pub use transaction::{StageHistoryEntry, Transaction, TransactionRef};
pub use validation::{MissingTask, StageRejection, ValidationResult};
