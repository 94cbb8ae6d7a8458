//! # deal-core
//!
//! Observed CRM types for dealprobe.
//!
//! The harness owns no persistent data; everything here is a client-side view
//! of remote state:
//! - Stage / status / priority / alert enums with `snake_case` wire names
//! - Entity structs decoded from response envelopes (transactions, checklist
//!   items, alerts, validation results, deal summaries)
//! - Request payloads sent to the CRM
//! - Small reply envelopes (`Ack`, `AgentCommandReply`)
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::CoreError;
