//! Scenario runners, one per API behaviour.
//!
//! A runner makes one or two calls, records exactly the results it owns,
//! and returns whatever later runners need (possibly nothing). Contract
//! failures become failed results here and never propagate.

pub mod agent;
pub mod alerts;
pub mod checklist;
pub mod deals;
pub mod stages;
pub mod transactions;

use deal_client::ContractError;
use serde_json::json;

use crate::context::SuiteContext;

/// Record `err` as the failed outcome of `name`.
pub(crate) fn record_error(ctx: &mut SuiteContext, name: &str, err: &ContractError) {
    let message = if err.is_transport() {
        format!("Request failed: {err}")
    } else {
        err.to_string()
    };
    let details = match err {
        ContractError::UnexpectedStatus { status, body, .. } => {
            Some(json!({"status": status, "body": body}))
        }
        ContractError::MissingKey { observed, .. } | ContractError::MissingFields { observed, .. } => {
            Some(json!({"observed_keys": observed}))
        }
        _ => None,
    };
    ctx.recorder.fail(name, message, details);
}
