//! Transaction CRUD scenarios.

use chrono::Utc;
use deal_core::entities::Transaction;
use deal_core::enums::Stage;
use serde_json::{Value, json};

use super::record_error;
use crate::context::SuiteContext;
use crate::fixtures;
use crate::roundtrip::{Observation, describe, divergence, mismatched_fields};

pub const LIST: &str = "Transaction CRUD - GET /transactions";
pub const CREATE: &str = "Transaction CRUD - POST /transactions";
pub const FETCH: &str = "Transaction CRUD - GET /transactions/:id";
pub const UPDATE: &str = "Transaction CRUD - PUT /transactions/:id";

/// Keys of the create payload whose echo is checked. `closing_date` is
/// re-serialized by the server, so it is left out.
const CREATE_ECHO_KEYS: [&str; 4] = ["property_address", "client_name", "transaction_type", "listing_price"];

pub async fn list_transactions(ctx: &mut SuiteContext) -> Vec<Transaction> {
    match ctx.client.list_transactions().await {
        Ok(listed) => {
            ctx.recorder.pass(
                LIST,
                format!("Retrieved {} transactions", listed.value.len()),
                None,
            );
            listed.value
        }
        Err(err) => {
            record_error(ctx, LIST, &err);
            Vec::new()
        }
    }
}

/// Create the suite's fixture deal and check it starts in `pre_listing`.
pub async fn create_transaction(ctx: &mut SuiteContext) -> Option<Transaction> {
    let payload = fixtures::timeline_transaction(Utc::now());
    let created = match ctx.client.create_transaction(&payload).await {
        Ok(created) => created,
        Err(err) => {
            record_error(ctx, CREATE, &err);
            return None;
        }
    };
    // The id is real even if later checks fail; dependents may still use it.
    ctx.track_transaction(&created.value);

    let transaction = created.value;
    if transaction.current_stage != Stage::PreListing {
        ctx.recorder.fail(
            CREATE,
            format!(
                "New transaction starts in {} instead of {}",
                transaction.current_stage,
                Stage::PreListing
            ),
            None,
        );
        return Some(transaction);
    }

    let sent = echo_subset(&payload, &CREATE_ECHO_KEYS);
    let mismatches = mismatched_fields(&sent, &created.raw);
    if mismatches.is_empty() {
        ctx.recorder.pass(
            CREATE,
            format!(
                "Transaction created. ID: {}, Stage: {}",
                transaction.id, transaction.current_stage
            ),
            Some(json!({"stage_history": transaction.stage_history.len()})),
        );
    } else {
        ctx.recorder.fail(
            CREATE,
            format!("Created transaction does not echo the payload: {}", describe(&mismatches)),
            None,
        );
    }
    Some(transaction)
}

pub async fn fetch_transaction(ctx: &mut SuiteContext, id: &str) -> Option<Transaction> {
    match ctx.client.get_transaction(id).await {
        Ok(fetched) if fetched.value.id == id => {
            ctx.observe(&fetched.value);
            ctx.recorder.pass(
                FETCH,
                format!("Retrieved transaction {id}"),
                Some(json!({
                    "property_address": fetched.value.property_address,
                    "current_stage": fetched.value.current_stage,
                })),
            );
            Some(fetched.value)
        }
        Ok(fetched) => {
            ctx.recorder.fail(
                FETCH,
                format!("Asked for {id}, got {}", fetched.value.id),
                None,
            );
            None
        }
        Err(err) => {
            record_error(ctx, FETCH, &err);
            None
        }
    }
}

/// Update price and agent, then require the new values in the reply, in a
/// fresh read, and in the reply to the same update sent again.
pub async fn update_transaction(ctx: &mut SuiteContext, id: &str) -> Option<Transaction> {
    let update = fixtures::transaction_update();
    let sent = serde_json::to_value(&update).unwrap_or(Value::Null);

    let updated = match ctx.client.update_transaction(id, &update).await {
        Ok(updated) => updated,
        Err(err) => {
            record_error(ctx, UPDATE, &err);
            return None;
        }
    };
    ctx.observe(&updated.value);
    if let Some(problem) = divergence(Observation::Echo, &sent, &updated.raw) {
        ctx.recorder.fail(UPDATE, problem, Some(updated.raw));
        return None;
    }

    let reread = match ctx.client.get_transaction(id).await {
        Ok(reread) => reread,
        Err(err) => {
            record_error(ctx, UPDATE, &err);
            return None;
        }
    };
    ctx.observe(&reread.value);
    if let Some(problem) = divergence(Observation::Reread, &sent, &reread.raw) {
        ctx.recorder.fail(UPDATE, problem, Some(reread.raw));
        return None;
    }

    ctx.pace().await;
    let repeated = match ctx.client.update_transaction(id, &update).await {
        Ok(repeated) => repeated,
        Err(err) => {
            record_error(ctx, UPDATE, &err);
            return None;
        }
    };
    ctx.observe(&repeated.value);
    if let Some(problem) = divergence(Observation::Repeat, &sent, &repeated.raw) {
        ctx.recorder.fail(UPDATE, problem, Some(repeated.raw));
        return None;
    }

    let fields: Vec<&String> = sent.as_object().map(|o| o.keys().collect()).unwrap_or_default();
    ctx.recorder.pass(
        UPDATE,
        format!("Transaction {id} updated"),
        Some(json!({"updated_fields": fields})),
    );
    Some(repeated.value)
}

fn echo_subset<T: serde::Serialize>(payload: &T, keys: &[&str]) -> Value {
    let full = serde_json::to_value(payload).unwrap_or(Value::Null);
    let subset = keys
        .iter()
        .filter_map(|key| full.get(*key).map(|value| ((*key).to_string(), value.clone())))
        .collect();
    Value::Object(subset)
}
