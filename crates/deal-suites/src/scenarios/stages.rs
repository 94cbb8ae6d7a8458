//! Stage transition scenarios.
//!
//! A transition is a two-step client-side state machine:
//!
//! ```text
//! Validated ──200──▶ Done
//!     │
//!    422
//!     ▼
//!  Forced ──200 (history not shorter)──▶ Done
//!     │
//!  anything else ──▶ Failed (terminal, no second retry)
//! ```

use deal_client::TransitionOutcome;
use deal_core::entities::{StageRejection, Transaction};
use deal_core::enums::Stage;
use deal_core::requests::StageTransitionRequest;
use serde_json::json;

use super::record_error;
use crate::context::SuiteContext;
use crate::fixtures;

pub const TRANSITION: &str = "Stage Transition with AI Validation - POST /transactions/:id/stage-transition";
pub const FORCED: &str = "Stage Transition - Forced Override";
pub const AI_VALIDATION: &str = "AI-Powered Stage Validation - blocked task";

/// Where the transition machine goes after a response.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// The stage moved; nothing left to do.
    Done,
    /// Validation blocked the move; retry once with `force: true`.
    RetryForced,
    /// Terminal failure with a reason.
    Failed(String),
}

/// Decide the next step from the outcome of one attempt.
///
/// `prior_history` is the stage-history length seen before the forced call;
/// a forced acceptance must not shrink it.
#[must_use]
pub fn next_step(forced: bool, outcome: &TransitionOutcome, prior_history: usize) -> NextStep {
    match (forced, outcome) {
        (false, TransitionOutcome::Accepted { .. }) => NextStep::Done,
        (false, TransitionOutcome::Rejected(_)) => NextStep::RetryForced,
        (true, TransitionOutcome::Accepted { transaction, .. }) => {
            let history = transaction.value.stage_history.len();
            if history >= prior_history {
                NextStep::Done
            } else {
                NextStep::Failed(format!(
                    "stage_history shrank from {prior_history} to {history} entries"
                ))
            }
        }
        (true, TransitionOutcome::Rejected(rejection)) => NextStep::Failed(format!(
            "forced transition was still rejected: {}",
            rejection.error.as_deref().unwrap_or("no reason given")
        )),
    }
}

/// Why a `422` body is or is not a usable rejection.
fn rejection_problem(rejection: &StageRejection) -> Option<&'static str> {
    if !rejection.has_explanation() {
        return Some("422 without validation_errors or missing_tasks");
    }
    if rejection.can_force.is_none() {
        return Some("422 without a can_force flag");
    }
    None
}

/// Why the cached stage cannot legally move to `target`, if it cannot.
///
/// An unknown cached stage is left for the server to judge.
fn illegal_move(current: Option<Stage>, target: Stage) -> Option<String> {
    let current = current?;
    (!current.can_transition_to(target))
        .then(|| format!("Fixture deal in {current} cannot move to {target}"))
}

fn rejection_details(rejection: &StageRejection) -> serde_json::Value {
    json!({
        "validation_errors": rejection.validation_errors.iter().take(2).collect::<Vec<_>>(),
        "missing_tasks": rejection.missing_tasks.len(),
        "can_force": rejection.can_force,
    })
}

/// Move the fixture deal to `target`, forcing past a validation block.
pub async fn transition_with_override(
    ctx: &mut SuiteContext,
    transaction_id: &str,
    target: Stage,
) -> Option<Transaction> {
    if let Some(problem) = illegal_move(ctx.fixture_stage(), target) {
        ctx.recorder.fail(TRANSITION, problem, None);
        return None;
    }
    let outcome = match ctx
        .client
        .transition_stage(transaction_id, StageTransitionRequest::validated(target))
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            record_error(ctx, TRANSITION, &err);
            return None;
        }
    };

    match next_step(false, &outcome, ctx.fixture_history_len()) {
        NextStep::Done => {
            let TransitionOutcome::Accepted {
                transaction,
                validation,
            } = outcome
            else {
                return None;
            };
            ctx.observe(&transaction.value);
            let validation = validation.unwrap_or_default();
            ctx.recorder.pass(
                TRANSITION,
                format!(
                    "Stage transition accepted. New stage: {}",
                    transaction.value.current_stage
                ),
                Some(json!({
                    "confidence": validation.confidence,
                    "valid": validation.valid,
                    "warnings": validation.warnings.len(),
                })),
            );
            Some(transaction.value)
        }
        NextStep::RetryForced => {
            if let TransitionOutcome::Rejected(rejection) = &outcome {
                match rejection_problem(rejection) {
                    None => ctx.recorder.pass(
                        TRANSITION,
                        format!(
                            "Validation blocked the transition. Errors: {}, Missing tasks: {}",
                            rejection.validation_errors.len(),
                            rejection.missing_tasks.len()
                        ),
                        Some(rejection_details(rejection)),
                    ),
                    Some(problem) => {
                        ctx.recorder
                            .fail(TRANSITION, problem, Some(rejection_details(rejection)));
                    }
                }
            }
            forced_transition(ctx, transaction_id, target).await
        }
        NextStep::Failed(reason) => {
            ctx.recorder.fail(TRANSITION, reason, None);
            None
        }
    }
}

/// The second branch: one forced attempt, terminal either way.
async fn forced_transition(
    ctx: &mut SuiteContext,
    transaction_id: &str,
    target: Stage,
) -> Option<Transaction> {
    let prior_history = ctx.fixture_history_len();
    let outcome = match ctx
        .client
        .transition_stage(transaction_id, StageTransitionRequest::forced(target))
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            record_error(ctx, FORCED, &err);
            return None;
        }
    };

    match (next_step(true, &outcome, prior_history), outcome) {
        (NextStep::Done, TransitionOutcome::Accepted { transaction, .. }) => {
            ctx.observe(&transaction.value);
            ctx.recorder.pass(
                FORCED,
                format!(
                    "Forced transition succeeded. New stage: {}",
                    transaction.value.current_stage
                ),
                Some(json!({"stage_history": transaction.value.stage_history.len()})),
            );
            Some(transaction.value)
        }
        (NextStep::Failed(reason), _) => {
            ctx.recorder.fail(FORCED, reason, None);
            None
        }
        (step, _) => {
            ctx.recorder
                .fail(FORCED, format!("unexpected transition step {step:?}"), None);
            None
        }
    }
}

/// Block one task, then try a non-forced transition. Either verdict passes,
/// but a `422` must explain itself and say whether it can be forced.
pub async fn ai_validation(ctx: &mut SuiteContext, transaction_id: &str, target: Stage) {
    if let Some(problem) = illegal_move(ctx.fixture_stage(), target) {
        ctx.recorder.fail(AI_VALIDATION, problem, None);
        return;
    }
    let items = match ctx.client.list_checklist(transaction_id, None).await {
        Ok(listed) => listed.value,
        Err(err) => {
            record_error(ctx, AI_VALIDATION, &err);
            return;
        }
    };
    let Some(first) = items.first() else {
        ctx.recorder
            .fail(AI_VALIDATION, "No checklist items found for validation testing", None);
        return;
    };

    if let Err(err) = ctx
        .client
        .update_checklist_item(&first.id, &fixtures::block_for_validation())
        .await
    {
        ctx.recorder.note(format!("could not block {}: {err}", first.id));
    }

    match ctx
        .client
        .transition_stage(transaction_id, StageTransitionRequest::validated(target))
        .await
    {
        Ok(TransitionOutcome::Rejected(rejection)) => {
            let details = Some(rejection_details(&rejection));
            match rejection_problem(&rejection) {
                None => ctx.recorder.pass(
                    AI_VALIDATION,
                    format!(
                        "Validation blocked the transition. Errors: {}, Missing: {}, Can force: {}",
                        rejection.validation_errors.len(),
                        rejection.missing_tasks.len(),
                        rejection.can_force.unwrap_or(false)
                    ),
                    details,
                ),
                Some(problem) => ctx.recorder.fail(AI_VALIDATION, problem, details),
            }
        }
        Ok(TransitionOutcome::Accepted {
            transaction,
            validation,
        }) => {
            ctx.observe(&transaction.value);
            let validation = validation.unwrap_or_default();
            let confidence = validation
                .confidence
                .map_or_else(|| "N/A".to_string(), |c| format!("{c}%"));
            ctx.recorder.pass(
                AI_VALIDATION,
                format!("Validation allowed the transition with confidence {confidence}"),
                Some(json!({
                    "valid": validation.valid,
                    "warnings": validation.warnings.len(),
                })),
            );
        }
        Err(err) => record_error(ctx, AI_VALIDATION, &err),
    }
}
