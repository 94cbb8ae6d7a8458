//! Transaction timeline + checklist suite.
//!
//! Order matters: later scenarios consume the deal and item ids earlier
//! ones obtained, and are skipped only when that id never materialized.

use deal_core::enums::Stage;

use crate::context::SuiteContext;
use crate::scenarios::{checklist, stages, transactions};

/// The stage after the fixture's cached one. A deal already in the last
/// stage targets itself, which the transition scenarios reject.
fn next_target(ctx: &SuiteContext) -> Stage {
    let current = ctx.fixture_stage().unwrap_or(Stage::PreListing);
    current.next().unwrap_or(current)
}

pub async fn run(ctx: &mut SuiteContext) {
    ctx.recorder.section("📋 TRANSACTION CRUD");
    transactions::list_transactions(ctx).await;
    let Some(transaction) = transactions::create_transaction(ctx).await else {
        return;
    };
    let transaction_id = transaction.id;
    transactions::fetch_transaction(ctx, &transaction_id).await;
    transactions::update_transaction(ctx, &transaction_id).await;

    ctx.recorder.section("✅ CHECKLIST MANAGEMENT");
    let items = checklist::list_checklist(ctx, &transaction_id).await;
    if let Some(custom) = checklist::create_custom_item(ctx, &transaction_id).await {
        checklist::update_custom_item(ctx, &transaction_id, &custom.id).await;
        checklist::delete_item(ctx, &transaction_id, &custom.id).await;
    }

    ctx.recorder.section("🏗️ DEFAULT CHECKLIST CREATION");
    checklist::default_checklist(ctx, &transaction_id).await;

    ctx.recorder.section("🎯 STAGE-SPECIFIC FUNCTIONALITY");
    checklist::stage_specific(ctx, &transaction_id).await;

    ctx.recorder.section("⚡ ADVANCED FEATURES");
    checklist::status_and_priority_cycle(ctx, &items).await;
    checklist::due_date_and_assignee(ctx, &transaction_id).await;

    ctx.recorder.section("🤖 AI-ASSISTED STAGE VALIDATION");
    let target = next_target(ctx);
    stages::ai_validation(ctx, &transaction_id, target).await;

    ctx.recorder.section("🔄 STAGE TRANSITION");
    // Validation may already have moved the deal.
    let target = next_target(ctx);
    stages::transition_with_override(ctx, &transaction_id, target).await;
}
