//! Deal summary + smart alerts suite.

use chrono::Utc;

use crate::context::SuiteContext;
use crate::fixtures;
use crate::scenarios::{agent, alerts, deals, record_error};

pub const SETUP: &str = "Suite Setup - fixture deal with overdue task";

/// Create the fixture deal plus one overdue urgent task.
///
/// Only the deal is required; a missing overdue task is noted and the
/// suite continues, since the deal-summary check will report it.
async fn setup(ctx: &mut SuiteContext) -> Option<String> {
    let now = Utc::now();
    let transaction = match ctx
        .client
        .create_transaction(&fixtures::alerts_transaction(now))
        .await
    {
        Ok(created) => created.value,
        Err(err) => {
            record_error(ctx, SETUP, &err);
            return None;
        }
    };
    ctx.track_transaction(&transaction);
    ctx.recorder
        .note(format!("✅ Test transaction created: {}", transaction.id));

    match ctx
        .client
        .create_checklist_item(&transaction.id, &fixtures::overdue_item(now))
        .await
    {
        Ok(item) => {
            ctx.track_checklist_item(&item.value);
            ctx.recorder
                .note("✅ Overdue checklist item created for alert testing");
        }
        Err(err) => ctx
            .recorder
            .note(format!("⚠️ Overdue checklist item not created: {err}")),
    }
    Some(transaction.id)
}

pub async fn run(ctx: &mut SuiteContext) {
    ctx.recorder.section("📋 SETUP");
    let Some(transaction_id) = setup(ctx).await else {
        ctx.recorder.note("❌ Failed to set up test data. Aborting suite.");
        return;
    };

    ctx.recorder.section("🔍 AGENT COMMAND PROCESSING");
    agent::agent_commands(ctx).await;

    ctx.recorder.section("📊 DEAL SUMMARY GENERATION");
    deals::deal_summary(ctx, Some(transaction_id.as_str())).await;

    ctx.recorder.section("🚨 SMART ALERTS SYSTEM");
    alerts::smart_alerts(ctx).await;

    ctx.recorder.section("⚡ ALERT LOGIC & DETECTION");
    alerts::alert_detection(ctx).await;

    ctx.recorder.section("🔧 ALERT MANAGEMENT");
    alerts::alert_management(ctx).await;
}
