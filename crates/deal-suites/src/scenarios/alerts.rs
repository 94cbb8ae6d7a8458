//! Smart alert scenarios: listing, generation, detection heuristics, management.

use std::collections::BTreeSet;

use deal_client::{ContractError, CrmClient, Observed};
use deal_core::entities::Alert;
use deal_core::requests::AlertFilter;
use serde_json::json;

use super::record_error;
use crate::context::SuiteContext;
use crate::fixtures::alert_filters;
use crate::wait::WaitStrategy;

pub const SMART_ALERTS: &str = "Smart Alerts System - GET /alerts/smart, POST /alerts/generate";
pub const DETECTION: &str = "Alert Logic & Detection - Business rules and priority assignment";
pub const MANAGEMENT: &str = "Alert Management - POST /alerts/dismiss/:id and filtering";

/// Filters that must answer successfully out of the three tried.
const REQUIRED_FILTERS: usize = 2;
/// Detection signals that must hold out of three.
const REQUIRED_SIGNALS: usize = 2;

/// Heuristic evidence that the opaque alert generator is doing real work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionSignals {
    pub multiple_priorities: bool,
    pub recognized_type: bool,
    pub has_details: bool,
}

impl DetectionSignals {
    #[must_use]
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let priorities: BTreeSet<_> = alerts.iter().map(|a| a.priority).collect();
        Self {
            multiple_priorities: priorities.len() > 1,
            recognized_type: alerts.iter().any(|a| a.alert_type.is_recognized()),
            has_details: alerts.iter().any(Alert::has_details),
        }
    }

    #[must_use]
    pub fn score(self) -> usize {
        [self.multiple_priorities, self.recognized_type, self.has_details]
            .into_iter()
            .filter(|signal| *signal)
            .count()
    }
}

async fn fetch_alerts(client: &CrmClient) -> Result<Observed<Vec<Alert>>, ContractError> {
    client.list_alerts(&AlertFilter::default()).await
}

/// Read the alert list until it is non-empty or the wait strategy gives up.
async fn settled_alerts(client: &CrmClient, wait: WaitStrategy) -> Option<Vec<Alert>> {
    wait.until(
        move || async move { fetch_alerts(client).await.ok().map(|listed| listed.value) },
        |alerts: &Vec<Alert>| !alerts.is_empty(),
    )
    .await
}

fn type_names(alerts: &[Alert]) -> BTreeSet<&'static str> {
    alerts.iter().map(|a| a.alert_type.as_str()).collect()
}

/// List alerts, trigger generation, and re-read once the generator settles.
pub async fn smart_alerts(ctx: &mut SuiteContext) -> bool {
    let listed = match fetch_alerts(&ctx.client).await {
        Ok(listed) => {
            ctx.recorder
                .note(format!("✅ GET /alerts/smart: {} alerts", listed.value.len()));
            if let Some(first) = listed.value.first() {
                ctx.recorder.note(format!(
                    "✅ Alert structure complete: {} - {}",
                    first.alert_type, first.priority
                ));
            }
            true
        }
        Err(err) => {
            ctx.recorder.note(format!("❌ GET alerts failed: {err}"));
            false
        }
    };

    let generated = match ctx.client.generate_alerts().await {
        Ok(_) => {
            ctx.recorder.note("✅ POST /alerts/generate: generation triggered");
            if let Some(alerts) = settled_alerts(&ctx.client, ctx.wait).await {
                ctx.recorder.note(format!(
                    "✅ {} alerts after generation: {:?}",
                    alerts.len(),
                    type_names(&alerts)
                ));
            }
            true
        }
        Err(err) => {
            ctx.recorder.note(format!("❌ Generate alerts failed: {err}"));
            false
        }
    };

    let mark = |ok: bool| if ok { "✓" } else { "✗" };
    let success = listed && generated;
    ctx.recorder.record(
        SMART_ALERTS,
        success,
        format!("GET: {}, Generate: {}", mark(listed), mark(generated)),
        None,
    );
    success
}

/// Generate, wait, then score the alert list on the detection signals.
pub async fn alert_detection(ctx: &mut SuiteContext) -> bool {
    if let Err(err) = ctx.client.generate_alerts().await {
        ctx.recorder.note(format!("generation before detection failed: {err}"));
    }

    let Some(alerts) = settled_alerts(&ctx.client, ctx.wait).await else {
        // Every read failed; surface the underlying error from one more read.
        match fetch_alerts(&ctx.client).await {
            Err(err) => record_error(ctx, DETECTION, &err),
            Ok(_) => ctx.recorder.fail(DETECTION, "Alert list was unavailable while waiting", None),
        }
        return false;
    };

    let signals = DetectionSignals::from_alerts(&alerts);
    let priorities: BTreeSet<&str> = alerts.iter().map(|a| a.priority.as_str()).collect();
    let mark = |ok: bool| if ok { "✓" } else { "✗" };
    let success = signals.score() >= REQUIRED_SIGNALS;
    ctx.recorder.record(
        DETECTION,
        success,
        format!(
            "Types: {:?}, Priorities: {priorities:?}",
            type_names(&alerts)
        ),
        Some(json!(format!(
            "Recognized type: {}, Priority levels: {}, Details: {}",
            mark(signals.recognized_type),
            mark(signals.multiple_priorities),
            mark(signals.has_details)
        ))),
    );
    success
}

/// Dismiss the newest alert (if any) and exercise each list filter.
pub async fn alert_management(ctx: &mut SuiteContext) -> bool {
    let alerts = match fetch_alerts(&ctx.client).await {
        Ok(listed) => listed.value,
        Err(err) => {
            record_error(ctx, MANAGEMENT, &err);
            return false;
        }
    };

    let dismissed = match alerts.first() {
        Some(alert) => match ctx.client.dismiss_alert(&alert.id).await {
            Ok(_) => {
                ctx.recorder
                    .note(format!("✅ Alert dismissed: {}", alert.id));
                true
            }
            Err(err) => {
                ctx.recorder.note(format!("❌ Dismiss failed: {err}"));
                false
            }
        },
        None => {
            ctx.recorder.note("ℹ️ No alerts available to dismiss");
            true
        }
    };

    let mut working_filters = 0;
    for (label, filter) in alert_filters() {
        match ctx.client.list_alerts(&filter).await {
            Ok(listed) => {
                working_filters += 1;
                ctx.recorder
                    .note(format!("✅ {label}: {} results", listed.value.len()));
            }
            Err(err) => ctx.recorder.note(format!("❌ {label} failed: {err}")),
        }
    }
    let filtered = working_filters >= REQUIRED_FILTERS;

    let mark = |ok: bool| if ok { "✓" } else { "✗" };
    let success = dismissed && filtered;
    ctx.recorder.record(
        MANAGEMENT,
        success,
        format!(
            "Dismiss: {}, Filtering: {} ({working_filters}/3 filters)",
            mark(dismissed),
            mark(filtered)
        ),
        None,
    );
    success
}
