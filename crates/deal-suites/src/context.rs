//! Per-suite state threaded through the scenario runners.

use std::time::Duration;

use deal_client::CrmClient;
use deal_config::{DealProbeConfig, PacingConfig};
use deal_core::entities::{ChecklistItem, ChecklistItemRef, Transaction, TransactionRef};
use deal_core::enums::Stage;
use serde::Serialize;

use crate::recorder::Recorder;
use crate::wait::WaitStrategy;

/// Knobs shared by every suite in a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub pacing: PacingConfig,
    pub wait: WaitStrategy,
    /// Print PASS/FAIL lines and banners to stdout.
    pub echo: bool,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &DealProbeConfig, echo: bool) -> Self {
        Self {
            wait: WaitStrategy::from_config(&config.wait, config.pacing.alert_settle()),
            pacing: config.pacing.clone(),
            echo,
        }
    }
}

/// Ledger of the entities the CRM created during a suite, in creation order.
///
/// The harness never invents ids; every entry here came from a server reply.
/// Checklist entries carry the last status the server reported. The ledger
/// ends up on the suite report so leftovers can be found on a shared CRM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatedIds {
    pub transactions: Vec<String>,
    pub checklist_items: Vec<ChecklistItemRef>,
}

impl CreatedIds {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.checklist_items.is_empty()
    }
}

/// Everything a scenario runner needs.
#[derive(Debug)]
pub struct SuiteContext {
    pub client: CrmClient,
    pub recorder: Recorder,
    pub wait: WaitStrategy,
    pub created: CreatedIds,
    /// Last observed state of the suite's fixture deal.
    pub fixture: Option<TransactionRef>,
    update_pause: Duration,
}

impl SuiteContext {
    #[must_use]
    pub fn new(client: CrmClient, settings: &RunSettings) -> Self {
        Self {
            client,
            recorder: Recorder::new(settings.echo),
            wait: settings.wait,
            created: CreatedIds::default(),
            fixture: None,
            update_pause: settings.pacing.update_pause(),
        }
    }

    /// Pause between rapid-fire updates to the same entity.
    pub async fn pace(&self) {
        tokio::time::sleep(self.update_pause).await;
    }

    /// Remember a freshly created deal as the suite fixture.
    pub fn track_transaction(&mut self, transaction: &Transaction) {
        self.created.transactions.push(transaction.id.clone());
        self.fixture = Some(transaction.to_ref());
    }

    /// Fold a newer server copy of the fixture deal into the cached ref.
    pub fn observe(&mut self, transaction: &Transaction) {
        if let Some(fixture) = self.fixture.as_mut() {
            fixture.observe(transaction);
        }
    }

    pub fn track_checklist_item(&mut self, item: &ChecklistItem) {
        self.created.checklist_items.push(item.to_ref());
    }

    /// Refresh the ledger entry of an item created earlier in the suite.
    pub fn observe_checklist_item(&mut self, item: &ChecklistItem) {
        if let Some(tracked) = self.created.checklist_items.iter_mut().find(|t| t.id == item.id) {
            *tracked = item.to_ref();
        }
    }

    /// Stage-history length last seen on the fixture, or 0.
    #[must_use]
    pub fn fixture_history_len(&self) -> usize {
        self.fixture.as_ref().map_or(0, |f| f.history_len)
    }

    /// Stage last seen on the fixture deal.
    #[must_use]
    pub fn fixture_stage(&self) -> Option<Stage> {
        self.fixture.as_ref().map(|f| f.current_stage)
    }
}

#[cfg(test)]
mod tests {
    use deal_config::ApiConfig;
    use deal_core::enums::ChecklistStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn item(id: &str, status: &str) -> ChecklistItem {
        serde_json::from_value(json!({
            "id": id,
            "title": "Custom Test Task",
            "stage": "pre_listing",
            "status": status,
            "priority": "high"
        }))
        .unwrap()
    }

    #[test]
    fn ledger_follows_server_reported_status() {
        let client = CrmClient::new(&ApiConfig::default()).unwrap();
        let settings = RunSettings {
            pacing: PacingConfig::default(),
            wait: WaitStrategy::Fixed(Duration::ZERO),
            echo: false,
        };
        let mut ctx = SuiteContext::new(client, &settings);
        assert!(ctx.created.is_empty());

        ctx.track_checklist_item(&item("item-9", "not_started"));
        ctx.observe_checklist_item(&item("item-9", "in_progress"));
        ctx.observe_checklist_item(&item("item-10", "completed"));

        assert_eq!(ctx.created.checklist_items.len(), 1);
        assert_eq!(ctx.created.checklist_items[0].status, ChecklistStatus::InProgress);
        assert_eq!(
            serde_json::to_value(&ctx.created).unwrap(),
            json!({
                "transactions": [],
                "checklist_items": [{"id": "item-9", "stage": "pre_listing", "status": "in_progress"}],
            })
        );
    }
}
