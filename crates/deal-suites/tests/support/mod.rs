//! In-process fake of the CRM API served by `tiny_http`.
//!
//! Keeps transactions, checklist items and alerts in memory and answers
//! with the same envelopes the real service uses. A [`Behavior`] switches
//! on one specific way of breaking the contract.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use deal_client::CrmClient;
use deal_config::{ApiConfig, PacingConfig};
use deal_core::entities::ChecklistItem;
use deal_suites::{RunSettings, WaitStrategy};
use serde_json::{Map, Value, json};

const DEFAULT_TITLES: [&str; 8] = [
    "Property Condition Assessment",
    "Comparative Market Analysis (CMA)",
    "Pricing Strategy Development",
    "Listing Agreement Execution",
    "Property Photography",
    "Marketing Materials Preparation",
    "Seller Disclosure Forms",
    "Pre-Listing Inspection",
];

/// How the fake deviates from a conforming CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Accepts every transition and stores every write.
    Conforming,
    /// Blocks unforced transitions with a forceable 422.
    BlocksTransitions,
    /// Blocks unforced transitions with a 422 that omits `can_force`.
    OmitsCanForce,
    /// Blocks every transition, forced or not.
    RejectsForced,
    /// Echoes PUT bodies back without storing them.
    ForgetsUpdates,
    /// Acknowledges DELETE but keeps the item.
    IgnoresDeletes,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    transactions: BTreeMap<String, Map<String, Value>>,
    items: BTreeMap<String, Map<String, Value>>,
    alerts: Vec<Value>,
}

impl State {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn items_of(&self, transaction_id: &str) -> Vec<Value> {
        self.items
            .values()
            .filter(|item| item.get("transaction_id") == Some(&json!(transaction_id)))
            .map(|item| Value::Object(item.clone()))
            .collect()
    }

    fn overdue_of(&self, transaction_id: &str) -> Vec<Value> {
        let now = Utc::now();
        self.items_of(transaction_id)
            .into_iter()
            .filter(|raw| {
                serde_json::from_value::<ChecklistItem>(raw.clone())
                    .is_ok_and(|item| item.is_overdue_at(now))
            })
            .collect()
    }
}

pub struct FakeCrm {
    pub config: ApiConfig,
    transitions: Arc<AtomicUsize>,
}

impl FakeCrm {
    pub fn start(behavior: Behavior) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().map(|a| a.port()).unwrap();
        let transitions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&transitions);
        std::thread::spawn(move || {
            let mut state = State::default();
            for mut request in server.incoming_requests() {
                let mut raw = String::new();
                request.as_reader().read_to_string(&mut raw).unwrap();
                let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
                if request.url().ends_with("/stage-transition") {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                let (status, reply) = route(
                    &mut state,
                    behavior,
                    &request.method().to_string(),
                    request.url(),
                    &body,
                );
                let response = tiny_http::Response::from_string(reply.to_string())
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap(),
                    );
                let _ = request.respond(response);
            }
        });
        Self {
            config: ApiConfig {
                base_url: format!("http://127.0.0.1:{port}/api"),
                ..ApiConfig::default()
            },
            transitions,
        }
    }

    pub fn client(&self) -> CrmClient {
        CrmClient::new(&self.config).unwrap()
    }

    /// Stage-transition requests received so far.
    pub fn transition_calls(&self) -> usize {
        self.transitions.load(Ordering::SeqCst)
    }
}

/// Settings with no pauses so suites run at full speed.
pub fn fast_settings() -> RunSettings {
    RunSettings {
        pacing: PacingConfig {
            update_pause_ms: 0,
            alert_settle_ms: 0,
        },
        wait: WaitStrategy::Fixed(Duration::ZERO),
        echo: false,
    }
}

fn not_found(what: &str) -> (u16, Value) {
    (404, json!({"success": false, "error": format!("{what} not found")}))
}

/// Apply a PUT body to `stored` and return the entity to echo.
fn update(stored: &mut Map<String, Value>, body: &Value, behavior: Behavior) -> Map<String, Value> {
    if behavior == Behavior::ForgetsUpdates {
        let mut echoed = stored.clone();
        merge(&mut echoed, body);
        return echoed;
    }
    merge(stored, body);
    stored.clone()
}

fn merge(target: &mut Map<String, Value>, body: &Value) {
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    target.insert("updated_at".into(), json!(Utc::now().to_rfc3339()));
}

fn route(state: &mut State, behavior: Behavior, method: &str, url: &str, body: &Value) -> (u16, Value) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let query: BTreeMap<&str, String> = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k, v.replace("%20", " ")))
        .collect();
    let segments: Vec<&str> = path.trim_start_matches("/api/").split('/').collect();

    match (method, segments.as_slice()) {
        ("GET", ["transactions"]) => {
            let all: Vec<Value> = state.transactions.values().cloned().map(Value::Object).collect();
            (200, json!({"success": true, "transactions": all}))
        }
        ("POST", ["transactions"]) => create_transaction(state, body),
        ("GET", ["transactions", id]) => match state.transactions.get(*id) {
            Some(tx) => (200, json!({"success": true, "transaction": tx})),
            None => not_found("Transaction"),
        },
        ("PUT", ["transactions", id]) => match state.transactions.get_mut(*id) {
            Some(tx) => (200, json!({"success": true, "transaction": update(tx, body, behavior)})),
            None => not_found("Transaction"),
        },
        ("POST", ["transactions", id, "stage-transition"]) => transition(state, behavior, id, body),
        ("GET", ["transactions", id, "checklist"]) => {
            let items: Vec<Value> = state
                .items_of(id)
                .into_iter()
                .filter(|item| query.get("stage").is_none_or(|stage| item["stage"] == json!(stage)))
                .collect();
            (200, json!({"success": true, "checklist_items": items}))
        }
        ("POST", ["transactions", id, "checklist"]) => {
            if !state.transactions.contains_key(*id) {
                return not_found("Transaction");
            }
            let item = insert_item(state, id, body.clone());
            (201, json!({"success": true, "checklist_item": item}))
        }
        ("PUT", ["checklist", id]) => match state.items.get_mut(*id) {
            Some(item) => (200, json!({"success": true, "checklist_item": update(item, body, behavior)})),
            None => not_found("Checklist item"),
        },
        ("DELETE", ["checklist", id]) => {
            let found = if behavior == Behavior::IgnoresDeletes {
                state.items.contains_key(*id)
            } else {
                state.items.remove(*id).is_some()
            };
            if found {
                (200, json!({"success": true, "message": "Checklist item deleted"}))
            } else {
                not_found("Checklist item")
            }
        }
        ("POST", ["agent", "command"]) => {
            let command = body["command"].as_str().unwrap_or_default().to_lowercase();
            let action = if command.contains("alert") {
                "smart_alerts"
            } else {
                "deal_summary"
            };
            (200, json!({"success": true, "action": action}))
        }
        ("GET", ["deals", "summary", id]) => deal_summary(state, id),
        ("GET", ["alerts", "smart"]) => {
            let alerts: Vec<&Value> = state
                .alerts
                .iter()
                .filter(|a| query.get("priority").is_none_or(|p| a["priority"] == json!(p)))
                .filter(|a| query.get("type").is_none_or(|t| a["alert_type"] == json!(t)))
                .filter(|a| query.get("agent").is_none_or(|g| a["assigned_agent"] == json!(g)))
                .collect();
            (200, json!({"success": true, "alerts": alerts, "total": alerts.len()}))
        }
        ("POST", ["alerts", "generate"]) => {
            generate_alerts(state);
            (200, json!({"success": true, "message": "Alerts generated"}))
        }
        ("POST", ["alerts", "dismiss", id]) => {
            let before = state.alerts.len();
            state.alerts.retain(|a| a["id"] != json!(id));
            if state.alerts.len() < before {
                (200, json!({"success": true, "message": "Alert dismissed"}))
            } else {
                not_found("Alert")
            }
        }
        _ => (404, json!({"success": false, "error": format!("no route for {method} {path}")})),
    }
}

fn create_transaction(state: &mut State, body: &Value) -> (u16, Value) {
    let Some(fields) = body.as_object() else {
        return (400, json!({"success": false, "error": "expected a JSON object"}));
    };
    let id = state.id("tx");
    let now = Utc::now().to_rfc3339();
    let mut tx = fields.clone();
    tx.insert("id".into(), json!(id));
    tx.insert("current_stage".into(), json!("pre_listing"));
    tx.insert("created_at".into(), json!(now));
    tx.insert(
        "stage_history".into(),
        json!([{"stage": "pre_listing", "entered_at": now, "status": "active"}]),
    );
    state.transactions.insert(id.clone(), tx.clone());

    for (order, title) in DEFAULT_TITLES.iter().enumerate() {
        insert_item(
            state,
            &id,
            json!({
                "title": title,
                "description": null,
                "stage": "pre_listing",
                "priority": if order < 4 { "high" } else { "medium" },
                "due_date": null,
                "order": order + 1,
            }),
        );
    }
    (201, json!({"success": true, "transaction": tx}))
}

fn insert_item(state: &mut State, transaction_id: &str, body: Value) -> Value {
    let id = state.id("item");
    let mut item = body.as_object().cloned().unwrap_or_default();
    item.insert("id".into(), json!(id));
    item.insert("transaction_id".into(), json!(transaction_id));
    item.entry("status").or_insert_with(|| json!("not_started"));
    item.entry("description").or_insert(Value::Null);
    item.entry("due_date").or_insert(Value::Null);
    state.items.insert(id, item.clone());
    Value::Object(item)
}

fn transition(state: &mut State, behavior: Behavior, id: &str, body: &Value) -> (u16, Value) {
    let open: Vec<Value> = state
        .items_of(id)
        .into_iter()
        .filter(|item| item["status"] != json!("completed"))
        .map(|item| json!({"id": item["id"], "title": item["title"], "priority": item["priority"], "status": item["status"]}))
        .collect();
    let Some(tx) = state.transactions.get_mut(id) else {
        return not_found("Transaction");
    };
    let forced = body["force"].as_bool().unwrap_or(false);
    let blocked = match behavior {
        Behavior::BlocksTransitions | Behavior::OmitsCanForce => !forced,
        Behavior::RejectsForced => true,
        _ => false,
    };
    if blocked {
        let mut reply = json!({
            "success": false,
            "error": "Stage transition validation failed",
            "validation_errors": [format!("{} incomplete tasks", open.len())],
            "missing_tasks": open,
        });
        if behavior != Behavior::OmitsCanForce {
            reply["can_force"] = json!(true);
        }
        return (422, reply);
    }

    let target = body["target_stage"].clone();
    let from = tx["current_stage"].clone();
    let validation_result = json!({
        "valid": !forced,
        "confidence": 85,
        "warnings": [],
    });
    if let Some(history) = tx.get_mut("stage_history").and_then(Value::as_array_mut) {
        history.push(json!({
            "stage": target,
            "entered_at": Utc::now().to_rfc3339(),
            "status": "active",
            "transitioned_from": from,
            "validation_result": validation_result,
        }));
    }
    tx.insert("current_stage".into(), target);
    (
        200,
        json!({"success": true, "transaction": tx, "validation_result": validation_result}),
    )
}

fn deal_summary(state: &State, id: &str) -> (u16, Value) {
    let Some(tx) = state.transactions.get(id) else {
        return not_found("Transaction");
    };
    let items = state.items_of(id);
    let overdue = state.overdue_of(id);
    let completed = items.iter().filter(|i| i["status"] == json!("completed")).count();
    (
        200,
        json!({
            "success": true,
            "transaction": tx,
            "checklist_summary": {
                "total_tasks": items.len(),
                "completed_tasks": completed,
                "overdue_tasks": overdue.len(),
            },
            "overdue_tasks": overdue,
            "ai_analysis": {
                "summary": "Deal is progressing with one overdue task",
                "current_status": "pre_listing",
                "critical_actions": ["Complete the property assessment"],
            },
            "generated_at": Utc::now().to_rfc3339(),
        }),
    )
}

fn generate_alerts(state: &mut State) {
    let ids: Vec<String> = state.transactions.keys().cloned().collect();
    let mut alerts = Vec::new();
    for id in ids {
        let overdue = state.overdue_of(&id).len();
        let tx = &state.transactions[&id];
        let agent = tx.get("assigned_agent").cloned().unwrap_or(Value::Null);
        if overdue > 0 {
            alerts.push(json!({
                "alert_type": "overdue_tasks",
                "priority": "urgent",
                "title": "Overdue Tasks",
                "message": format!("{overdue} overdue tasks"),
                "transaction_id": id,
                "assigned_agent": agent,
                "details": {"overdue_count": overdue},
            }));
        }
        if tx.get("closing_date").is_some_and(|d| !d.is_null()) {
            alerts.push(json!({
                "alert_type": "approaching_closing",
                "priority": "high",
                "title": "Closing Approaching",
                "message": "Closing date is near",
                "transaction_id": id,
                "assigned_agent": agent,
                "details": null,
            }));
        }
    }
    let now = Utc::now().to_rfc3339();
    for alert in &mut alerts {
        alert["id"] = json!(state.id("alert"));
        alert["created_at"] = json!(now);
    }
    state.alerts = alerts;
}
