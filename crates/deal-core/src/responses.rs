//! Small reply envelopes that carry no entity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `{success, message}` acknowledgement from delete/dismiss/generate endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Reply from `POST /agent/command`.
///
/// The CRM splices the command's result (a summary or an alert list) into the
/// same object; only the routing fields are modelled here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AgentCommandReply {
    #[serde(default)]
    pub success: bool,
    pub action: Option<String>,
    pub error: Option<String>,
}
