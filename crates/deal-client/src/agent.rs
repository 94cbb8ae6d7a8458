//! Natural-language agent commands.

use deal_core::requests::AgentCommandRequest;
use deal_core::responses::AgentCommandReply;

use crate::{CallTimeout, ContractError, CrmClient, Method};

impl CrmClient {
    /// `POST /agent/command`, on the AI timeout budget.
    ///
    /// The CRM answers `200` even when it cannot route the command, so a
    /// false `success` flag is reported as [`ContractError::NotSuccessful`].
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure, a non-`200` status,
    /// or a reply without `success: true` and an `action`.
    pub async fn run_agent_command(&self, command: &str) -> Result<AgentCommandReply, ContractError> {
        let request = AgentCommandRequest {
            command: command.to_string(),
        };
        Ok(self
            .send_json(Method::POST, "/agent/command", &request, CallTimeout::Ai)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .whole(&["success", "action"])?
            .value)
    }
}
