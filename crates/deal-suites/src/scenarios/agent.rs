//! Natural-language agent command scenario.

use serde_json::json;

use crate::context::SuiteContext;
use crate::fixtures::AGENT_COMMANDS;

pub const AGENT_COMMAND: &str = "Agent Command Processing - POST /agent/command";

/// Commands that must route successfully out of [`AGENT_COMMANDS`].
const REQUIRED_SUCCESSES: usize = 3;

pub async fn agent_commands(ctx: &mut SuiteContext) -> bool {
    let mut actions = Vec::new();
    for (index, command) in AGENT_COMMANDS.iter().enumerate() {
        let n = index + 1;
        match ctx.client.run_agent_command(command).await {
            Ok(reply) => {
                let action = reply.action.unwrap_or_else(|| "N/A".into());
                ctx.recorder
                    .note(format!("✅ Command {n}: '{command}' → Action: {action}"));
                actions.push(action);
            }
            Err(err) => ctx.recorder.note(format!("❌ Command {n} failed: {err}")),
        }
    }

    let succeeded = actions.len();
    let success = succeeded >= REQUIRED_SUCCESSES;
    ctx.recorder.record(
        AGENT_COMMAND,
        success,
        format!(
            "{succeeded}/{} commands routed successfully",
            AGENT_COMMANDS.len()
        ),
        Some(json!({"actions": actions})),
    );
    success
}
