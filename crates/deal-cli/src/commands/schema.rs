use deal_core::entities::{Alert, ChecklistItem, DealSummary, Transaction, ValidationResult};
use schemars::schema_for;

use crate::cli::{GlobalFlags, SchemaArgs, SchemaEntity};

/// Handle `dealprobe schema`.
pub fn handle(args: &SchemaArgs, _flags: &GlobalFlags) -> anyhow::Result<()> {
    println!("{}", render(args.entity)?);
    Ok(())
}

fn render(entity: SchemaEntity) -> anyhow::Result<String> {
    let schema = match entity {
        SchemaEntity::Transaction => schema_for!(Transaction),
        SchemaEntity::ChecklistItem => schema_for!(ChecklistItem),
        SchemaEntity::Alert => schema_for!(Alert),
        SchemaEntity::ValidationResult => schema_for!(ValidationResult),
        SchemaEntity::DealSummary => schema_for!(DealSummary),
    };
    Ok(serde_json::to_string_pretty(&schema)?)
}
