use clap::{Args, Subcommand, ValueEnum};
use deal_suites::Suite;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run conformance suites against the CRM.
    Run(RunArgs),
    /// Print the JSON Schema of an observed CRM entity.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Which suites to run
    #[arg(short, long, default_value = "all")]
    pub suite: SuiteArg,

    /// Exit non-zero when any scenario fails
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SuiteArg {
    All,
    Timeline,
    Alerts,
}

impl SuiteArg {
    #[must_use]
    pub fn suites(self) -> Vec<Suite> {
        match self {
            Self::All => Suite::ALL.to_vec(),
            Self::Timeline => vec![Suite::Timeline],
            Self::Alerts => vec![Suite::Alerts],
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity whose schema to print
    #[arg(value_enum)]
    pub entity: SchemaEntity,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaEntity {
    Transaction,
    ChecklistItem,
    Alert,
    ValidationResult,
    DealSummary,
}
