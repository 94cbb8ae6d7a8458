use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, RunArgs, SchemaArgs, SchemaEntity, SuiteArg};

/// Top-level CLI parser for the `dealprobe` binary.
#[derive(Debug, Parser)]
#[command(name = "dealprobe", version, about = "Conformance harness for the CRM transaction API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in the log)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// CRM API base URL, overriding config and DEALPROBE_API__BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            base_url: self.base_url.clone(),
        }
    }
}
