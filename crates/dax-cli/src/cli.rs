use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dax",
    about = "DAX registry: departments, data assets, access orders and attribute workflow",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger snapshot file, created on first SUBMIT
    #[arg(long, global = true, default_value = "dax-ledger.json")]
    pub state: PathBuf,

    /// Registry configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one contract function, e.g. `invoke CreateDepartment Department1 Eng role:admin`
    Invoke(InvokeArgs),
    /// Show committed notifications
    Events(EventsArgs),
    /// Show the committed key/value state
    Dump(DumpArgs),
    /// Show the effective registry configuration
    Config,
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct EventsArgs {
    /// Only events with this name
    #[arg(long)]
    pub name: Option<String>,
    /// Only events committed above this height
    #[arg(long)]
    pub after: Option<u64>,
}

#[derive(Args)]
pub struct DumpArgs {
    /// Only keys with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
}
