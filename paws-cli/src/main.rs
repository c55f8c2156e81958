//! Paws CLI
//!
//! Compiles a pipeline file into a Nomad batch job and registers it.
//!
//! ```text
//! paws <config> run <group[.subgroup]> [--dry-run]
//! paws <config> valid
//! ```

mod archive;
mod commands;
mod config;
mod interface;
mod logging;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use commands::{Action, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "paws")]
#[command(about = "Compile pipeline stages into Nomad batch jobs", long_about = None)]
struct Cli {
    /// Path to the pipeline file
    config: PathBuf,

    /// Action to perform: run or valid
    action: String,

    /// Stages to run, `group` or `group.subgroup`
    selector: Option<String>,

    /// Print the compiled job instead of registering it
    #[arg(long)]
    dry_run: bool,

    /// Nomad HTTP address
    #[arg(long, env = "NOMAD_ADDR", default_value = paws_client::DEFAULT_ADDRESS)]
    nomad_addr: String,

    /// Nomad ACL token
    #[arg(long, env = "NOMAD_TOKEN", hide_env_values = true)]
    nomad_token: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    let config = Config {
        nomad_addr: cli.nomad_addr,
        nomad_token: cli.nomad_token,
        dry_run: cli.dry_run,
        work_dir: std::env::current_dir()?,
    };

    let action = Action::parse(&cli.action);
    handle_command(action, &cli.config, cli.selector.as_deref(), &config).await
}
