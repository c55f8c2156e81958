//! Commands module
//!
//! Parses the action argument and dispatches to its handler.

mod run;
mod valid;

use run::{Collaborators, run_pipeline};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

use crate::archive::ZipPackager;
use crate::config::Config;
use crate::interface::SystemInterfaces;
use paws_client::NomadClient;
use paws_hcl::Loader;

/// Action named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Compile and register (or print, with `--dry-run`)
    Run,
    /// Load, merge includes and print the document
    Valid,
    /// Anything else; logged and ignored
    Unknown(String),
}

impl Action {
    pub fn parse(input: &str) -> Self {
        match input {
            "run" => Action::Run,
            "valid" => Action::Valid,
            other => Action::Unknown(other.to_string()),
        }
    }
}

/// Handle a CLI action
///
/// # Arguments
/// * `action` - The action to execute
/// * `pipeline` - Path to the pipeline file
/// * `selector` - Stage selector, required by `run`
/// * `config` - The CLI configuration
pub async fn handle_command(
    action: Action,
    pipeline: &Path,
    selector: Option<&str>,
    config: &Config,
) -> Result<()> {
    if let Action::Unknown(mode) = &action {
        warn!("Unknown mode: {}", mode);
        return Ok(());
    }

    let document = Loader::new(&config.work_dir)
        .load(pipeline)
        .with_context(|| format!("Failed to load configuration: {}", pipeline.display()))?;

    match action {
        Action::Valid => valid::print_document(&document),
        Action::Run => {
            let selector =
                selector.context("The run action needs a selector (group or group.subgroup)")?;

            if !config.dry_run {
                config.validate().context("Invalid Nomad configuration")?;
            }

            let client =
                NomadClient::new(config.nomad_addr.as_str()).with_token(config.nomad_token.clone());
            let collaborators = Collaborators {
                packager: &ZipPackager,
                interfaces: &SystemInterfaces,
                submitter: &client,
            };

            run_pipeline(&document, selector, config, &collaborators).await?;
            Ok(())
        }
        Action::Unknown(_) => Ok(()),
    }
}
