//! Valid action: print the merged pipeline document

use anyhow::{Context, Result};
use colored::*;
use tracing::info;

use paws_core::domain::pipeline::PipelineDocument;

/// Print `document` as indented JSON on stdout
pub fn print_document(document: &PipelineDocument) -> Result<()> {
    let json = render_document(document)?;
    println!("{}", json);

    let steps: usize = document.stages.iter().map(|s| s.steps.len()).sum();
    info!(
        "Configuration is valid: {} stage(s), {} step(s), {} deployment(s)",
        document.stages.len(),
        steps,
        document.deployments.len()
    );
    eprintln!("{}", "✓ Configuration is valid".green().bold());

    Ok(())
}

fn render_document(document: &PipelineDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to render configuration")
}
