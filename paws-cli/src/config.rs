//! Configuration module
//!
//! Settings resolved from the command line and environment before any
//! pipeline is loaded.

use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Nomad HTTP address (e.g., "http://127.0.0.1:4646")
    pub nomad_addr: String,

    /// Nomad ACL token
    pub nomad_token: Option<String>,

    /// Print the job instead of registering it
    pub dry_run: bool,

    /// Directory packaged in local mode and used to resolve includes
    pub work_dir: PathBuf,
}

impl Config {
    /// Validates the scheduler address
    ///
    /// Only needed when a job is actually registered.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.nomad_addr.is_empty() {
            anyhow::bail!("nomad_addr cannot be empty");
        }

        if !self.nomad_addr.starts_with("http://") && !self.nomad_addr.starts_with("https://") {
            anyhow::bail!("nomad_addr must start with http:// or https://");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nomad_addr: paws_client::DEFAULT_ADDRESS.to_string(),
            nomad_token: None,
            dry_run: false,
            work_dir: PathBuf::from("."),
        }
    }
}
