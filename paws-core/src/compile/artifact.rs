//! Artifact strategy
//!
//! Decides where tasks fetch their payload from. With `localpath` set in
//! settings, the working directory is zipped into `<localpath>/artifact.zip`
//! and served from `localweb` with `{IP}` replaced by the address of
//! `localinterface`. Otherwise tasks get no artifact and run their commands
//! directly.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use tracing::{info, warn};

use super::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::job::TaskArtifact;
use crate::domain::pipeline::{Settings, Step};

/// File name of the packaged working directory
pub const ARTIFACT_FILE_NAME: &str = "artifact.zip";

/// Placeholder in `localweb` replaced by the serving address
pub const IP_PLACEHOLDER: &str = "{IP}";

/// Packages a directory into a zip archive
pub trait Packager {
    /// Archive `source` into `target`
    ///
    /// With `nest_under_base`, every entry is placed under a directory named
    /// after the last component of `source`.
    fn package(&self, source: &Path, target: &Path, nest_under_base: bool) -> std::io::Result<()>;
}

/// Source of network interface addresses
pub trait InterfaceResolver {
    /// All addresses bound to `interface`; empty if it does not exist
    fn addresses(&self, interface: &str) -> Vec<IpAddr>;
}

/// First non-loopback IPv4 address in `addresses`
pub fn first_ipv4(addresses: &[IpAddr]) -> Option<Ipv4Addr> {
    addresses.iter().find_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(*v4),
        _ => None,
    })
}

/// URL tasks fetch the local artifact from
pub fn serving_endpoint(local_web: &str, ip: &str) -> String {
    format!(
        "{}/{}",
        local_web.replacen(IP_PLACEHOLDER, ip, 1),
        ARTIFACT_FILE_NAME
    )
}

/// Payload source chosen for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactMode {
    /// Tasks run their commands as-is, nothing is fetched
    Remote,
    /// Tasks fetch the packaged working directory
    Local(LocalArtifact),
}

impl ArtifactMode {
    pub fn is_local(&self) -> bool {
        matches!(self, ArtifactMode::Local(_))
    }
}

/// Where the local artifact is served and unpacked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    pub source: String,
    pub default_destination: String,
}

impl LocalArtifact {
    /// Fetch descriptor for `step`, honouring its destination override
    pub fn descriptor(&self, step: &Step) -> TaskArtifact {
        let destination = step
            .path_to
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or(&self.default_destination);

        TaskArtifact {
            getter_source: self.source.clone(),
            relative_dest: destination.to_string(),
        }
    }
}

/// Chooses and prepares the artifact mode
pub struct ArtifactStrategy<'a> {
    packager: &'a dyn Packager,
    interfaces: &'a dyn InterfaceResolver,
}

impl<'a> ArtifactStrategy<'a> {
    pub fn new(packager: &'a dyn Packager, interfaces: &'a dyn InterfaceResolver) -> Self {
        Self {
            packager,
            interfaces,
        }
    }

    /// Decide the mode for this run, packaging `work_dir` when local
    ///
    /// Packaging failures and missing interface addresses are recorded in
    /// `diagnostics`; local mode stays active either way.
    pub fn prepare(
        &self,
        settings: &Settings,
        work_dir: &Path,
        diagnostics: &mut Diagnostics,
    ) -> ArtifactMode {
        let Some(local_path) = settings.local_path.as_deref().filter(|p| !p.is_empty()) else {
            return ArtifactMode::Remote;
        };

        let target = Path::new(local_path).join(ARTIFACT_FILE_NAME);
        info!("Zip local folder: {}", work_dir.display());
        if let Err(e) = self.packager.package(work_dir, &target, true) {
            warn!("Packaging {} failed: {}", target.display(), e);
            diagnostics.push(Diagnostic::PackagingFailed {
                target: target.display().to_string(),
                reason: e.to_string(),
            });
        }

        let interface = settings.local_interface.as_deref().unwrap_or_default();
        let ip = match first_ipv4(&self.interfaces.addresses(interface)) {
            Some(ip) => ip.to_string(),
            None => {
                diagnostics.push(Diagnostic::MissingInterfaceAddress {
                    interface: interface.to_string(),
                });
                String::new()
            }
        };

        let source = serving_endpoint(settings.local_web.as_deref().unwrap_or_default(), &ip);
        info!("Serving local artifact from {}", source);

        ArtifactMode::Local(LocalArtifact {
            source,
            default_destination: settings.path_to.clone(),
        })
    }
}
