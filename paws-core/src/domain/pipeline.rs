//! Pipeline document types
//!
//! The in-memory form of a pipeline file after includes have been merged.
//! Field names serialize with the same keys used in the HCL source so the
//! `valid` action prints something recognisable.

use serde::{Deserialize, Serialize};

/// Root of a loaded pipeline file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDocument {
    pub settings: Settings,
    #[serde(rename = "stage", default)]
    pub stages: Vec<Stage>,
    #[serde(rename = "deployment", default)]
    pub deployments: Vec<Deployment>,
}

impl PipelineDocument {
    /// Local mode is active when a local archive path is configured
    pub fn local_mode(&self) -> bool {
        self.settings
            .local_path
            .as_deref()
            .is_some_and(|path| !path.is_empty())
    }
}

/// Global settings block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Serving URL template, `{IP}` is replaced with the interface address
    #[serde(rename = "localweb")]
    pub local_web: Option<String>,
    /// Directory the local artifact archive is written into
    #[serde(rename = "localpath")]
    pub local_path: Option<String>,
    /// Network interface whose address is served to the cluster
    #[serde(rename = "localinterface")]
    pub local_interface: Option<String>,
    #[serde(rename = "gitlabpath")]
    pub gitlab_path: Option<String>,
    #[serde(rename = "githubpath")]
    pub github_path: Option<String>,
    /// Default artifact destination inside the task sandbox
    #[serde(rename = "pathto")]
    pub path_to: String,
    pub default_container: String,
    #[serde(rename = "environment", default)]
    pub environments: Vec<Environment>,
}

/// Named scheduling environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    /// Kept as text, parsed when resolved
    pub priority: String,
    pub region: String,
    pub datacenter: String,
}

/// A unit of pipeline work keyed by `(group, subgroup)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub group: String,
    pub subgroup: String,
    pub include: Option<String>,
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Stage {
    /// Task group name, `group.subgroup`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.group, self.subgroup)
    }
}

/// One task-producing unit of work within a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub driver: Driver,
    pub command: Vec<String>,
    pub environments: Vec<String>,
    pub deployment: Option<String>,
    #[serde(rename = "pathto")]
    pub path_to: Option<String>,
    #[serde(rename = "workdir")]
    pub work_dir: Option<String>,
}

/// Execution mechanism for a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Driver {
    /// Containerized execution
    Docker { container: String },
    /// Raw execution on the client host
    RawExec { shell: String },
    /// Any other driver label; compiled with an empty configuration
    Unknown { name: String },
}

impl Driver {
    pub const DOCKER: &'static str = "docker";
    pub const RAW_EXEC: &'static str = "raw_exec";

    /// Builds a driver from its block label and optional fields
    pub fn from_label(label: &str, container: Option<String>, shell: Option<String>) -> Self {
        match label {
            Self::DOCKER => Driver::Docker {
                container: container.unwrap_or_default(),
            },
            Self::RAW_EXEC => Driver::RawExec {
                shell: shell.unwrap_or_default(),
            },
            other => Driver::Unknown {
                name: other.to_string(),
            },
        }
    }

    /// Driver name as understood by the scheduler
    pub fn name(&self) -> &str {
        match self {
            Driver::Docker { .. } => Self::DOCKER,
            Driver::RawExec { .. } => Self::RAW_EXEC,
            Driver::Unknown { name } => name,
        }
    }
}

/// Named reference to a deployment pack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub pack: String,
}
