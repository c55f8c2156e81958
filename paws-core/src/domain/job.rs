//! Compiled job types
//!
//! A batch job in the shape the Nomad HTTP API expects. Field names follow
//! the API's PascalCase convention.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Suffix appended to every generated job identifier
pub const JOB_ID_SUFFIX: &str = "badger-paws";

/// Sandbox path the generated run script is rendered to
pub const RUN_SCRIPT_PATH: &str = "local/run.sh";

/// Driver configuration map, passed to the scheduler as-is
pub type DriverConfig = BTreeMap<String, JsonValue>;

/// Generates a fresh job identifier
///
/// Every call yields a distinct value, so repeated runs of the same pipeline
/// register distinct jobs.
pub fn generate_job_id() -> String {
    format!("{}-{}", uuid::Uuid::new_v4(), JOB_ID_SUFFIX)
}

/// Batch job handed to the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobDefinition {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub job_type: JobType,
    pub region: String,
    pub priority: u32,
    pub datacenters: Vec<String>,
    #[serde(default)]
    pub task_groups: Vec<TaskGroup>,
}

impl JobDefinition {
    /// Creates an empty batch job; the identifier doubles as its name
    pub fn batch(id: impl Into<String>, region: impl Into<String>, priority: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            job_type: JobType::Batch,
            region: region.into(),
            priority,
            datacenters: Vec::new(),
            task_groups: Vec::new(),
        }
    }

    pub fn add_datacenter(&mut self, datacenter: impl Into<String>) {
        self.datacenters.push(datacenter.into());
    }

    pub fn add_task_group(&mut self, group: TaskGroup) {
        self.task_groups.push(group);
    }

    /// Total number of tasks across all groups
    pub fn task_count(&self) -> usize {
        self.task_groups.iter().map(|g| g.tasks.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Batch,
}

/// Group of tasks placed together, one per selected stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskGroup {
    pub name: String,
    pub count: u32,
    pub reschedule_policy: ReschedulePolicy,
    pub restart_policy: RestartPolicy,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskGroup {
    /// Creates a single-instance group that is never retried
    pub fn fail_fast(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 1,
            reschedule_policy: ReschedulePolicy {
                attempts: 0,
                unlimited: false,
            },
            restart_policy: RestartPolicy { attempts: 0 },
            tasks: Vec::new(),
        }
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReschedulePolicy {
    pub attempts: u32,
    pub unlimited: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestartPolicy {
    pub attempts: u32,
}

/// A single task with resolved driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    pub name: String,
    pub driver: String,
    pub config: DriverConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<TaskArtifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<Template>,
}

impl Task {
    pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: driver.into(),
            config: DriverConfig::new(),
            artifacts: Vec::new(),
            templates: Vec::new(),
        }
    }
}

/// Artifact fetched into the task sandbox before start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskArtifact {
    pub getter_source: String,
    pub relative_dest: String,
}

/// Inline template rendered into the task sandbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    pub embedded_tmpl: String,
    pub dest_path: String,
}
