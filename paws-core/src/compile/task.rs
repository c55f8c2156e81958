//! Task synthesis
//!
//! One Nomad task per step. In local mode the step's commands are rendered
//! into `local/run.sh` and the packaged working directory is fetched as an
//! artifact; the driver then runs that script instead of the commands.

use serde_json::json;

use super::artifact::ArtifactMode;
use super::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::job::{RUN_SCRIPT_PATH, Task, Template};
use crate::domain::pipeline::{Driver, Settings, Step};

/// Container entrypoint running the generated script
pub const RUN_SCRIPT_ENTRYPOINT: [&str; 2] = ["/bin/sh", "/local/run.sh"];

/// Build the task for `step`
pub fn synthesize_task(
    step: &Step,
    settings: &Settings,
    mode: &ArtifactMode,
    diagnostics: &mut Diagnostics,
) -> Task {
    let mut task = Task::new(&step.name, step.driver.name());

    if let ArtifactMode::Local(local) = mode {
        task.artifacts.push(local.descriptor(step));
        task.templates.push(Template {
            embedded_tmpl: step.command.join("\n"),
            dest_path: RUN_SCRIPT_PATH.to_string(),
        });
    }

    match &step.driver {
        Driver::Docker { container } => {
            let image = if container.is_empty() {
                &settings.default_container
            } else {
                container
            };
            task.config.insert("image".to_string(), json!(image));
            task.config
                .insert("entrypoint".to_string(), json!(RUN_SCRIPT_ENTRYPOINT));
            if let Some(work_dir) = step.work_dir.as_deref().filter(|dir| !dir.is_empty()) {
                task.config.insert("work_dir".to_string(), json!(work_dir));
            }
        }
        Driver::RawExec { shell } => {
            task.config.insert("command".to_string(), json!(shell));
            let args = if mode.is_local() {
                vec![RUN_SCRIPT_PATH.to_string()]
            } else {
                step.command.clone()
            };
            task.config.insert("args".to_string(), json!(args));
        }
        Driver::Unknown { name } => {
            diagnostics.push(Diagnostic::UnknownDriver {
                step: step.name.clone(),
                driver: name.clone(),
            });
        }
    }

    task
}
