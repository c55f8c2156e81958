//! Job assembly

use tracing::{debug, info};

use super::artifact::ArtifactMode;
use super::diagnostics::{Diagnostic, Diagnostics};
use super::environment::{LOCAL_ENVIRONMENT, REMOTE_ENVIRONMENT, resolve};
use super::selector::Selector;
use super::task::synthesize_task;
use crate::domain::job::{JobDefinition, TaskGroup};
use crate::domain::pipeline::PipelineDocument;

/// Compile the stages matched by `selector` into a batch job
///
/// Scheduling hints come from the `remote` environment, or from `local` when
/// `artifacts` is local. Each selected stage becomes one task group named
/// `group.subgroup` that the scheduler never restarts or reschedules. A
/// selector matching nothing yields a job without task groups.
pub fn assemble_job(
    document: &PipelineDocument,
    selector: &Selector,
    artifacts: &ArtifactMode,
    job_id: impl Into<String>,
    diagnostics: &mut Diagnostics,
) -> JobDefinition {
    let env_name = if artifacts.is_local() {
        LOCAL_ENVIRONMENT
    } else {
        REMOTE_ENVIRONMENT
    };
    let env = resolve(document, env_name, diagnostics);

    let mut job = JobDefinition::batch(job_id, env.region, env.priority);
    job.add_datacenter(env.datacenter);

    for stage in selector.select(&document.stages) {
        let mut group = TaskGroup::fail_fast(stage.qualified_name());
        for step in &stage.steps {
            group.add_task(synthesize_task(
                step,
                &document.settings,
                artifacts,
                diagnostics,
            ));
        }
        debug!("Task group {} has {} task(s)", group.name, group.tasks.len());
        job.add_task_group(group);
    }

    if job.task_groups.is_empty() {
        diagnostics.push(Diagnostic::EmptySelection {
            selector: selector.to_string(),
        });
    }

    info!(
        "Assembled job {} with {} task group(s) and {} task(s)",
        job.id,
        job.task_groups.len(),
        job.task_count()
    );

    job
}
