//! Run action: compile the selected stages and register the job

use anyhow::{Context, Result};
use colored::*;
use tracing::warn;

use crate::config::Config;
use paws_client::JobSubmitter;
use paws_core::compile::{
    ArtifactStrategy, Diagnostics, InterfaceResolver, Packager, Selector, assemble_job,
};
use paws_core::domain::job::{JobDefinition, generate_job_id};
use paws_core::domain::pipeline::PipelineDocument;
use paws_core::dto::job::RegisterJobRequest;

/// Host-facing services the run action depends on
pub struct Collaborators<'a> {
    pub packager: &'a dyn Packager,
    pub interfaces: &'a dyn InterfaceResolver,
    pub submitter: &'a dyn JobSubmitter,
}

/// Compile `selector` out of `document` and register the resulting job
///
/// Anomalies absorbed during compilation are logged as warnings. With
/// `dry_run` set the job is printed instead of submitted. Returns the
/// compiled job.
pub async fn run_pipeline(
    document: &PipelineDocument,
    selector: &str,
    config: &Config,
    collaborators: &Collaborators<'_>,
) -> Result<JobDefinition> {
    let selector = Selector::parse(selector);
    let mut diagnostics = Diagnostics::new();

    let strategy = ArtifactStrategy::new(collaborators.packager, collaborators.interfaces);
    let artifacts = strategy.prepare(&document.settings, &config.work_dir, &mut diagnostics);

    let job = assemble_job(
        document,
        &selector,
        &artifacts,
        generate_job_id(),
        &mut diagnostics,
    );

    for diagnostic in &diagnostics {
        warn!("{}", diagnostic);
    }

    if config.dry_run {
        let request = RegisterJobRequest { job: job.clone() };
        let json =
            serde_json::to_string_pretty(&request).context("Failed to render compiled job")?;
        println!("{}", json);
        return Ok(job);
    }

    let response = collaborators.submitter.submit(&job).await.map_err(|e| {
        if e.is_client_error() {
            anyhow::anyhow!("Nomad rejected job {}: {}", job.id, e)
        } else {
            anyhow::Error::new(e).context(format!("Failed to register job {}", job.id))
        }
    })?;

    println!("{}", "✓ Job registered!".green().bold());
    println!("  {}: {}", "Job".bold(), job.id.cyan());
    println!("  {}: {}", "Selector".bold(), selector);
    println!("  {}: {}", "Task groups".bold(), job.task_groups.len());
    println!("  {}: {}", "Tasks".bold(), job.task_count());
    if !response.eval_id.is_empty() {
        println!("  {}: {}", "Evaluation".bold(), response.eval_id);
    }
    if let Some(warnings) = response.warnings.as_deref().filter(|w| !w.is_empty()) {
        println!("  {}: {}", "Warnings".yellow(), warnings);
    }

    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use paws_client::{ClientError, RegisterJobResponse};
    use paws_core::domain::pipeline::{Driver, Environment, Settings, Stage, Step};
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSubmitter {
        submitted: Mutex<Vec<JobDefinition>>,
        reject: bool,
    }

    #[async_trait]
    impl JobSubmitter for MockSubmitter {
        async fn submit(&self, job: &JobDefinition) -> paws_client::Result<RegisterJobResponse> {
            self.submitted.lock().unwrap().push(job.clone());
            if self.reject {
                return Err(ClientError::api_error(400, "job validation failed"));
            }
            Ok(RegisterJobResponse {
                eval_id: "eval-1".to_string(),
                ..Default::default()
            })
        }
    }

    struct NoopPackager;

    impl Packager for NoopPackager {
        fn package(&self, _: &Path, _: &Path, _: bool) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FixedInterfaces;

    impl InterfaceResolver for FixedInterfaces {
        fn addresses(&self, _: &str) -> Vec<IpAddr> {
            vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))]
        }
    }

    fn step(name: &str) -> Step {
        Step {
            name: name.to_string(),
            driver: Driver::RawExec {
                shell: "/bin/sh".to_string(),
            },
            command: vec![format!("echo {}", name)],
            environments: vec!["remote".to_string()],
            deployment: None,
            path_to: None,
            work_dir: None,
        }
    }

    fn environment(name: &str, priority: &str, datacenter: &str) -> Environment {
        Environment {
            name: name.to_string(),
            priority: priority.to_string(),
            region: "global".to_string(),
            datacenter: datacenter.to_string(),
        }
    }

    fn document() -> PipelineDocument {
        PipelineDocument {
            settings: Settings {
                path_to: "local/repo".to_string(),
                default_container: "alpine".to_string(),
                environments: vec![
                    environment("remote", "50", "dc1"),
                    environment("local", "10", "dev"),
                ],
                ..Default::default()
            },
            stages: vec![
                Stage {
                    group: "build".to_string(),
                    subgroup: "lint".to_string(),
                    include: None,
                    steps: vec![step("fmt"), step("clippy")],
                },
                Stage {
                    group: "build".to_string(),
                    subgroup: "test".to_string(),
                    include: None,
                    steps: vec![step("unit")],
                },
            ],
            deployments: vec![],
        }
    }

    fn config(dry_run: bool) -> Config {
        Config {
            dry_run,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_submits_selected_stages() {
        let submitter = MockSubmitter::default();
        let collaborators = Collaborators {
            packager: &NoopPackager,
            interfaces: &FixedInterfaces,
            submitter: &submitter,
        };

        let job = run_pipeline(&document(), "build", &config(false), &collaborators)
            .await
            .unwrap();

        assert_eq!(job.priority, 50);
        assert_eq!(job.datacenters, vec!["dc1"]);
        assert_eq!(job.task_groups.len(), 2);
        assert_eq!(job.task_count(), 3);
        assert!(job.id.ends_with("-badger-paws"));

        let submitted = submitter.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0], job);
    }

    #[tokio::test]
    async fn test_run_submits_empty_selection() {
        let submitter = MockSubmitter::default();
        let collaborators = Collaborators {
            packager: &NoopPackager,
            interfaces: &FixedInterfaces,
            submitter: &submitter,
        };

        let job = run_pipeline(&document(), "deploy", &config(false), &collaborators)
            .await
            .unwrap();

        assert!(job.task_groups.is_empty());
        assert_eq!(submitter.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_does_not_submit() {
        let submitter = MockSubmitter::default();
        let collaborators = Collaborators {
            packager: &NoopPackager,
            interfaces: &FixedInterfaces,
            submitter: &submitter,
        };

        let job = run_pipeline(&document(), "build.lint", &config(true), &collaborators)
            .await
            .unwrap();

        assert_eq!(job.task_groups.len(), 1);
        assert_eq!(job.task_groups[0].name, "build.lint");
        assert!(submitter.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_job_is_an_error() {
        let submitter = MockSubmitter {
            reject: true,
            ..Default::default()
        };
        let collaborators = Collaborators {
            packager: &NoopPackager,
            interfaces: &FixedInterfaces,
            submitter: &submitter,
        };

        let err = run_pipeline(&document(), "build", &config(false), &collaborators)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Nomad rejected job"));
    }

    #[tokio::test]
    async fn test_local_mode_uses_local_environment_and_artifact() {
        let mut document = document();
        document.settings.local_path = Some("/srv/paws".to_string());
        document.settings.local_web = Some("http://{IP}:8000".to_string());
        document.settings.local_interface = Some("eth0".to_string());

        let submitter = MockSubmitter::default();
        let collaborators = Collaborators {
            packager: &NoopPackager,
            interfaces: &FixedInterfaces,
            submitter: &submitter,
        };

        let job = run_pipeline(&document, "build.test", &config(false), &collaborators)
            .await
            .unwrap();

        assert_eq!(job.priority, 10);
        assert_eq!(job.datacenters, vec!["dev"]);

        let task = &job.task_groups[0].tasks[0];
        assert_eq!(
            task.artifacts[0].getter_source,
            "http://10.0.0.7:8000/artifact.zip"
        );
        assert_eq!(task.artifacts[0].relative_dest, "local/repo");
        assert_eq!(task.templates[0].dest_path, "local/run.sh");
    }
}
