//! Environment resolution
//!
//! Looks up the scheduling hints (priority, region, datacenter) declared for a
//! named environment in the settings block.

use tracing::debug;

use super::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::pipeline::PipelineDocument;

/// Environment used when artifacts are fetched remotely
pub const REMOTE_ENVIRONMENT: &str = "remote";

/// Environment used when the working directory is served locally
pub const LOCAL_ENVIRONMENT: &str = "local";

/// Scheduling hints for a job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    pub priority: u32,
    pub region: String,
    pub datacenter: String,
}

/// Resolve the environment called `name`
///
/// The last declaration with a matching name wins. An unknown name resolves to
/// zero priority and empty region/datacenter. Priority text that is not a
/// non-negative integer resolves to zero.
pub fn resolve(
    document: &PipelineDocument,
    name: &str,
    diagnostics: &mut Diagnostics,
) -> ResolvedEnvironment {
    let Some(env) = document
        .settings
        .environments
        .iter()
        .rev()
        .find(|env| env.name == name)
    else {
        diagnostics.push(Diagnostic::UnknownEnvironment {
            name: name.to_string(),
        });
        return ResolvedEnvironment::default();
    };

    let priority = match env.priority.parse::<u32>() {
        Ok(priority) => priority,
        Err(_) => {
            diagnostics.push(Diagnostic::InvalidPriority {
                environment: name.to_string(),
                value: env.priority.clone(),
            });
            0
        }
    };

    debug!(
        "Resolved environment {}: priority={}, region={}, datacenter={}",
        name, priority, env.region, env.datacenter
    );

    ResolvedEnvironment {
        priority,
        region: env.region.clone(),
        datacenter: env.datacenter.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::Environment;

    fn env(name: &str, priority: &str, region: &str, datacenter: &str) -> Environment {
        Environment {
            name: name.to_string(),
            priority: priority.to_string(),
            region: region.to_string(),
            datacenter: datacenter.to_string(),
        }
    }

    fn document(environments: Vec<Environment>) -> PipelineDocument {
        let mut doc = PipelineDocument::default();
        doc.settings.environments = environments;
        doc
    }

    #[test]
    fn test_resolve_matching_environment() {
        let doc = document(vec![
            env("local", "10", "home", "laptop"),
            env("remote", "5", "us", "dc1"),
        ]);
        let mut diagnostics = Diagnostics::new();

        let resolved = resolve(&doc, "remote", &mut diagnostics);
        assert_eq!(resolved.priority, 5);
        assert_eq!(resolved.region, "us");
        assert_eq!(resolved.datacenter, "dc1");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_resolve_absent_environment_is_empty() {
        let doc = document(vec![env("local", "10", "home", "laptop")]);
        let mut diagnostics = Diagnostics::new();

        let resolved = resolve(&doc, "remote", &mut diagnostics);
        assert_eq!(resolved, ResolvedEnvironment::default());
        assert!(diagnostics.contains(&Diagnostic::UnknownEnvironment {
            name: "remote".to_string()
        }));
    }

    #[test]
    fn test_resolve_last_duplicate_wins() {
        let doc = document(vec![
            env("remote", "5", "us", "dc1"),
            env("remote", "7", "eu", "dc2"),
        ]);
        let resolved = resolve(&doc, "remote", &mut Diagnostics::new());
        assert_eq!(resolved.priority, 7);
        assert_eq!(resolved.region, "eu");
        assert_eq!(resolved.datacenter, "dc2");
    }

    #[test]
    fn test_resolve_invalid_priority_is_zero() {
        let doc = document(vec![
            env("remote", "high", "us", "dc1"),
            env("local", "-3", "home", "laptop"),
        ]);
        let mut diagnostics = Diagnostics::new();

        let remote = resolve(&doc, "remote", &mut diagnostics);
        assert_eq!(remote.priority, 0);
        assert_eq!(remote.region, "us");

        let local = resolve(&doc, "local", &mut diagnostics);
        assert_eq!(local.priority, 0);
        assert_eq!(diagnostics.len(), 2);
    }
}
