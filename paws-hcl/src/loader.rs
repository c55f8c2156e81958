//! Pipeline file loader
//!
//! Reads a pipeline file from disk and splices the steps of every `include`d
//! file into the stage that references it.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::parser::{parse_document, parse_steps};
use paws_core::domain::pipeline::{PipelineDocument, Step};

/// Loads pipeline documents and their includes
#[derive(Debug, Clone)]
pub struct Loader {
    /// Directory relative include paths are resolved against
    include_root: PathBuf,
}

impl Loader {
    /// Creates a loader resolving relative includes against `include_root`
    pub fn new(include_root: impl Into<PathBuf>) -> Self {
        Self {
            include_root: include_root.into(),
        }
    }

    pub fn include_root(&self) -> &Path {
        &self.include_root
    }

    /// Load `path` and merge all includes
    ///
    /// Included steps are appended after the stage's inline steps, in file
    /// order. Fails on the first file that cannot be read or parsed.
    pub fn load(&self, path: &Path) -> Result<PipelineDocument, LoadError> {
        info!("Loading pipeline {}", path.display());
        let source = read(path)?;
        let mut document = parse_document(&source).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for stage in &mut document.stages {
            let Some(include) = stage.include.as_deref() else {
                continue;
            };

            let steps = self.load_steps(include)?;
            debug!(
                "Merging {} step(s) from {} into stage {}",
                steps.len(),
                include,
                stage.qualified_name()
            );
            stage.steps.extend(steps);
        }

        Ok(document)
    }

    /// Load a standalone step collection
    pub fn load_steps(&self, include: &str) -> Result<Vec<Step>, LoadError> {
        let path = self.include_root.join(include);
        let source = read(&path)?;
        parse_steps(&source).map_err(|source| LoadError::Parse { path, source })
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ROOT: &str = r#"
        settings {
            pathto            = "local/repo"
            default_container = "alpine"
        }

        stage "build" "lint" {
            include = "steps/lint.hcl"

            step "inline-1" {
                driver "raw_exec" {
                    shell = "/bin/sh"
                }
                command      = ["echo 1"]
                environments = ["remote"]
            }

            step "inline-2" {
                driver "raw_exec" {
                    shell = "/bin/sh"
                }
                command      = ["echo 2"]
                environments = ["remote"]
            }
        }

        stage "build" "test" {
            step "unit" {
                driver "raw_exec" {
                    shell = "/bin/sh"
                }
                command      = ["cargo test"]
                environments = ["remote"]
            }
        }
    "#;

    const INCLUDE: &str = r#"
        step "included-1" {
            driver "docker" {
                container = "rust:1"
            }
            command      = ["cargo clippy"]
            environments = ["remote"]
        }

        step "included-2" {
            driver "docker" {
                container = "rust:1"
            }
            command      = ["cargo fmt --check"]
            environments = ["remote"]
        }

        step "included-3" {
            driver "raw_exec" {
                shell = "/bin/bash"
            }
            command      = ["shellcheck *.sh"]
            environments = ["remote"]
        }
    "#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_merges_includes_after_inline_steps() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "paws.hcl", ROOT);
        write(&dir, "steps/lint.hcl", INCLUDE);

        let doc = Loader::new(dir.path()).load(&root).unwrap();

        let names: Vec<&str> = doc.stages[0]
            .steps
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "inline-1",
                "inline-2",
                "included-1",
                "included-2",
                "included-3"
            ]
        );
        assert_eq!(doc.stages[0].include.as_deref(), Some("steps/lint.hcl"));
        assert_eq!(doc.stages[1].steps.len(), 1);
    }

    #[test]
    fn test_load_missing_include_fails() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "paws.hcl", ROOT);

        let err = Loader::new(dir.path()).load(&root).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert_eq!(err.path(), dir.path().join("steps/lint.hcl"));
    }

    #[test]
    fn test_load_invalid_include_fails() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "paws.hcl", ROOT);
        write(&dir, "steps/lint.hcl", "settings {}");

        let err = Loader::new(dir.path()).load(&root).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("lint.hcl"));
    }

    #[test]
    fn test_load_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let err = Loader::new(dir.path())
            .load(&dir.path().join("nope.hcl"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_load_steps_resolves_against_include_root() {
        let dir = TempDir::new().unwrap();
        write(&dir, "steps/lint.hcl", INCLUDE);

        let loader = Loader::new(dir.path());
        assert_eq!(loader.include_root(), dir.path());
        assert_eq!(loader.load_steps("steps/lint.hcl").unwrap().len(), 3);
    }
}
