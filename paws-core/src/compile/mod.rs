//! Job compiler
//!
//! Turns a loaded [`PipelineDocument`](crate::domain::pipeline::PipelineDocument)
//! into a [`JobDefinition`](crate::domain::job::JobDefinition):
//!
//! 1. [`ArtifactStrategy::prepare`] decides between remote and local artifacts,
//!    packaging the working directory when local
//! 2. [`Selector`] picks the stages taking part in the run
//! 3. [`assemble_job`] resolves the environment, synthesizes one task per step
//!    and groups them per stage
//!
//! Nothing here reads process state. The working directory, the interface
//! table and the packager are passed in by the caller.
//!
//! Anomalies that do not stop compilation (unknown environment, empty
//! selection, unknown driver, ...) are collected as [`Diagnostic`]s.

mod artifact;
mod assemble;
mod diagnostics;
mod environment;
mod selector;
mod task;

pub use artifact::{
    ARTIFACT_FILE_NAME, ArtifactMode, ArtifactStrategy, IP_PLACEHOLDER, InterfaceResolver,
    LocalArtifact, Packager, first_ipv4, serving_endpoint,
};
pub use assemble::assemble_job;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use environment::{LOCAL_ENVIRONMENT, REMOTE_ENVIRONMENT, ResolvedEnvironment, resolve};
pub use selector::Selector;
pub use task::{RUN_SCRIPT_ENTRYPOINT, synthesize_task};
