//! Core domain types
//!
//! This module contains the structures shared across Paws crates.
//! The pipeline document is produced by the loader and consumed by the
//! compiler; the job definition is produced by the compiler and consumed
//! by the scheduler client.

pub mod job;
pub mod pipeline;
