//! Paws Core
//!
//! Core types and the job compiler for the Paws pipeline tool.
//!
//! This crate contains:
//! - Domain types: the pipeline document and the compiled Nomad job
//! - DTOs: request/response bodies exchanged with the scheduler
//! - Compiler: environment resolution, stage selection, artifact strategy,
//!   task synthesis and job assembly

pub mod compile;
pub mod domain;
pub mod dto;
