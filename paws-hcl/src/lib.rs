//! Paws HCL Loading
//!
//! This crate reads pipeline files written in HCL into a
//! [`PipelineDocument`](paws_core::domain::pipeline::PipelineDocument).
//! It includes:
//! - Parser: schema-checked conversion of an HCL body into domain types
//! - Loader: file access and splicing of `include`d step collections

pub mod error;
pub mod loader;
pub mod parser;

pub use error::{LoadError, ParseError};
pub use loader::Loader;
pub use parser::{parse_document, parse_steps};
