//! Error types for pipeline loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while turning HCL text into domain types
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input is not valid HCL
    #[error("Invalid HCL: {0}")]
    Syntax(#[from] hcl::Error),

    /// A required attribute is absent
    #[error("{context}: missing required argument \"{key}\"")]
    MissingAttribute { context: String, key: &'static str },

    /// A required block is absent
    #[error("{context}: missing required block \"{identifier}\"")]
    MissingBlock {
        context: String,
        identifier: &'static str,
    },

    /// A block that may appear once appears more than once
    #[error("{context}: duplicate \"{identifier}\" block")]
    DuplicateBlock {
        context: String,
        identifier: &'static str,
    },

    /// An attribute is set more than once in the same body
    #[error("{context}: duplicate argument \"{key}\"")]
    DuplicateAttribute { context: String, key: String },

    /// An attribute not part of the schema
    #[error("{context}: unsupported argument \"{key}\"")]
    UnsupportedAttribute { context: String, key: String },

    /// A block type not part of the schema
    #[error("{context}: unsupported block type \"{identifier}\"")]
    UnsupportedBlock { context: String, identifier: String },

    /// A block carries the wrong number of labels
    #[error("{context}: \"{identifier}\" block expects {expected} label(s), found {found}")]
    LabelCount {
        context: String,
        identifier: &'static str,
        expected: usize,
        found: usize,
    },

    /// An attribute value has the wrong type
    #[error("{context}: argument \"{key}\" must be {expected}")]
    InvalidType {
        context: String,
        key: String,
        expected: &'static str,
    },
}

/// Errors raised while loading a pipeline file and its includes
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed
    #[error("Failed to load configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// Path of the file that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Read { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}
