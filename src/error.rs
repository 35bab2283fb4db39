//! Error types
//!
//! Three kinds of faults exist. Configuration faults break setup and are
//! surfaced before any document is checked. Parse faults are scoped to one
//! document. Check faults happen inside a single rule for a single document
//! and are absorbed by the engine.

use std::path::PathBuf;

use thiserror::Error;

/// Broken or incomplete rule configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration source could not be loaded at all
    #[error("configuration is missing or malformed: {0}")]
    Missing(String),

    /// No constructor is registered under this name
    #[error("unknown validator '{name}'")]
    UnknownValidator { name: String },

    /// A required attribute was not supplied
    #[error("validator '{validator}' requires the '{parameter}' property")]
    MissingParameter { validator: String, parameter: String },

    /// An attribute was supplied but could not be converted
    #[error("validator '{validator}': invalid value '{value}' for '{parameter}'")]
    InvalidParameter {
        validator: String,
        parameter: String,
        value: String,
    },

    /// A shared resource (such as the character table) is not available
    #[error("validator '{validator}' requires the {resource}")]
    MissingResource { validator: String, resource: String },
}

/// Failure to turn one input into a document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    InvalidEncoding { path: PathBuf },

    #[error("malformed input: {0}")]
    Malformed(String),
}

/// Internal fault raised by a rule while checking one document
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CheckError {
    pub message: String,
}

impl CheckError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
