//! Error types for sql2blueprint.
//!
//! Only the surrounding layers fail hard: the parser, the configuration
//! loader and the migration writer. The transpiler degrades instead of
//! erroring and never produces one of these.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for sql2blueprint operations.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// Failed to parse the SQL input.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// The migration stub could not be rendered.
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Refused to overwrite an existing migration file.
    #[error("Migration already exists: {}", .0.display())]
    Exists(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML configuration.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BlueprintError {
    /// Create a parse error at the given byte offset.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for sql2blueprint operations.
pub type BlueprintResult<T> = Result<T, BlueprintError>;
