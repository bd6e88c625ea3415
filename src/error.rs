//! Error types for corewalk.
//!
//! This module provides structured error handling using thiserror. Resolution
//! errors (type names, field paths) are raised before a traversal starts;
//! read errors terminate the remaining portion of a walk.

use thiserror::Error;

/// Main error type for corewalk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A type name resolved to nothing, neither directly nor with the
    /// aggregate "struct" prefix.
    #[error("unknown type '{name}': {detail}")]
    UnknownType { name: String, detail: String },

    /// A name resolved to something that is neither a struct nor a typedef
    /// to a struct.
    #[error("'{name}' is not a struct nor a typedef to a struct")]
    NotAnAggregate { name: String },

    /// A field path segment named a member the type does not have.
    #[error("type '{type_name}' has no member '{field}'")]
    NoSuchField { type_name: String, field: String },

    /// An array index segment was out of bounds or applied to a non-array.
    #[error("invalid index {index} into '{type_name}': {reason}")]
    InvalidIndex {
        type_name: String,
        index: u64,
        reason: String,
    },

    /// A field path string could not be parsed.
    #[error("malformed field path '{path}': {reason}")]
    PathSyntax { path: String, reason: String },

    /// The memory backend could not service a read.
    #[error("cannot read {size} bytes at {address:#x}: {reason}")]
    MemoryRead {
        address: u64,
        size: u64,
        reason: String,
    },

    /// A bounded walk took more steps than its configured limit.
    #[error("list walk exceeded {limit} steps (possible cycle or torn snapshot)")]
    StepLimit { limit: usize },

    /// An error raised while running a pipeline command, tagged with the
    /// command's name.
    #[error("{command}: {source}")]
    Command {
        command: String,
        #[source]
        source: Box<Error>,
    },

    /// File I/O errors (dump files, type table loads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Type table (de)serialization errors.
    #[error("type table error: {0}")]
    TypeTable(String),
}

impl Error {
    /// Wrap an error with the name of the command that raised it.
    pub fn for_command(self, command: &str) -> Error {
        match self {
            // Already tagged; keep the innermost command attribution.
            Error::Command { .. } => self,
            other => Error::Command {
                command: command.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type alias for corewalk operations.
pub type Result<T> = std::result::Result<T, Error>;
