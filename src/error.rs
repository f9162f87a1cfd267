//! Unified error types for graphql-ged.

use thiserror::Error;

/// Main error type for diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchemaDiffError {
    /// The diff was cancelled through its [`CancellationToken`](crate::CancellationToken)
    /// before a final result was produced.
    #[error("schema diff cancelled before completion")]
    Cancelled,

    /// A schema snapshot could not be turned into a diff graph.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl SchemaDiffError {
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema(message.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemaDiffError>;
