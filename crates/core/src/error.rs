use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while obtaining a table schema.
///
/// The type is `Clone` so that a single failed fetch can be reported to every
/// caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// The requested table name was empty or whitespace
    #[error("Table name must not be empty")]
    EmptyTableName,

    /// The request never produced a response (connection refused, DNS, TLS, ...)
    #[error("Failed to fetch schema for table '{table}': {source}")]
    Transport {
        table: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    /// The metadata server did not answer within the configured timeout
    #[error("Timed out after {timeout:?} fetching schema for table '{table}'")]
    Timeout { table: String, timeout: Duration },

    /// The metadata server answered with a non-success status
    #[error("Schema request for table '{table}' failed with HTTP status {status}")]
    Status { table: String, status: StatusCode },

    /// The response body does not have the shape of a table schema
    #[error("Schema for table '{table}' does not match the expected shape: {reason}")]
    ShapeMismatch { table: String, reason: String },

    /// A snapshot file could not be read
    #[error("Failed to read schema snapshot for table '{table}' at {}: {message}", .path.display())]
    Snapshot {
        table: String,
        path: PathBuf,
        message: String,
    },

    /// A non-schema call against the metadata server failed
    #[error("Metadata server {operation} failed: {message}")]
    Remote { operation: String, message: String },

    /// The injector was disposed and no longer serves schemas
    #[error("Schema injector has been disposed")]
    Disposed,
}

impl SchemaError {
    /// Creates a shape mismatch error for `table`
    pub fn shape(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Classifies a reqwest failure for `table` as timeout or transport error
    pub fn from_request(table: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                table: table.to_string(),
                timeout,
            }
        } else {
            Self::Transport {
                table: table.to_string(),
                source: Arc::new(err),
            }
        }
    }

    pub(crate) fn remote(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// The table this error refers to, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::Transport { table, .. }
            | Self::Timeout { table, .. }
            | Self::Status { table, .. }
            | Self::ShapeMismatch { table, .. }
            | Self::Snapshot { table, .. } => Some(table),
            Self::EmptyTableName | Self::Remote { .. } | Self::Disposed => None,
        }
    }

    /// Returns true for failures that happened before a response arrived
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Returns true if the server answered but the body was not a valid schema
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    /// Multi-line message with a suggestion, for terminal output
    pub fn report(&self) -> String {
        match self {
            Self::EmptyTableName => "Table name must not be empty\n\
                 Suggestion: Pass the name of a table known to the metadata server."
                .to_string(),
            Self::Transport { table, source } => {
                format!(
                    "Could not reach the metadata server for table '{}': {}\n\
                     Suggestion: Check that the server is running and the configured URL is correct.",
                    table, source
                )
            }
            Self::Timeout { table, timeout } => {
                format!(
                    "Metadata server did not answer within {:?} for table '{}'\n\
                     Suggestion: Raise `timeout_secs` in the [source] section or check server load.",
                    timeout, table
                )
            }
            Self::Status { table, status } => {
                format!(
                    "Metadata server returned {} for table '{}'\n\
                     Suggestion: Verify the table exists and the bearer token is valid.",
                    status, table
                )
            }
            Self::ShapeMismatch { table, reason } => {
                format!(
                    "Schema for table '{}' is malformed: {}\n\
                     Suggestion: Compare the server response with the expected schema format.",
                    table, reason
                )
            }
            Self::Snapshot {
                table,
                path,
                message,
            } => {
                format!(
                    "Snapshot {} for table '{}' could not be read: {}\n\
                     Suggestion: Export the schema again or fix the snapshot directory.",
                    path.display(),
                    table,
                    message
                )
            }
            Self::Remote { operation, message } => {
                format!("Metadata server {} failed: {}", operation, message)
            }
            Self::Disposed => "Schema injector has been disposed\n\
                 Suggestion: Create a new injector instead of reusing a disposed one."
                .to_string(),
        }
    }
}
