//! Source error types

use thiserror::Error;
use unload_protocol::ProtocolError;

/// Result type for source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors raised while connecting to or reading from a source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Opening a connection failed
    #[error("worker {worker_id} failed to connect: {message}")]
    Connect { worker_id: usize, message: String },

    /// A session initialization statement failed
    #[error("session statement '{statement}' failed: {message}")]
    Session { statement: String, message: String },

    /// The query could not be started
    #[error("query failed: {0}")]
    Query(String),

    /// The cursor failed while fetching rows
    #[error("cursor failed after {rows} rows: {message}")]
    Cursor { rows: u64, message: String },

    /// Column metadata could not be mapped
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Connection URL not handled by any connector
    #[error("unsupported source url '{0}'")]
    UnsupportedUrl(String),

    /// The row consumer went away
    #[error("row channel closed by consumer")]
    ChannelClosed,
}

impl SourceError {
    /// Create a Connect error
    pub fn connect(worker_id: usize, message: impl Into<String>) -> Self {
        Self::Connect {
            worker_id,
            message: message.into(),
        }
    }

    /// Create a Session error
    pub fn session(statement: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Session {
            statement: statement.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error happened while establishing a connection
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::Session { .. } | Self::UnsupportedUrl(_)
        )
    }
}

/// A single cell could not be converted to its descriptor's kind
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScanError {
    /// Row width does not match the descriptors
    #[error("row has {actual} cells, expected {expected}")]
    ColumnCount { expected: usize, actual: usize },

    /// Cell type incompatible with column kind
    #[error("column '{column}' ({kind}): {message}")]
    Convert {
        column: String,
        kind: &'static str,
        message: String,
    },
}
