//! Protocol error types
//!
//! Errors raised while building ranges or describing query columns. All of
//! them are configuration errors: they surface before any row is processed.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Range with first bound above last bound
    #[error("invalid range: first {first} is greater than last {last}")]
    InvalidRange { first: i64, last: i64 },

    /// Partition batch size of zero
    #[error("invalid batch size: must be at least 1")]
    InvalidBatchSize,

    /// Source column type not present in the dialect's type table
    #[error("unexpected type '{type_name}' for column '{column}' ({dialect})")]
    UnmappedType {
        column: String,
        type_name: String,
        dialect: &'static str,
    },

    /// Unknown dialect name
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// Unknown delimiter name
    #[error("unknown delimiter: {0}")]
    UnknownDelimiter(String),

    /// Unknown digest algorithm name
    #[error("unknown digest algorithm: {0}")]
    UnknownHashAlgorithm(String),
}

impl ProtocolError {
    /// Create an invalid range error
    #[inline]
    pub fn invalid_range(first: i64, last: i64) -> Self {
        Self::InvalidRange { first, last }
    }

    /// Create an unmapped type error
    #[inline]
    pub fn unmapped_type(
        column: impl Into<String>,
        type_name: impl Into<String>,
        dialect: &'static str,
    ) -> Self {
        Self::UnmappedType {
            column: column.into(),
            type_name: type_name.into(),
            dialect,
        }
    }
}
