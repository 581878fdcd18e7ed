//! Unload Protocol - Core types for the extraction pipeline
//!
//! This crate provides the types that flow between the row producers and
//! the sinks:
//! - `Range` / `PartitionPlan` - Closed key ranges and their generator
//! - `ColumnDescriptor` - Per-column metadata resolved once per query
//! - `NullableValue` - Typed, nullable cell value
//! - `Dialect` - Per-database type tables (source type name -> target kind)
//! - `Codec` - Canonical text rendering and CSV quoting
//! - `HashAlgorithm` - Digest used by checksum runs
//!
//! # Design Principles
//!
//! - **Resolve once**: Column types are mapped when the query is described,
//!   never per value
//! - **Fail fast**: An unmapped source type is an error at describe time
//! - **Locale-free**: Numbers always use `.` as decimal separator

mod codec;
mod descriptor;
mod dialect;
mod error;
mod hash;
mod range;
mod value;

pub use codec::{Codec, Delimiter, QuoteScope, Record, join_record, quote, unescape};
pub use descriptor::{ColumnDescriptor, SourceColumn, TemporalFormat};
pub use dialect::{Dialect, FractionStyle, TypeTable};
pub use error::ProtocolError;
pub use hash::HashAlgorithm;
pub use range::{PartitionPlan, Range};
pub use value::{NullableValue, Numeric, RawValue, TargetKind};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Default number of keys per partition
pub const DEFAULT_BATCH_SIZE: u64 = 10_000;

// Test modules - only compiled during testing
#[cfg(test)]
mod codec_test;
#[cfg(test)]
mod dialect_test;
#[cfg(test)]
mod error_test;
