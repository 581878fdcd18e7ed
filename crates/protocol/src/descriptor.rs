//! Column descriptors
//!
//! Built once per query from the result-set metadata and immutable after.

use crate::TargetKind;

/// Column metadata as reported by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    /// Column name or alias
    pub name: String,
    /// Database type name (e.g. `VARCHAR2`, `TIMESTAMP_TZ`)
    pub type_name: String,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Rendering of a temporal column, fixed per source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalFormat {
    /// `2024-01-31`
    Date,
    /// `2024-01-31 13:45:00`
    DateTime,
    /// `2024-01-31 13:45:00.123456789`
    Timestamp,
    /// `2024-01-31 13:45:00.123456789 +0200`
    TimestampTz,
    /// Timestamp converted to UTC before rendering
    TimestampUtc,
}

/// Static per-column metadata used by the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name or alias
    pub name: String,
    /// Normalized source type name
    pub source_type: String,
    /// Target kind the column decodes to
    pub kind: TargetKind,
    /// Temporal rendering, set only for temporal columns
    pub temporal: Option<TemporalFormat>,
}

impl ColumnDescriptor {
    /// Text column
    pub fn text(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            kind: TargetKind::Text,
            temporal: None,
        }
    }

    /// Numeric column
    pub fn numeric(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            kind: TargetKind::Numeric,
            temporal: None,
        }
    }

    /// Temporal column with a fixed rendering
    pub fn temporal(
        name: impl Into<String>,
        source_type: impl Into<String>,
        format: TemporalFormat,
    ) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            kind: TargetKind::Temporal,
            temporal: Some(format),
        }
    }
}
