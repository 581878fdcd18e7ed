//! Per-dialect type tables
//!
//! Each supported database maps its type names to a `TargetKind` (and a
//! `TemporalFormat` for temporal types). Dialects also fix how fractional
//! seconds are rendered. Adding a dialect means adding a table, not a
//! codepath.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::{ColumnDescriptor, ProtocolError, Result, SourceColumn, TargetKind, TemporalFormat};

/// Rendering of fractional seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractionStyle {
    /// Always nine digits: `.120000000`
    #[default]
    Fixed,
    /// Trailing zeros removed, dot omitted for whole seconds: `.12`
    Trimmed,
}

/// Supported source dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Oracle,
    Snowflake,
    Sqlite,
}

/// A single type mapping entry
type Entry = (&'static str, TargetKind, Option<TemporalFormat>);

/// Resolved mapping for one type name
type Mapping = (TargetKind, Option<TemporalFormat>);

/// Type table for one dialect
#[derive(Debug)]
pub struct TypeTable {
    name: &'static str,
    entries: &'static [Entry],
    /// Rule for names missing from `entries`
    fallback: Option<fn(&str) -> Option<Mapping>>,
    fraction: FractionStyle,
}

const TEXT: TargetKind = TargetKind::Text;
const NUMERIC: TargetKind = TargetKind::Numeric;
const TEMPORAL: TargetKind = TargetKind::Temporal;

static ORACLE: TypeTable = TypeTable {
    name: "oracle",
    entries: &[
        ("NUMBER", NUMERIC, None),
        ("FLOAT", NUMERIC, None),
        ("BINARY_FLOAT", NUMERIC, None),
        ("BINARY_DOUBLE", NUMERIC, None),
        ("VARCHAR2", TEXT, None),
        ("NVARCHAR2", TEXT, None),
        ("CHAR", TEXT, None),
        ("NCHAR", TEXT, None),
        ("CLOB", TEXT, None),
        ("NCLOB", TEXT, None),
        ("DATE", TEMPORAL, Some(TemporalFormat::DateTime)),
        ("TIMESTAMP", TEMPORAL, Some(TemporalFormat::Timestamp)),
        ("TIMESTAMP WITH TIME ZONE", TEMPORAL, Some(TemporalFormat::TimestampTz)),
        ("TIMESTAMP WITH LOCAL TIME ZONE", TEMPORAL, Some(TemporalFormat::Timestamp)),
    ],
    fallback: None,
    fraction: FractionStyle::Fixed,
};

static SNOWFLAKE: TypeTable = TypeTable {
    name: "snowflake",
    entries: &[
        ("FIXED", NUMERIC, None),
        ("REAL", NUMERIC, None),
        ("TEXT", TEXT, None),
        ("DATE", TEMPORAL, Some(TemporalFormat::Date)),
        ("TIMESTAMP_NTZ", TEMPORAL, Some(TemporalFormat::Timestamp)),
        ("TIMESTAMP_TZ", TEMPORAL, Some(TemporalFormat::TimestampTz)),
        ("TIMESTAMP_LTZ", TEMPORAL, Some(TemporalFormat::TimestampUtc)),
    ],
    fallback: None,
    fraction: FractionStyle::Trimmed,
};

static SQLITE: TypeTable = TypeTable {
    name: "sqlite",
    entries: &[
        ("INTEGER", NUMERIC, None),
        ("INT", NUMERIC, None),
        ("BIGINT", NUMERIC, None),
        ("REAL", NUMERIC, None),
        ("NUMERIC", NUMERIC, None),
        ("BOOLEAN", NUMERIC, None),
        ("TEXT", TEXT, None),
        ("VARCHAR", TEXT, None),
        ("BLOB", TEXT, None),
        ("TIME", TEXT, None),
        // Expressions without a declared type
        ("NULL", TEXT, None),
        ("DATE", TEMPORAL, Some(TemporalFormat::Date)),
        ("DATETIME", TEMPORAL, Some(TemporalFormat::Timestamp)),
        ("TIMESTAMP", TEMPORAL, Some(TemporalFormat::Timestamp)),
    ],
    fallback: Some(sqlite_affinity),
    fraction: FractionStyle::Trimmed,
};

/// SQLite column affinity for an arbitrary declared type
///
/// Follows the affinity rules of the SQLite type system: any name is
/// accepted, and names matching none of the substrings get NUMERIC affinity.
fn sqlite_affinity(normalized: &str) -> Option<Mapping> {
    if normalized.starts_with("TIMESTAMP") || normalized.starts_with("DATETIME") {
        return Some((TEMPORAL, Some(TemporalFormat::Timestamp)));
    }
    if normalized.starts_with("DATE") {
        return Some((TEMPORAL, Some(TemporalFormat::Date)));
    }
    let contains = |needle: &str| normalized.contains(needle);
    let kind = if contains("INT") {
        NUMERIC
    } else if contains("CHAR") || contains("CLOB") || contains("TEXT") {
        TEXT
    } else if contains("BLOB") || normalized.is_empty() {
        TEXT
    } else {
        // REAL, FLOAT, DOUBLE, DECIMAL, BOOLEAN and everything else
        NUMERIC
    };
    Some((kind, None))
}

impl Dialect {
    /// Dialect name as used in configuration
    pub fn as_str(&self) -> &'static str {
        self.type_table().name
    }

    /// The dialect's type table
    pub fn type_table(&self) -> &'static TypeTable {
        match self {
            Self::Oracle => &ORACLE,
            Self::Snowflake => &SNOWFLAKE,
            Self::Sqlite => &SQLITE,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "oracle" => Ok(Self::Oracle),
            "snowflake" => Ok(Self::Snowflake),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ProtocolError::UnknownDialect(other.to_string())),
        }
    }
}

impl TypeTable {
    /// Fractional seconds style for this dialect
    #[inline]
    pub fn fraction(&self) -> FractionStyle {
        self.fraction
    }

    /// Look up a type name
    ///
    /// Matching is case-insensitive and ignores precision suffixes, so
    /// `number(10,2)` and `TIMESTAMP(6) WITH TIME ZONE` resolve. Names not
    /// in the table go through the dialect's fallback rule, if it has one.
    pub fn lookup(&self, type_name: &str) -> Option<Mapping> {
        let normalized = normalize_type_name(type_name);
        self.entries
            .iter()
            .find(|(name, _, _)| *name == normalized)
            .map(|&(_, kind, temporal)| (kind, temporal))
            .or_else(|| self.fallback.and_then(|rule| rule(&normalized)))
    }

    /// Build descriptors for every column of a result set
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::UnmappedType` for the first column whose type
    /// is not in the table.
    pub fn describe(&self, columns: &[SourceColumn]) -> Result<Vec<ColumnDescriptor>> {
        columns
            .iter()
            .map(|column| {
                let (kind, temporal) = self.lookup(&column.type_name).ok_or_else(|| {
                    ProtocolError::unmapped_type(&column.name, &column.type_name, self.name)
                })?;
                Ok(ColumnDescriptor {
                    name: column.name.clone(),
                    source_type: normalize_type_name(&column.type_name),
                    kind,
                    temporal,
                })
            })
            .collect()
    }
}

/// Uppercase, drop parenthesized precision, collapse whitespace
fn normalize_type_name(type_name: &str) -> String {
    let mut stripped = String::with_capacity(type_name.len());
    let mut depth = 0usize;
    for ch in type_name.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 => stripped.push(c.to_ascii_uppercase()),
            _ => {}
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
