//! Driver cells and per-row scanning
//!
//! Connections hand back rows of [`Cell`]s exactly as the driver produced
//! them. [`scan`] converts one row into typed [`NullableValue`]s using the
//! column descriptors built once per query, so no per-value type inspection
//! happens after the descriptors exist.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use unload_protocol::{ColumnDescriptor, NullableValue, Numeric, TargetKind};

use crate::error::ScanError;

/// One value as delivered by a driver
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Float(f64),
    /// Fixed-point number rendered as text by the driver
    Decimal(String),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    /// Timestamp without zone, taken as UTC
    DateTime(NaiveDateTime),
    Timestamp(DateTime<FixedOffset>),
    /// Value the driver could not decode; rejected by [`scan`]
    Invalid(String),
}

/// Convert a fetched row into typed values aligned with `descriptors`
pub fn scan(
    cells: Vec<Cell>,
    descriptors: &[ColumnDescriptor],
) -> Result<Vec<NullableValue>, ScanError> {
    if cells.len() != descriptors.len() {
        return Err(ScanError::ColumnCount {
            expected: descriptors.len(),
            actual: cells.len(),
        });
    }

    cells
        .into_iter()
        .zip(descriptors)
        .map(|(cell, descriptor)| scan_cell(cell, descriptor))
        .collect()
}

fn scan_cell(cell: Cell, descriptor: &ColumnDescriptor) -> Result<NullableValue, ScanError> {
    match cell {
        Cell::Null => return Ok(NullableValue::absent(descriptor.kind)),
        Cell::Invalid(message) => return Err(convert_error(descriptor, message)),
        _ => {}
    }

    match descriptor.kind {
        TargetKind::Text => scan_text(cell, descriptor),
        TargetKind::Numeric => scan_numeric(cell, descriptor),
        TargetKind::Temporal => scan_temporal(cell, descriptor),
    }
}

fn scan_text(cell: Cell, descriptor: &ColumnDescriptor) -> Result<NullableValue, ScanError> {
    let text = match cell {
        Cell::Text(s) | Cell::Decimal(s) => s,
        Cell::Integer(i) => i.to_string(),
        Cell::Float(f) => f.to_string(),
        Cell::Bytes(bytes) => String::from_utf8(bytes)
            .map_err(|e| convert_error(descriptor, format!("invalid utf-8: {e}")))?,
        Cell::Date(d) => d.to_string(),
        Cell::DateTime(dt) => dt.to_string(),
        Cell::Timestamp(ts) => ts.to_rfc3339(),
        Cell::Null => return Ok(NullableValue::absent(TargetKind::Text)),
        Cell::Invalid(message) => return Err(convert_error(descriptor, message)),
    };
    Ok(NullableValue::text(text))
}

fn scan_numeric(cell: Cell, descriptor: &ColumnDescriptor) -> Result<NullableValue, ScanError> {
    let numeric = match cell {
        Cell::Integer(i) => Numeric::Integer(i),
        Cell::Float(f) if f.is_finite() => Numeric::Float(f),
        Cell::Float(f) => return Err(convert_error(descriptor, format!("non-finite value {f}"))),
        Cell::Decimal(s) | Cell::Text(s) => Numeric::parse_decimal(&s)
            .ok_or_else(|| convert_error(descriptor, format!("'{s}' is not a number")))?,
        other => {
            return Err(convert_error(
                descriptor,
                format!("cannot read {} as a number", cell_name(&other)),
            ));
        }
    };
    Ok(NullableValue::numeric(numeric))
}

fn scan_temporal(cell: Cell, descriptor: &ColumnDescriptor) -> Result<NullableValue, ScanError> {
    let ts = match cell {
        Cell::Timestamp(ts) => ts,
        Cell::DateTime(dt) => dt.and_utc().fixed_offset(),
        Cell::Date(d) => d.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
        Cell::Text(s) => parse_temporal(&s)
            .ok_or_else(|| convert_error(descriptor, format!("'{s}' is not a date or time")))?,
        other => {
            return Err(convert_error(
                descriptor,
                format!("cannot read {} as a timestamp", cell_name(&other)),
            ));
        }
    };
    Ok(NullableValue::temporal(ts))
}

/// Parse the textual timestamp forms drivers commonly return
fn parse_temporal(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(ts) = DateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

fn cell_name(cell: &Cell) -> &'static str {
    match cell {
        Cell::Null => "null",
        Cell::Integer(_) => "integer",
        Cell::Float(_) => "float",
        Cell::Decimal(_) => "decimal",
        Cell::Text(_) => "text",
        Cell::Bytes(_) => "bytes",
        Cell::Date(_) => "date",
        Cell::DateTime(_) => "datetime",
        Cell::Timestamp(_) => "timestamp",
        Cell::Invalid(_) => "invalid",
    }
}

fn convert_error(descriptor: &ColumnDescriptor, message: String) -> ScanError {
    ScanError::Convert {
        column: descriptor.name.clone(),
        kind: descriptor.kind.as_str(),
        message,
    }
}
