//! TypedRow codec
//!
//! Renders `NullableValue`s as canonical display strings and applies CSV
//! quoting. Formatting rules are fixed by the column descriptor and the
//! dialect's fraction style, never inspected per value.
//!
//! # Rules
//!
//! - NULL renders as the empty string, unquoted, for every kind
//! - Numbers use `.` as separator, no exponent, no superfluous zeros
//! - Quoting wraps in `"` and doubles embedded quotes (`"` -> `""`)

use std::fmt::Write as FmtWrite;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Deserialize;

use crate::{
    ColumnDescriptor, FractionStyle, Numeric, NullableValue, ProtocolError, RawValue, Result,
    TargetKind, TemporalFormat,
};

/// One encoded output row: a field per column, already quoted
pub type Record = Vec<String>;

const QUOTE: char = '"';

/// Field delimiter; also fixes the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    #[default]
    Tab,
}

impl Delimiter {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Tab => "\t",
        }
    }

    /// File extension without the dot
    #[inline]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Comma => "csv",
            Self::Tab => "tsv",
        }
    }
}

impl FromStr for Delimiter {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "comma" | "csv" | "," => Ok(Self::Comma),
            "tab" | "tsv" | "\t" => Ok(Self::Tab),
            other => Err(ProtocolError::UnknownDelimiter(other.to_string())),
        }
    }
}

/// Which kinds are quoted when quoting is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteScope {
    /// Text and temporal values
    #[default]
    TextAndTemporal,
    /// Every present value, numbers included
    All,
}

impl QuoteScope {
    #[inline]
    fn covers(&self, kind: TargetKind) -> bool {
        match self {
            Self::TextAndTemporal => matches!(kind, TargetKind::Text | TargetKind::Temporal),
            Self::All => true,
        }
    }
}

/// Canonical row codec
///
/// # Example
///
/// ```
/// use unload_protocol::{Codec, ColumnDescriptor, Delimiter, NullableValue};
///
/// let codec = Codec::new(Delimiter::Comma);
/// let desc = ColumnDescriptor::text("name", "VARCHAR2");
/// assert_eq!(codec.decode(&NullableValue::text("a\"b"), &desc), "\"a\"\"b\"");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    delimiter: Delimiter,
    quote: bool,
    scope: QuoteScope,
    fraction: FractionStyle,
}

impl Codec {
    /// Create a codec with quoting on for text and temporal values
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            quote: true,
            scope: QuoteScope::default(),
            fraction: FractionStyle::default(),
        }
    }

    /// Enable or disable quoting
    #[must_use]
    pub fn with_quote(mut self, quote: bool) -> Self {
        self.quote = quote;
        self
    }

    /// Set the quoting scope
    #[must_use]
    pub fn with_quote_scope(mut self, scope: QuoteScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the fractional seconds style
    #[must_use]
    pub fn with_fraction(mut self, fraction: FractionStyle) -> Self {
        self.fraction = fraction;
        self
    }

    #[inline]
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Render one value according to its descriptor
    pub fn decode(&self, value: &NullableValue, descriptor: &ColumnDescriptor) -> String {
        let Some(raw) = value.raw() else {
            return String::new();
        };

        let text = match raw {
            RawValue::Text(s) => s.clone(),
            RawValue::Numeric(n) => render_numeric(n),
            RawValue::Temporal(ts) => render_temporal(
                ts,
                descriptor.temporal.unwrap_or(TemporalFormat::Timestamp),
                self.fraction,
            ),
        };

        if self.quote && self.scope.covers(descriptor.kind) {
            quote(&text)
        } else {
            text
        }
    }

    /// Render a full row
    ///
    /// `values` and `descriptors` are aligned by position.
    pub fn encode_row(&self, values: &[NullableValue], descriptors: &[ColumnDescriptor]) -> Record {
        values
            .iter()
            .zip(descriptors)
            .map(|(value, descriptor)| self.decode(value, descriptor))
            .collect()
    }

    /// Join a record with the delimiter and terminate it with `\n`
    pub fn join(&self, record: &[String]) -> String {
        join_record(record, self.delimiter)
    }
}

/// Join fields with a delimiter and append the record terminator
pub fn join_record(record: &[String], delimiter: Delimiter) -> String {
    let capacity = record.iter().map(|f| f.len() + 1).sum::<usize>() + 1;
    let mut line = String::with_capacity(capacity);
    for (i, field) in record.iter().enumerate() {
        if i > 0 {
            line.push_str(delimiter.as_str());
        }
        line.push_str(field);
    }
    line.push('\n');
    line
}

/// Wrap in quotes, doubling embedded quotes
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(QUOTE);
    for ch in text.chars() {
        if ch == QUOTE {
            out.push(QUOTE);
        }
        out.push(ch);
    }
    out.push(QUOTE);
    out
}

/// Inverse of `quote`; unquoted input is returned as is
pub fn unescape(field: &str) -> String {
    match field
        .strip_prefix(QUOTE)
        .and_then(|inner| inner.strip_suffix(QUOTE))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => field.to_string(),
    }
}

fn render_numeric(value: &Numeric) -> String {
    match value {
        Numeric::Integer(i) => i.to_string(),
        // f64 Display is shortest round-trip and never uses an exponent
        Numeric::Float(f) => f.to_string(),
        Numeric::Decimal(s) => canonical_decimal(s),
    }
}

/// Exponents beyond this are rendered as received
const MAX_DECIMAL_EXPONENT: i64 = 4096;

/// Normalize a decimal literal: `.` separator, leading zero, no trailing zeros
///
/// Exponent forms are expanded by shifting the decimal point on the digit
/// string, so no precision is lost to a float conversion.
fn canonical_decimal(text: &str) -> String {
    let text = text.trim().replace(',', ".");
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text.as_str())),
    };
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exp)) => match exp.parse::<i64>() {
            Ok(exp) if exp.abs() <= MAX_DECIMAL_EXPONENT => (mantissa, exp),
            _ => return text.clone(),
        },
        None => (unsigned, 0),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let digits = format!("{int}{frac}");
    let point = int.len() as i64 + exponent;
    let (int, frac) = if point <= 0 {
        let zeros = "0".repeat(point.unsigned_abs() as usize);
        (String::new(), format!("{zeros}{digits}"))
    } else if point as usize >= digits.len() {
        let zeros = "0".repeat(point as usize - digits.len());
        (format!("{digits}{zeros}"), String::new())
    } else {
        let (int, frac) = digits.split_at(point as usize);
        (int.to_string(), frac.to_string())
    };

    let int = int.trim_start_matches('0');
    let frac = frac.trim_end_matches('0');
    if int.is_empty() && frac.is_empty() {
        return "0".to_string();
    }

    let mut out = String::with_capacity(int.len() + frac.len() + 3);
    if negative {
        out.push('-');
    }
    out.push_str(if int.is_empty() { "0" } else { int });
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn render_temporal(
    value: &DateTime<FixedOffset>,
    format: TemporalFormat,
    fraction: FractionStyle,
) -> String {
    match format {
        TemporalFormat::Date => value.format("%Y-%m-%d").to_string(),
        TemporalFormat::DateTime => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        TemporalFormat::Timestamp => {
            let mut out = value.format("%Y-%m-%d %H:%M:%S").to_string();
            push_fraction(&mut out, value.nanosecond(), fraction);
            out
        }
        TemporalFormat::TimestampTz => {
            let mut out = value.format("%Y-%m-%d %H:%M:%S").to_string();
            push_fraction(&mut out, value.nanosecond(), fraction);
            let _ = write!(out, " {}", value.format("%z"));
            out
        }
        TemporalFormat::TimestampUtc => {
            let utc = value.with_timezone(&Utc);
            let mut out = utc.format("%Y-%m-%d %H:%M:%S").to_string();
            push_fraction(&mut out, utc.nanosecond(), fraction);
            out
        }
    }
}

fn push_fraction(out: &mut String, nanos: u32, style: FractionStyle) {
    // Leap seconds are reported as nanos >= 1e9
    let nanos = nanos % 1_000_000_000;
    let digits = format!("{nanos:09}");
    match style {
        FractionStyle::Fixed => {
            out.push('.');
            out.push_str(&digits);
        }
        FractionStyle::Trimmed => {
            let trimmed = digits.trim_end_matches('0');
            if !trimmed.is_empty() {
                out.push('.');
                out.push_str(trimmed);
            }
        }
    }
}
