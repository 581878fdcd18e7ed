//! Typed, nullable cell values
//!
//! A `NullableValue` is the closed tagged union that replaces runtime type
//! inspection of scanned cells: the kind comes from the column descriptor,
//! and `raw` is `None` when the database returned NULL.

use chrono::{DateTime, FixedOffset};

/// Target kind a source column is mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Character data
    Text,
    /// Integer, floating point or fixed-point decimal
    Numeric,
    /// Date or timestamp
    Temporal,
}

impl TargetKind {
    /// Lowercase name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Temporal => "temporal",
        }
    }
}

/// Numeric payload
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    /// Exact integer
    Integer(i64),
    /// Binary floating point
    Float(f64),
    /// Fixed-point decimal as delivered by the driver (e.g. Oracle NUMBER)
    Decimal(String),
}

impl Numeric {
    /// Parse a decimal literal delivered as text
    ///
    /// Accepts an optional sign, digits, one decimal separator (`.` or `,`)
    /// and an optional exponent. Returns `None` for anything else.
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let unsigned = trimmed
            .strip_prefix('-')
            .or_else(|| trimmed.strip_prefix('+'))
            .unwrap_or(trimmed);
        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
            None => (unsigned, None),
        };

        let mut digits = 0usize;
        let mut separators = 0usize;
        for ch in mantissa.chars() {
            match ch {
                '0'..='9' => digits += 1,
                '.' | ',' => separators += 1,
                _ => return None,
            }
        }
        if digits == 0 || separators > 1 {
            return None;
        }
        if let Some(exp) = exponent {
            let exp = exp.strip_prefix(['-', '+']).unwrap_or(exp);
            if exp.is_empty() || !exp.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
        }
        Some(Self::Decimal(trimmed.to_string()))
    }
}

/// Present cell payload
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Numeric(Numeric),
    Temporal(DateTime<FixedOffset>),
}

/// A typed cell that may be NULL
///
/// Constructed per fetched row, consumed immediately by the codec.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableValue {
    kind: TargetKind,
    raw: Option<RawValue>,
}

impl NullableValue {
    /// NULL of the given kind
    #[inline]
    pub fn absent(kind: TargetKind) -> Self {
        Self { kind, raw: None }
    }

    /// Present text value
    #[inline]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Text,
            raw: Some(RawValue::Text(value.into())),
        }
    }

    /// Present numeric value
    #[inline]
    pub fn numeric(value: Numeric) -> Self {
        Self {
            kind: TargetKind::Numeric,
            raw: Some(RawValue::Numeric(value)),
        }
    }

    /// Present temporal value
    #[inline]
    pub fn temporal(value: DateTime<FixedOffset>) -> Self {
        Self {
            kind: TargetKind::Temporal,
            raw: Some(RawValue::Temporal(value)),
        }
    }

    #[inline]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.raw.is_some()
    }

    #[inline]
    pub fn raw(&self) -> Option<&RawValue> {
        self.raw.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_keeps_kind() {
        let value = NullableValue::absent(TargetKind::Temporal);
        assert_eq!(value.kind(), TargetKind::Temporal);
        assert!(!value.is_present());
        assert!(value.raw().is_none());
    }

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(NullableValue::text("a").kind(), TargetKind::Text);
        assert_eq!(
            NullableValue::numeric(Numeric::Integer(1)).kind(),
            TargetKind::Numeric
        );
    }

    #[test]
    fn test_parse_decimal_accepts_numbers() {
        for s in ["0", "-12", "+3", "1.50", "1,5", ".5", "1e10", "2.5E-3", " 42 "] {
            assert!(Numeric::parse_decimal(s).is_some(), "{s}");
        }
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        for s in ["", "-", "abc", "1.2.3", "1e", "12x", "1e+"] {
            assert!(Numeric::parse_decimal(s).is_none(), "{s}");
        }
    }
}
