//! Tests for the typed row codec

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::{
    Codec, ColumnDescriptor, Delimiter, FractionStyle, Numeric, NullableValue, QuoteScope,
    TargetKind, TemporalFormat, join_record, quote, unescape,
};

fn ts(offset_secs: i32, nanos: u32) -> DateTime<FixedOffset> {
    let naive = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_nano_opt(14, 5, 7, nanos)
        .unwrap();
    FixedOffset::east_opt(offset_secs)
        .unwrap()
        .from_local_datetime(&naive)
        .unwrap()
}

fn text_col() -> ColumnDescriptor {
    ColumnDescriptor::text("name", "VARCHAR2")
}

fn num_col() -> ColumnDescriptor {
    ColumnDescriptor::numeric("id", "NUMBER")
}

fn temporal_col(format: TemporalFormat) -> ColumnDescriptor {
    ColumnDescriptor::temporal("at", "TIMESTAMP", format)
}

// =============================================================================
// NULL handling
// =============================================================================

#[test]
fn test_absent_is_empty_for_every_kind() {
    let descriptors = [
        text_col(),
        num_col(),
        temporal_col(TemporalFormat::TimestampTz),
    ];
    for codec in [
        Codec::new(Delimiter::Comma),
        Codec::new(Delimiter::Tab).with_quote(false),
        Codec::new(Delimiter::Comma).with_quote_scope(QuoteScope::All),
    ] {
        for desc in &descriptors {
            for kind in [TargetKind::Text, TargetKind::Numeric, TargetKind::Temporal] {
                assert_eq!(codec.decode(&NullableValue::absent(kind), desc), "");
            }
        }
    }
}

// =============================================================================
// Quoting
// =============================================================================

#[test]
fn test_text_quoted_when_enabled() {
    let codec = Codec::new(Delimiter::Comma);
    assert_eq!(codec.decode(&NullableValue::text("a"), &text_col()), "\"a\"");
}

#[test]
fn test_text_unquoted_when_disabled() {
    let codec = Codec::new(Delimiter::Comma).with_quote(false);
    assert_eq!(codec.decode(&NullableValue::text("a\"b"), &text_col()), "a\"b");
}

#[test]
fn test_embedded_quotes_doubled() {
    let codec = Codec::new(Delimiter::Comma);
    assert_eq!(
        codec.decode(&NullableValue::text("say \"hi\""), &text_col()),
        "\"say \"\"hi\"\"\""
    );
}

#[test]
fn test_empty_string_is_quoted() {
    let codec = Codec::new(Delimiter::Comma);
    assert_eq!(codec.decode(&NullableValue::text(""), &text_col()), "\"\"");
}

#[test]
fn test_delimiter_and_newline_are_wrapped() {
    let codec = Codec::new(Delimiter::Comma);
    assert_eq!(
        codec.decode(&NullableValue::text("a,b\nc"), &text_col()),
        "\"a,b\nc\""
    );
}

#[test]
fn test_numeric_not_quoted_by_default_scope() {
    let codec = Codec::new(Delimiter::Comma);
    let value = NullableValue::numeric(Numeric::Integer(7));
    assert_eq!(codec.decode(&value, &num_col()), "7");
}

#[test]
fn test_numeric_quoted_with_all_scope() {
    let codec = Codec::new(Delimiter::Comma).with_quote_scope(QuoteScope::All);
    let value = NullableValue::numeric(Numeric::Integer(7));
    assert_eq!(codec.decode(&value, &num_col()), "\"7\"");
}

#[test]
fn test_temporal_quoted_by_default_scope() {
    let codec = Codec::new(Delimiter::Comma);
    let value = NullableValue::temporal(ts(0, 0));
    assert_eq!(
        codec.decode(&value, &temporal_col(TemporalFormat::Date)),
        "\"2024-03-09\""
    );
}

#[test]
fn test_unescape_inverts_quoting() {
    let codec = Codec::new(Delimiter::Tab);
    for s in ["", "plain", "\"", "\"\"", "a\"b\"c", "tab\there", "line\nbreak", "\"edge"] {
        let encoded = codec.decode(&NullableValue::text(s), &text_col());
        assert_eq!(unescape(&encoded), s);
    }
}

#[test]
fn test_quote_and_unescape_helpers() {
    assert_eq!(quote("x\"y"), "\"x\"\"y\"");
    assert_eq!(unescape("unquoted"), "unquoted");
}

// =============================================================================
// Numeric rendering
// =============================================================================

#[test]
fn test_integer_rendering() {
    let codec = Codec::new(Delimiter::Comma);
    for (value, expected) in [(0i64, "0"), (-42, "-42"), (i64::MAX, "9223372036854775807")] {
        let v = NullableValue::numeric(Numeric::Integer(value));
        assert_eq!(codec.decode(&v, &num_col()), expected);
    }
}

#[test]
fn test_float_rendering_is_minimal_and_plain() {
    let codec = Codec::new(Delimiter::Comma);
    for (value, expected) in [
        (1.0f64, "1"),
        (1.5, "1.5"),
        (0.1, "0.1"),
        (1e20, "100000000000000000000"),
        (1e-7, "0.0000001"),
        (-2.25, "-2.25"),
    ] {
        let v = NullableValue::numeric(Numeric::Float(value));
        assert_eq!(codec.decode(&v, &num_col()), expected);
    }
}

#[test]
fn test_decimal_rendering_is_canonical() {
    let codec = Codec::new(Delimiter::Comma);
    for (value, expected) in [
        ("100", "100"),
        ("1.500", "1.5"),
        ("2.000", "2"),
        ("1,25", "1.25"),
        (".5", "0.5"),
        ("-.5", "-0.5"),
        ("-0.00", "0"),
        ("+12", "12"),
        ("1.5e3", "1500"),
        ("007.10", "7.1"),
        ("1.5e-3", "0.0015"),
        ("12E2", "1200"),
        ("-2.50E+1", "-25"),
        ("0E10", "0"),
    ] {
        let v = NullableValue::numeric(Numeric::Decimal(value.into()));
        assert_eq!(codec.decode(&v, &num_col()), expected, "{value}");
    }
}

#[test]
fn test_decimal_exponent_keeps_every_digit() {
    let codec = Codec::new(Delimiter::Comma);
    let v = NullableValue::numeric(Numeric::Decimal("1.2345678901234567891E+3".into()));
    assert_eq!(codec.decode(&v, &num_col()), "1234.5678901234567891");

    let v = NullableValue::numeric(Numeric::Decimal("98765432109876543210e-25".into()));
    assert_eq!(codec.decode(&v, &num_col()), "0.000009876543210987654321");
}

#[test]
fn test_decimal_absurd_exponent_left_as_is() {
    let codec = Codec::new(Delimiter::Comma);
    let v = NullableValue::numeric(Numeric::Decimal("1e999999".into()));
    assert_eq!(codec.decode(&v, &num_col()), "1e999999");
}

// =============================================================================
// Temporal rendering
// =============================================================================

#[test]
fn test_temporal_formats_fixed_fraction() {
    let codec = Codec::new(Delimiter::Tab).with_quote(false);
    let value = NullableValue::temporal(ts(7200, 120_000_000));

    assert_eq!(
        codec.decode(&value, &temporal_col(TemporalFormat::Date)),
        "2024-03-09"
    );
    assert_eq!(
        codec.decode(&value, &temporal_col(TemporalFormat::DateTime)),
        "2024-03-09 14:05:07"
    );
    assert_eq!(
        codec.decode(&value, &temporal_col(TemporalFormat::Timestamp)),
        "2024-03-09 14:05:07.120000000"
    );
    assert_eq!(
        codec.decode(&value, &temporal_col(TemporalFormat::TimestampTz)),
        "2024-03-09 14:05:07.120000000 +0200"
    );
    assert_eq!(
        codec.decode(&value, &temporal_col(TemporalFormat::TimestampUtc)),
        "2024-03-09 12:05:07.120000000"
    );
}

#[test]
fn test_temporal_trimmed_fraction() {
    let codec = Codec::new(Delimiter::Tab)
        .with_quote(false)
        .with_fraction(FractionStyle::Trimmed);

    let fractional = NullableValue::temporal(ts(-18000, 120_000_000));
    assert_eq!(
        codec.decode(&fractional, &temporal_col(TemporalFormat::TimestampTz)),
        "2024-03-09 14:05:07.12 -0500"
    );

    let whole = NullableValue::temporal(ts(0, 0));
    assert_eq!(
        codec.decode(&whole, &temporal_col(TemporalFormat::Timestamp)),
        "2024-03-09 14:05:07"
    );
}

// =============================================================================
// Rows and delimiters
// =============================================================================

#[test]
fn test_encode_row_and_join() {
    let codec = Codec::new(Delimiter::Comma);
    let descriptors = vec![num_col(), text_col()];
    let values = vec![
        NullableValue::numeric(Numeric::Decimal("1".into())),
        NullableValue::text("a"),
    ];
    let record = codec.encode_row(&values, &descriptors);
    assert_eq!(record, vec!["1".to_string(), "\"a\"".to_string()]);
    assert_eq!(codec.join(&record), "1,\"a\"\n");
}

#[test]
fn test_join_record_tab() {
    let record = vec!["a".to_string(), String::new(), "c".to_string()];
    assert_eq!(join_record(&record, Delimiter::Tab), "a\t\tc\n");
    assert_eq!(join_record(&[], Delimiter::Tab), "\n");
}

#[test]
fn test_delimiter_extension_and_parse() {
    assert_eq!(Delimiter::Comma.extension(), "csv");
    assert_eq!(Delimiter::Tab.extension(), "tsv");
    assert_eq!(Delimiter::from_str("comma").unwrap(), Delimiter::Comma);
    assert_eq!(Delimiter::from_str("TSV").unwrap(), Delimiter::Tab);
    assert!(Delimiter::from_str("pipe").is_err());
}
