//! Tests for dialect type tables

use std::str::FromStr;

use crate::{
    Dialect, FractionStyle, ProtocolError, SourceColumn, TargetKind, TemporalFormat,
};

#[test]
fn test_dialect_from_str() {
    assert_eq!(Dialect::from_str("oracle").unwrap(), Dialect::Oracle);
    assert_eq!(Dialect::from_str("Snowflake").unwrap(), Dialect::Snowflake);
    assert_eq!(Dialect::from_str("SQLITE").unwrap(), Dialect::Sqlite);
    assert!(matches!(
        Dialect::from_str("db2"),
        Err(ProtocolError::UnknownDialect(_))
    ));
}

#[test]
fn test_dialect_deserialize() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        dialect: Dialect,
    }
    let w: Wrapper = toml::from_str("dialect = \"snowflake\"").unwrap();
    assert_eq!(w.dialect, Dialect::Snowflake);
}

#[test]
fn test_oracle_mappings() {
    let table = Dialect::Oracle.type_table();
    assert_eq!(table.lookup("NUMBER"), Some((TargetKind::Numeric, None)));
    assert_eq!(table.lookup("VARCHAR2"), Some((TargetKind::Text, None)));
    assert_eq!(
        table.lookup("DATE"),
        Some((TargetKind::Temporal, Some(TemporalFormat::DateTime)))
    );
    assert_eq!(
        table.lookup("TIMESTAMP WITH TIME ZONE"),
        Some((TargetKind::Temporal, Some(TemporalFormat::TimestampTz)))
    );
    assert_eq!(table.fraction(), FractionStyle::Fixed);
}

#[test]
fn test_snowflake_mappings() {
    let table = Dialect::Snowflake.type_table();
    assert_eq!(table.lookup("FIXED"), Some((TargetKind::Numeric, None)));
    assert_eq!(
        table.lookup("TIMESTAMP_LTZ"),
        Some((TargetKind::Temporal, Some(TemporalFormat::TimestampUtc)))
    );
    assert_eq!(table.fraction(), FractionStyle::Trimmed);
}

#[test]
fn test_lookup_ignores_case_and_precision() {
    let table = Dialect::Oracle.type_table();
    assert_eq!(table.lookup("number(10,2)"), Some((TargetKind::Numeric, None)));
    assert_eq!(
        table.lookup("TIMESTAMP(6) WITH TIME ZONE"),
        Some((TargetKind::Temporal, Some(TemporalFormat::TimestampTz)))
    );
    assert_eq!(table.lookup("  varchar2 (40) "), Some((TargetKind::Text, None)));
}

#[test]
fn test_describe_builds_descriptors_in_order() {
    let columns = vec![
        SourceColumn::new("id", "NUMBER"),
        SourceColumn::new("name", "VARCHAR2(100)"),
        SourceColumn::new("created", "TIMESTAMP"),
    ];
    let descriptors = Dialect::Oracle.type_table().describe(&columns).unwrap();

    assert_eq!(descriptors.len(), 3);
    assert_eq!(descriptors[0].name, "id");
    assert_eq!(descriptors[0].kind, TargetKind::Numeric);
    assert_eq!(descriptors[1].source_type, "VARCHAR2");
    assert_eq!(descriptors[2].temporal, Some(TemporalFormat::Timestamp));
}

#[test]
fn test_describe_fails_on_unmapped_type() {
    let columns = vec![
        SourceColumn::new("id", "NUMBER"),
        SourceColumn::new("doc", "BLOB"),
    ];
    let err = Dialect::Oracle.type_table().describe(&columns).unwrap_err();
    match err {
        ProtocolError::UnmappedType { column, type_name, dialect } => {
            assert_eq!(column, "doc");
            assert_eq!(type_name, "BLOB");
            assert_eq!(dialect, "oracle");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_describe_empty_result_set() {
    assert!(Dialect::Sqlite.type_table().describe(&[]).unwrap().is_empty());
}

// =============================================================================
// SQLite affinity
// =============================================================================

#[test]
fn test_sqlite_declared_types_follow_affinity() {
    let table = Dialect::Sqlite.type_table();
    let numeric = Some((TargetKind::Numeric, None));
    let text = Some((TargetKind::Text, None));

    assert_eq!(table.lookup("DOUBLE"), numeric);
    assert_eq!(table.lookup("double precision"), numeric);
    assert_eq!(table.lookup("FLOAT"), numeric);
    assert_eq!(table.lookup("DECIMAL(10,2)"), numeric);
    assert_eq!(table.lookup("SMALLINT"), numeric);
    assert_eq!(table.lookup("BIGINT UNSIGNED"), numeric);
    assert_eq!(table.lookup("CHAR(10)"), text);
    assert_eq!(table.lookup("CHARACTER(20)"), text);
    assert_eq!(table.lookup("NVARCHAR(20)"), text);
    assert_eq!(table.lookup("clob"), text);
}

#[test]
fn test_sqlite_temporal_declared_types() {
    let table = Dialect::Sqlite.type_table();
    assert_eq!(
        table.lookup("TIMESTAMP"),
        Some((TargetKind::Temporal, Some(TemporalFormat::Timestamp)))
    );
    assert_eq!(
        table.lookup("TIMESTAMP(3)"),
        Some((TargetKind::Temporal, Some(TemporalFormat::Timestamp)))
    );
    assert_eq!(
        table.lookup("DATE"),
        Some((TargetKind::Temporal, Some(TemporalFormat::Date)))
    );
}

#[test]
fn test_sqlite_describe_never_rejects_a_type() {
    let columns = vec![
        SourceColumn::new("price", "DOUBLE"),
        SourceColumn::new("code", "CHAR(3)"),
        SourceColumn::new("flag", "WHATEVER"),
    ];
    let descriptors = Dialect::Sqlite.type_table().describe(&columns).unwrap();

    assert_eq!(descriptors[0].kind, TargetKind::Numeric);
    assert_eq!(descriptors[1].kind, TargetKind::Text);
    assert_eq!(descriptors[2].kind, TargetKind::Numeric);
}

#[test]
fn test_oracle_has_no_fallback() {
    assert_eq!(Dialect::Oracle.type_table().lookup("DOUBLE"), None);
    assert_eq!(Dialect::Snowflake.type_table().lookup("BLOB"), None);
}
