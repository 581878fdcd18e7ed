//! Tests for protocol errors

use crate::ProtocolError;

#[test]
fn test_invalid_range_display() {
    let err = ProtocolError::invalid_range(10, 5);
    let msg = err.to_string();
    assert!(msg.contains("10"));
    assert!(msg.contains("5"));
}

#[test]
fn test_unmapped_type_display() {
    let err = ProtocolError::unmapped_type("payload", "BLOB", "oracle");
    let msg = err.to_string();
    assert!(msg.contains("BLOB"));
    assert!(msg.contains("payload"));
    assert!(msg.contains("oracle"));
}

#[test]
fn test_invalid_batch_size_display() {
    assert!(ProtocolError::InvalidBatchSize.to_string().contains("batch size"));
}

#[test]
fn test_unknown_dialect_display() {
    let err = ProtocolError::UnknownDialect("db2".into());
    assert!(err.to_string().contains("db2"));
}
