//! Tests for the SQLite source

use futures_util::StreamExt;
use tempfile::TempDir;

use super::*;

async fn seeded(dir: &TempDir) -> SqliteConnector {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let connector = SqliteConnector::new(&url).unwrap();

    let mut conn = connector.connect(0).await.unwrap();
    conn.execute("CREATE TABLE orders (id INTEGER PRIMARY KEY, name TEXT, amount REAL, placed DATE)")
        .await
        .unwrap();
    for id in 1..=25 {
        let sql = format!(
            "INSERT INTO orders VALUES ({id}, 'order-{id}', {id}.5, '2024-01-{:02}')",
            (id % 28) + 1
        );
        conn.execute(&sql).await.unwrap();
    }
    conn.execute("INSERT INTO orders (id, name) VALUES (26, NULL)")
        .await
        .unwrap();
    conn.close().await.unwrap();
    connector
}

#[test]
fn test_accepts_sqlite_urls() {
    assert!(SqliteConnector::accepts("sqlite://data.db"));
    assert!(SqliteConnector::accepts("sqlite::memory:"));
    assert!(!SqliteConnector::accepts("oracle://db"));
}

#[tokio::test]
async fn test_range_query_binds_params() {
    let dir = TempDir::new().unwrap();
    let connector = seeded(&dir).await;
    let mut conn = connector.connect(1).await.unwrap();

    let result = conn
        .query("SELECT id, name FROM orders WHERE id BETWEEN ?1 AND ?2 ORDER BY id", &[11, 20])
        .await
        .unwrap();
    assert_eq!(result.columns.len(), 2);
    assert_eq!(result.columns[0].name, "id");
    assert_eq!(result.columns[0].type_name, "INTEGER");
    assert_eq!(result.columns[1].type_name, "TEXT");

    let rows: Vec<_> = result.rows.map(|r| r.unwrap()).collect().await;
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], vec![Cell::Integer(11), Cell::Text("order-11".into())]);
}

#[tokio::test]
async fn test_cells_by_storage_class() {
    let dir = TempDir::new().unwrap();
    let connector = seeded(&dir).await;
    let mut conn = connector.connect(0).await.unwrap();

    let result = conn
        .query("SELECT id, name, amount, placed FROM orders WHERE id >= ?1 AND id <= ?2 ORDER BY id", &[25, 26])
        .await
        .unwrap();
    let rows: Vec<_> = result.rows.map(|r| r.unwrap()).collect().await;

    assert_eq!(rows[0][2], Cell::Float(25.5));
    assert_eq!(rows[0][3], Cell::Text("2024-01-26".into()));
    assert_eq!(rows[1][1], Cell::Null);
    assert_eq!(rows[1][2], Cell::Null);
}

#[tokio::test]
async fn test_empty_result_has_no_columns() {
    let dir = TempDir::new().unwrap();
    let connector = seeded(&dir).await;
    let mut conn = connector.connect(0).await.unwrap();

    let result = conn
        .query("SELECT id FROM orders WHERE id BETWEEN ?1 AND ?2", &[100, 200])
        .await
        .unwrap();
    assert!(result.columns.is_empty());
    assert_eq!(result.rows.count().await, 0);
}

#[tokio::test]
async fn test_bad_sql_is_query_error() {
    let dir = TempDir::new().unwrap();
    let connector = seeded(&dir).await;
    let mut conn = connector.connect(0).await.unwrap();

    let result = conn.query("SELECT nope FROM missing", &[]).await;
    assert!(matches!(result, Err(SourceError::Query(_))));
}

#[tokio::test]
async fn test_connect_failure_reports_worker() {
    let connector = SqliteConnector::new("sqlite:///nonexistent/dir/test.db").unwrap();
    let err = connector.connect(3).await.err().unwrap();
    assert!(matches!(err, SourceError::Connect { worker_id: 3, .. }));
}

#[tokio::test]
async fn test_failed_statement_is_session_error() {
    let dir = TempDir::new().unwrap();
    let connector = seeded(&dir).await;
    let mut conn = connector.connect(0).await.unwrap();

    let err = conn.execute("CREATE TABLE (").await.unwrap_err();
    assert!(matches!(err, SourceError::Session { .. }));
}

async fn with_bad_text(dir: &TempDir) -> SqliteConnector {
    let connector = seeded(dir).await;
    let mut conn = connector.connect(0).await.unwrap();
    conn.execute("INSERT INTO orders (id, name) VALUES (27, CAST(x'ff' AS TEXT))")
        .await
        .unwrap();
    conn.execute("INSERT INTO orders (id, name) VALUES (28, 'after')")
        .await
        .unwrap();
    conn.close().await.unwrap();
    connector
}

#[tokio::test]
async fn test_undecodable_cell_keeps_cursor_alive() {
    let dir = TempDir::new().unwrap();
    let connector = with_bad_text(&dir).await;
    let mut conn = connector.connect(0).await.unwrap();

    let result = conn
        .query("SELECT id, name FROM orders WHERE id BETWEEN ?1 AND ?2 ORDER BY id", &[27, 28])
        .await
        .unwrap();
    let rows: Vec<_> = result.rows.map(|r| r.unwrap()).collect().await;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], Cell::Integer(27));
    assert!(matches!(rows[0][1], Cell::Invalid(_)));
    assert_eq!(rows[1], vec![Cell::Integer(28), Cell::Text("after".into())]);
}

#[tokio::test]
async fn test_undecodable_cell_is_substituted_by_producer() {
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use unload_protocol::{Codec, Delimiter, Dialect};

    use crate::{Producer, SourceMetrics};

    let dir = TempDir::new().unwrap();
    let connector = with_bad_text(&dir).await;
    let mut conn = connector.connect(0).await.unwrap();
    let producer = Producer::new(
        0,
        Dialect::Sqlite.type_table(),
        Codec::new(Delimiter::Comma),
        Arc::new(SourceMetrics::default()),
    );

    let (tx, mut rx) = mpsc::channel(8);
    let stats = producer
        .produce(
            &mut conn,
            "SELECT id, name FROM orders WHERE id >= ?1 AND id <= ?2 ORDER BY id",
            &[26, 28],
            &tx,
        )
        .await
        .unwrap();
    drop(tx);

    let mut records = Vec::new();
    while let Some(record) = rx.recv().await {
        records.push(record);
    }
    assert_eq!(stats.rows, 3);
    assert_eq!(stats.substituted, 1);
    assert_eq!(
        records,
        vec![
            vec!["26".to_string(), String::new()],
            vec![String::new(), String::new()],
            vec!["28".to_string(), "\"after\"".to_string()],
        ]
    );
}
