//! Tests for the in-memory source

use futures_util::StreamExt;

use super::*;

async fn collect_rows(conn: &mut MemoryConnection, params: &[i64]) -> Vec<Vec<Cell>> {
    let result = conn.query("SELECT * FROM t", params).await.unwrap();
    result
        .rows
        .map(|row| row.unwrap())
        .collect::<Vec<_>>()
        .await
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn test_whole_table_query_returns_all_rows() {
    let connector = MemoryConnector::new(MemoryTable::sequential(5));
    let mut conn = connector.connect(0).await.unwrap();

    let rows = collect_rows(&mut conn, &[]).await;
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][0], Cell::Integer(1));
    assert_eq!(rows[4][1], Cell::Text("row-5".into()));
}

#[tokio::test]
async fn test_range_query_filters_inclusive() {
    let connector = MemoryConnector::new(MemoryTable::sequential(25));
    let mut conn = connector.connect(1).await.unwrap();

    let rows = collect_rows(&mut conn, &[11, 20]).await;
    let keys: Vec<_> = rows.iter().map(|r| r[0].clone()).collect();
    assert_eq!(keys.first(), Some(&Cell::Integer(11)));
    assert_eq!(keys.last(), Some(&Cell::Integer(20)));
    assert_eq!(keys.len(), 10);
}

#[tokio::test]
async fn test_query_reports_columns() {
    let connector = MemoryConnector::new(MemoryTable::sequential(1));
    let mut conn = connector.connect(0).await.unwrap();

    let result = conn.query("SELECT 1", &[]).await.unwrap();
    assert_eq!(result.columns.len(), 2);
    assert_eq!(result.columns[0].type_name, "INTEGER");
}

#[tokio::test]
async fn test_bad_param_count_is_query_error() {
    let connector = MemoryConnector::new(MemoryTable::sequential(1));
    let mut conn = connector.connect(0).await.unwrap();

    let result = conn.query("SELECT 1", &[1]).await;
    assert!(matches!(result, Err(SourceError::Query(_))));
}

#[tokio::test]
async fn test_queries_are_logged() {
    let connector = MemoryConnector::new(MemoryTable::sequential(3));
    let log = connector.log();
    let mut conn = connector.connect(2).await.unwrap();

    let _ = collect_rows(&mut conn, &[1, 2]).await;
    assert_eq!(log.connects(), 1);
    assert_eq!(log.queries(), vec![(2, vec![1, 2])]);
}

// =============================================================================
// Injected failures
// =============================================================================

#[tokio::test]
async fn test_connect_failure_for_one_worker() {
    let connector = MemoryConnector::new(MemoryTable::sequential(3)).fail_connect(1);

    assert!(connector.connect(0).await.is_ok());
    let err = connector.connect(1).await.err().unwrap();
    assert!(err.is_connect());
    assert!(err.to_string().contains("worker 1"));
}

#[tokio::test]
async fn test_execute_failure() {
    let connector = MemoryConnector::new(MemoryTable::sequential(1)).fail_execute("bad");
    let log = connector.log();
    let mut conn = connector.connect(0).await.unwrap();

    conn.execute("good").await.unwrap();
    let err = conn.execute("bad").await.unwrap_err();
    assert!(matches!(err, SourceError::Session { .. }));
    assert_eq!(log.statements(), vec![(0, "good".to_string())]);
}

#[tokio::test]
async fn test_query_failure_at_range() {
    let connector = MemoryConnector::new(MemoryTable::sequential(30)).fail_query_at(11);
    let mut conn = connector.connect(0).await.unwrap();

    assert!(conn.query("q", &[1, 10]).await.is_ok());
    assert!(matches!(
        conn.query("q", &[11, 20]).await,
        Err(SourceError::Query(_))
    ));
}

#[tokio::test]
async fn test_cursor_failure_after_rows() {
    let connector = MemoryConnector::new(MemoryTable::sequential(10)).fail_cursor_after(3);
    let mut conn = connector.connect(0).await.unwrap();

    let result = conn.query("q", &[]).await.unwrap();
    let items: Vec<_> = result.rows.collect().await;
    assert_eq!(items.len(), 4);
    assert!(items[..3].iter().all(|r| r.is_ok()));
    assert!(matches!(items[3], Err(SourceError::Cursor { rows: 3, .. })));
}
