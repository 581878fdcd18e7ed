//! SQLite source (feature `sqlite`)
//!
//! Uses `sqlx` with one `SqliteConnection` per worker. Range parameters bind
//! positionally, so ranged queries are written as
//! `SELECT ... WHERE id BETWEEN ?1 AND ?2`.
//!
//! SQLite reports column types per row, so the column list is taken from the
//! first row and an empty result has no columns.

use std::str::FromStr;

use futures_util::{StreamExt, future, stream};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Row, TypeInfo, ValueRef};
use unload_protocol::SourceColumn;

use crate::cell::Cell;
use crate::error::{Result, SourceError};
use crate::traits::{Connection, Connector, QueryResult};

/// Connector for `sqlite:` urls
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    options: SqliteConnectOptions,
}

impl SqliteConnector {
    /// Parse a `sqlite:` url
    pub fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| SourceError::UnsupportedUrl(format!("{url}: {e}")))?;
        Ok(Self { options })
    }

    /// Whether `url` names a SQLite database
    pub fn accepts(url: &str) -> bool {
        url.starts_with("sqlite:")
    }
}

impl Connector for SqliteConnector {
    type Connection = SqliteSourceConnection;

    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn connect(&self, worker_id: usize) -> Result<SqliteSourceConnection> {
        let conn = self
            .options
            .connect()
            .await
            .map_err(|e| SourceError::connect(worker_id, e.to_string()))?;
        tracing::debug!(worker = worker_id, "sqlite connection opened");
        Ok(SqliteSourceConnection { conn })
    }
}

/// One worker's SQLite connection
pub struct SqliteSourceConnection {
    conn: SqliteConnection,
}

impl Connection for SqliteSourceConnection {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        sqlx::query(sql)
            .execute(&mut self.conn)
            .await
            .map_err(|e| SourceError::session(sql, e))?;
        Ok(())
    }

    async fn query<'c>(&'c mut self, sql: &'c str, params: &'c [i64]) -> Result<QueryResult<'c>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        let mut rows = query.fetch(&mut self.conn);
        let first = match rows.next().await {
            None => {
                return Ok(QueryResult {
                    columns: Vec::new(),
                    rows: stream::empty().boxed(),
                });
            }
            Some(Err(e)) => return Err(SourceError::Query(e.to_string())),
            Some(Ok(row)) => row,
        };

        let columns = first
            .columns()
            .iter()
            .map(|c| SourceColumn::new(c.name(), c.type_info().name()))
            .collect();

        let rows = stream::once(future::ready(Ok(first)))
            .chain(rows)
            .map(|row| {
                row.map(|row| row_cells(&row))
                    .map_err(|e| SourceError::Query(e.to_string()))
            })
            .boxed();

        Ok(QueryResult { columns, rows })
    }

    async fn close(self) -> Result<()> {
        sqlx::Connection::close(self.conn)
            .await
            .map_err(|e| SourceError::Query(e.to_string()))
    }
}

/// Read every column of a row by its storage class
///
/// A cell that fails to decode becomes [`Cell::Invalid`], so one bad value
/// costs one row rather than the cursor.
fn row_cells(row: &SqliteRow) -> Vec<Cell> {
    (0..row.len())
        .map(|i| read_cell(row, i).unwrap_or_else(|e| Cell::Invalid(e.to_string())))
        .collect()
}

fn read_cell(row: &SqliteRow, index: usize) -> std::result::Result<Cell, sqlx::Error> {
    let storage = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Cell::Null);
        }
        raw.type_info().name().to_ascii_uppercase()
    };

    let cell = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => Cell::Integer(row.try_get_unchecked(index)?),
        "REAL" => Cell::Float(row.try_get_unchecked(index)?),
        "BLOB" => Cell::Bytes(row.try_get_unchecked(index)?),
        _ => Cell::Text(row.try_get_unchecked(index)?),
    };
    Ok(cell)
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod sqlite_test;
