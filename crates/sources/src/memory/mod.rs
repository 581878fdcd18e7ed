//! In-memory source
//!
//! A deterministic table served from memory, used by the test suites and by
//! `unload` when pointed at a `memory:` url. Ranged queries filter on the
//! first column (`key BETWEEN ?1 AND ?2`); the SQL text itself is ignored.
//!
//! Failures can be injected per worker (connect), per statement (session
//! init), per range (query) and mid-cursor.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::StreamExt;
use futures_util::stream;
use parking_lot::Mutex;
use unload_protocol::SourceColumn;

use crate::cell::Cell;
use crate::error::{Result, SourceError};
use crate::traits::{Connection, Connector, QueryResult};

/// Rows and column metadata served by a [`MemoryConnector`]
#[derive(Debug, Clone)]
pub struct MemoryTable {
    columns: Vec<SourceColumn>,
    rows: Vec<Vec<Cell>>,
}

impl MemoryTable {
    /// Empty table; the first column is the partition key
    pub fn new(columns: Vec<SourceColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// `id INTEGER, name TEXT` with ids `1..=count` and names `row-{id}`
    pub fn sequential(count: i64) -> Self {
        let columns = vec![
            SourceColumn::new("id", "INTEGER"),
            SourceColumn::new("name", "TEXT"),
        ];
        Self::new(columns).with_rows(
            (1..=count).map(|id| vec![Cell::Integer(id), Cell::Text(format!("row-{id}"))]),
        )
    }

    #[must_use]
    pub fn with_rows(mut self, rows: impl IntoIterator<Item = Vec<Cell>>) -> Self {
        self.rows.extend(rows);
        self
    }

    fn select(&self, params: &[i64]) -> Result<Vec<Vec<Cell>>> {
        match params {
            [] => Ok(self.rows.clone()),
            [first, last] => Ok(self
                .rows
                .iter()
                .filter(|row| match row.first() {
                    Some(Cell::Integer(key)) => (*first..=*last).contains(key),
                    _ => false,
                })
                .cloned()
                .collect()),
            other => Err(SourceError::Query(format!(
                "expected 0 or 2 parameters, got {}",
                other.len()
            ))),
        }
    }
}

/// What connections did, for assertions
#[derive(Debug, Default)]
pub struct MemoryLog {
    connects: AtomicUsize,
    statements: Mutex<Vec<(usize, String)>>,
    queries: Mutex<Vec<(usize, Vec<i64>)>>,
}

impl MemoryLog {
    /// Successful connects
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::Relaxed)
    }

    /// `(worker_id, statement)` for every executed statement
    pub fn statements(&self) -> Vec<(usize, String)> {
        self.statements.lock().clone()
    }

    /// `(worker_id, params)` for every started query
    pub fn queries(&self) -> Vec<(usize, Vec<i64>)> {
        self.queries.lock().clone()
    }
}

#[derive(Debug, Clone, Default)]
struct Faults {
    connect: HashSet<usize>,
    execute: HashSet<String>,
    query_at: HashSet<i64>,
    cursor_after: Option<usize>,
}

/// Connector serving a [`MemoryTable`]
#[derive(Clone)]
pub struct MemoryConnector {
    table: Arc<MemoryTable>,
    faults: Arc<Faults>,
    log: Arc<MemoryLog>,
}

impl MemoryConnector {
    pub fn new(table: MemoryTable) -> Self {
        Self {
            table: Arc::new(table),
            faults: Arc::new(Faults::default()),
            log: Arc::new(MemoryLog::default()),
        }
    }

    /// Make `connect` fail for this worker
    #[must_use]
    pub fn fail_connect(mut self, worker_id: usize) -> Self {
        Arc::make_mut(&mut self.faults).connect.insert(worker_id);
        self
    }

    /// Make `execute` fail for this exact statement
    #[must_use]
    pub fn fail_execute(mut self, statement: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.faults)
            .execute
            .insert(statement.into());
        self
    }

    /// Make the ranged query starting at `first` fail
    #[must_use]
    pub fn fail_query_at(mut self, first: i64) -> Self {
        Arc::make_mut(&mut self.faults).query_at.insert(first);
        self
    }

    /// Make every cursor fail after yielding `rows` rows
    #[must_use]
    pub fn fail_cursor_after(mut self, rows: usize) -> Self {
        Arc::make_mut(&mut self.faults).cursor_after = Some(rows);
        self
    }

    /// Shared log of connects, statements and queries
    pub fn log(&self) -> Arc<MemoryLog> {
        Arc::clone(&self.log)
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryConnection;

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn connect(&self, worker_id: usize) -> Result<MemoryConnection> {
        if self.faults.connect.contains(&worker_id) {
            return Err(SourceError::connect(worker_id, "connection refused"));
        }
        self.log.connects.fetch_add(1, Ordering::Relaxed);
        Ok(MemoryConnection {
            worker_id,
            table: Arc::clone(&self.table),
            faults: Arc::clone(&self.faults),
            log: Arc::clone(&self.log),
        })
    }
}

/// Connection handed to one worker by [`MemoryConnector`]
pub struct MemoryConnection {
    worker_id: usize,
    table: Arc<MemoryTable>,
    faults: Arc<Faults>,
    log: Arc<MemoryLog>,
}

impl Connection for MemoryConnection {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        if self.faults.execute.contains(sql) {
            return Err(SourceError::session(sql, "statement rejected"));
        }
        self.log
            .statements
            .lock()
            .push((self.worker_id, sql.to_string()));
        Ok(())
    }

    async fn query<'c>(&'c mut self, _sql: &'c str, params: &'c [i64]) -> Result<QueryResult<'c>> {
        self.log.queries.lock().push((self.worker_id, params.to_vec()));

        if let Some(first) = params.first()
            && self.faults.query_at.contains(first)
        {
            return Err(SourceError::Query(format!(
                "injected failure for range starting at {first}"
            )));
        }

        let rows = self.table.select(params)?;
        let mut items: Vec<Result<Vec<Cell>>> = rows.into_iter().map(Ok).collect();
        if let Some(after) = self.faults.cursor_after
            && after < items.len()
        {
            items.truncate(after);
            items.push(Err(SourceError::Cursor {
                rows: after as u64,
                message: "injected cursor failure".into(),
            }));
        }

        Ok(QueryResult {
            columns: self.table.columns.clone(),
            rows: stream::iter(items).boxed(),
        })
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
