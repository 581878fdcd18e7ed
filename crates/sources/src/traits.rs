//! Connector and connection traits
//!
//! The seam between the pipeline and a concrete database driver. A
//! [`Connector`] opens one [`Connection`] per worker; the connection runs
//! session statements and queries and streams rows back as [`Cell`]s.

use std::future::Future;

use futures_util::stream::BoxStream;
use unload_protocol::SourceColumn;

use crate::cell::Cell;
use crate::error::{Result, SourceError};

/// Row stream returned by a query
pub type RowStream<'c> = BoxStream<'c, std::result::Result<Vec<Cell>, SourceError>>;

/// An executing query
pub struct QueryResult<'c> {
    /// Result-set column metadata, in select order
    ///
    /// May be empty when the driver only learns column types from the first
    /// row and the result is empty.
    pub columns: Vec<SourceColumn>,

    /// Rows in cursor order
    pub rows: RowStream<'c>,
}

/// Factory for per-worker connections
pub trait Connector: Send + Sync {
    type Connection: Connection;

    /// Connector name for logs (e.g., "sqlite", "memory")
    fn name(&self) -> &'static str;

    /// Open a connection for one worker
    fn connect(
        &self,
        worker_id: usize,
    ) -> impl Future<Output = Result<Self::Connection>> + Send;
}

/// One open database connection, owned by exactly one worker
pub trait Connection: Send {
    /// Run a statement that returns no rows
    fn execute(&mut self, sql: &str) -> impl Future<Output = Result<()>> + Send;

    /// Run a query with positional integer parameters
    fn query<'c>(
        &'c mut self,
        sql: &'c str,
        params: &'c [i64],
    ) -> impl Future<Output = Result<QueryResult<'c>>> + Send;

    /// Close the connection
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}
