//! Unload - Sources
//!
//! Typed row sources and the producer that streams their rows into a sink.
//!
//! # Available Sources
//!
//! - **Memory** - deterministic in-memory table with injectable failures
//! - **SQLite** - `sqlx` driver, one connection per worker (feature `sqlite`)
//!
//! # Flow
//!
//! A [`Connector`] opens one [`Connection`] per worker. For each query the
//! [`Producer`] maps result metadata to column descriptors once, [`scan`]s
//! every fetched row into typed values, encodes it with the run's codec and
//! hands the record to the sink over a capacity-1 channel.
//!
//! # Example
//!
//! ```ignore
//! use unload_sources::{Connector, MemoryConnector, MemoryTable, Producer, SourceMetrics};
//! use tokio::sync::mpsc;
//!
//! let connector = MemoryConnector::new(MemoryTable::sequential(100));
//! let mut conn = connector.connect(0).await?;
//! let (tx, rx) = mpsc::channel(1);
//! let producer = Producer::new(0, Dialect::Sqlite.type_table(), codec, metrics);
//! producer.produce(&mut conn, "SELECT * FROM t", &[], &tx).await?;
//! ```

mod cell;
mod common;
mod error;
mod producer;
mod rate_limited_logger;
mod traits;

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cell::{Cell, scan};
pub use common::{MetricsSnapshot, SourceMetrics};
pub use error::{Result, ScanError, SourceError};
pub use memory::{MemoryConnection, MemoryConnector, MemoryLog, MemoryTable};
pub use producer::{ProduceStats, Producer};
pub use rate_limited_logger::{DEFAULT_LOG_INTERVAL, RateLimitedLogger};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnector, SqliteSourceConnection};
pub use traits::{Connection, Connector, QueryResult, RowStream};
