//! Unload - Pipeline
//!
//! Runs an extraction: connects workers, hands out key ranges and joins the
//! per-worker producer and sink tasks into one report.
//!
//! # Architecture
//!
//! ```text
//!                     ┌──→ Worker 1: [Producer] ──Record──→ [Sink] ──→ files | digest
//! [Scheduler] ──Range─┼──→ Worker 2: [Producer] ──Record──→ [Sink] ──→ files | digest
//!   (capacity 1)      └──→ Worker N: ...
//! ```
//!
//! # Key Design
//!
//! - **All-or-nothing connect**: every worker connects before the first range
//!   is sent; any failure aborts the run
//! - **Pull dispatch**: idle workers take the next range from a shared
//!   capacity-1 channel
//! - **One row in flight**: producer and sink are joined by a capacity-1
//!   channel per worker
//! - **Lazy files**: sinks open their first file on the first row
//!
//! # Example
//!
//! ```ignore
//! use unload_pipeline::{Extraction, OutputMode, Params};
//! use unload_sources::SqliteConnector;
//!
//! let params = Params::from_config(&config, OutputMode::Files)?;
//! let connector = SqliteConnector::new(&config.source.url)?;
//! let report = Extraction::new(connector, params).run().await?;
//! println!("{} rows in {} files", report.rows(), report.files().len());
//! ```

mod error;
mod extraction;
mod metrics;
mod params;
mod report;
mod scheduler;
mod worker;

pub use error::{PipelineError, Result};
pub use extraction::{Extraction, TABLE_WORKER_ID, run_table};
pub use metrics::{MetricsSnapshot, SchedulerMetrics};
pub use params::{OutputMode, Params};
pub use report::{RunReport, WorkerReport};
pub use scheduler::{Scheduler, SchedulerState};
pub use worker::{RunMetrics, Work, Worker};
