//! Extraction entry points
//!
//! [`Extraction`] picks the mode from the parameters: a ranged run goes
//! through the [`Scheduler`], anything else runs the whole table on a single
//! worker with [`run_table`].

use std::sync::Arc;
use std::time::Instant;

use unload_sources::Connector;

use crate::error::{PipelineError, Result};
use crate::params::Params;
use crate::report::RunReport;
use crate::scheduler::Scheduler;
use crate::worker::{RunMetrics, Work, Worker};

/// Worker id used for whole-table runs
pub const TABLE_WORKER_ID: usize = 0;

/// Run the query once on a single connection, no worker suffix in file names
pub async fn run_table<K>(connector: Arc<K>, params: Arc<Params>) -> Result<RunReport>
where
    K: Connector + 'static,
    K::Connection: 'static,
{
    run_table_with_metrics(connector, params, RunMetrics::default()).await
}

async fn run_table_with_metrics<K>(
    connector: Arc<K>,
    params: Arc<Params>,
    metrics: RunMetrics,
) -> Result<RunReport>
where
    K: Connector + 'static,
    K::Connection: 'static,
{
    let started = Instant::now();
    tracing::info!(source = connector.name(), "starting whole-table extraction");

    let scheduler_metrics = Arc::clone(&metrics.scheduler);
    let worker = match Worker::connect(&*connector, TABLE_WORKER_ID, None, params, metrics).await {
        Ok(worker) => worker,
        Err(e) => {
            scheduler_metrics.connect_failed();
            tracing::error!(error = %e, "failed to connect");
            return Err(PipelineError::WorkerSetup {
                total: 1,
                errors: vec![e],
            });
        }
    };
    scheduler_metrics.worker_connected();

    let report = RunReport {
        workers: vec![worker.run(Work::Table).await],
        scheduler: scheduler_metrics.snapshot(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        rows = report.rows(),
        files = report.files().len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "whole-table extraction finished"
    );
    Ok(report)
}

/// One configured extraction
pub struct Extraction<K: Connector> {
    connector: Arc<K>,
    params: Arc<Params>,
    metrics: RunMetrics,
}

impl<K> Extraction<K>
where
    K: Connector + 'static,
    K::Connection: 'static,
{
    pub fn new(connector: K, params: Params) -> Self {
        Self {
            connector: Arc::new(connector),
            params: Arc::new(params),
            metrics: RunMetrics::default(),
        }
    }

    /// Counters shared with the workers, readable after `run`
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Run in ranged mode when a range is configured, whole-table otherwise
    pub async fn run(&self) -> Result<RunReport> {
        match self.params.range {
            Some((start, end)) => {
                let mut scheduler =
                    Scheduler::new(Arc::clone(&self.connector), Arc::clone(&self.params))
                        .with_metrics(self.metrics.clone());
                scheduler.run(start, end).await
            }
            None => {
                run_table_with_metrics(
                    Arc::clone(&self.connector),
                    Arc::clone(&self.params),
                    self.metrics.clone(),
                )
                .await
            }
        }
    }
}
