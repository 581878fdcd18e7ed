//! Partition Scheduler
//!
//! ```text
//! Idle → ConnectingWorkers → Dispatching → Draining → Done
//! ```
//!
//! Spawns `parallel` workers, each opening its own connection. Every worker
//! reports connect success or failure before any range is sent; a single
//! failure aborts the run with all collected errors and nothing dispatched.
//! Ranges then go onto a shared channel that all workers pull from, so idle
//! workers take the next range and the scheduler blocks while all are busy.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use unload_protocol::PartitionPlan;
use unload_sources::{Connector, SourceError};

use crate::error::{PipelineError, Result};
use crate::params::Params;
use crate::report::{RunReport, WorkerReport};
use crate::worker::{RunMetrics, Work, Worker};

/// Connect outcome reported by each worker before dispatch starts
type ConnectResult = (usize, std::result::Result<(), SourceError>);

type WorkerHandle = (usize, JoinHandle<Option<WorkerReport>>);

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    ConnectingWorkers,
    Dispatching,
    Draining,
    Done,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ConnectingWorkers => "connecting_workers",
            Self::Dispatching => "dispatching",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Ranged extraction over a pool of workers
pub struct Scheduler<K: Connector> {
    connector: Arc<K>,
    params: Arc<Params>,
    metrics: RunMetrics,
    state: SchedulerState,
}

impl<K> Scheduler<K>
where
    K: Connector + 'static,
    K::Connection: 'static,
{
    pub fn new(connector: Arc<K>, params: Arc<Params>) -> Self {
        Self {
            connector,
            params,
            metrics: RunMetrics::default(),
            state: SchedulerState::Idle,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: RunMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    fn transition(&mut self, next: SchedulerState) {
        tracing::debug!(from = %self.state, to = %next, "scheduler state");
        self.state = next;
    }

    /// Extract `[start, end]` in partitions of `params.batch_size`
    ///
    /// `end < start` yields zero partitions; workers still connect and then
    /// drain immediately.
    pub async fn run(&mut self, start: i64, end: i64) -> Result<RunReport> {
        let plan = PartitionPlan::new(start, end, self.params.batch_size)?;
        let started = Instant::now();
        let parallel = self.params.parallel.max(1);
        // Single-worker runs keep the plain file names
        let ranged_suffix = parallel > 1;

        tracing::info!(
            range_start = start,
            range_end = end,
            batch_size = self.params.batch_size,
            ranges = plan.range_count(),
            parallel,
            "starting ranged extraction"
        );

        self.transition(SchedulerState::ConnectingWorkers);
        let (range_tx, range_rx) = crossfire::mpmc::bounded_async(1);
        let (ready_tx, mut ready_rx) = mpsc::channel::<ConnectResult>(parallel);

        let mut handles: Vec<WorkerHandle> = Vec::with_capacity(parallel);
        for id in 1..=parallel {
            let connector = Arc::clone(&self.connector);
            let params = Arc::clone(&self.params);
            let metrics = self.metrics.clone();
            let ranges = range_rx.clone();
            let ready = ready_tx.clone();
            let suffix = ranged_suffix.then_some(id);

            handles.push((
                id,
                tokio::spawn(async move {
                    let scheduler = Arc::clone(&metrics.scheduler);
                    match Worker::connect(&*connector, id, suffix, params, metrics).await {
                        Ok(worker) => {
                            scheduler.worker_connected();
                            let _ = ready.send((id, Ok(()))).await;
                            drop(ready);
                            Some(worker.run(Work::Ranges(ranges)).await)
                        }
                        Err(e) => {
                            scheduler.connect_failed();
                            let _ = ready.send((id, Err(e))).await;
                            None
                        }
                    }
                }),
            ));
        }
        drop(ready_tx);
        drop(range_rx);

        let mut errors = Vec::new();
        while let Some((id, result)) = ready_rx.recv().await {
            if let Err(e) = result {
                tracing::error!(worker = id, error = %e, "worker failed to connect");
                errors.push((id, e));
            }
        }

        if !errors.is_empty() {
            self.transition(SchedulerState::Draining);
            drop(range_tx);
            join_workers(handles).await;
            self.transition(SchedulerState::Done);

            errors.sort_by_key(|(id, _)| *id);
            return Err(PipelineError::WorkerSetup {
                total: parallel,
                errors: errors.into_iter().map(|(_, e)| e).collect(),
            });
        }

        self.transition(SchedulerState::Dispatching);
        for range in plan {
            if range_tx.send(range).await.is_err() {
                tracing::warn!(
                    range_first = range.first(),
                    "all workers stopped, remaining ranges not dispatched"
                );
                break;
            }
            self.metrics.scheduler.range_dispatched();
        }

        self.transition(SchedulerState::Draining);
        drop(range_tx);
        let workers = join_workers(handles).await;
        self.transition(SchedulerState::Done);

        let report = RunReport {
            workers,
            scheduler: self.metrics.scheduler.snapshot(),
            elapsed: started.elapsed(),
        };
        tracing::info!(
            rows = report.rows(),
            ranges = report.scheduler.ranges_dispatched,
            files = report.files().len(),
            failed_workers = report.failures().count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "ranged extraction finished"
        );
        Ok(report)
    }
}

/// Wait for every worker; connect failures produce no report
async fn join_workers(handles: Vec<WorkerHandle>) -> Vec<WorkerReport> {
    let mut reports = Vec::with_capacity(handles.len());
    for (id, handle) in handles {
        match handle.await {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(e) => {
                let mut report = WorkerReport::new(id);
                report.fail(PipelineError::Task {
                    worker: id,
                    message: e.to_string(),
                });
                reports.push(report);
            }
        }
    }
    reports
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;
