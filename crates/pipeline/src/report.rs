//! Run and worker reports

use std::path::PathBuf;
use std::time::Duration;

use unload_sinks::SinkReport;

use crate::error::PipelineError;
use crate::metrics::MetricsSnapshot;

/// What one worker did
#[derive(Debug)]
pub struct WorkerReport {
    pub worker: usize,
    /// Ranges received from the partition channel
    pub ranges: u64,
    /// Rows handed to the sink
    pub rows: u64,
    /// Rows replaced by empty-filled rows after scan failures
    pub substituted: u64,
    /// Sink outcome, `None` if the sink task failed
    pub sink: Option<SinkReport>,
    /// First fatal error, if the worker stopped early
    pub failure: Option<PipelineError>,
}

impl WorkerReport {
    pub(crate) fn new(worker: usize) -> Self {
        Self {
            worker,
            ranges: 0,
            rows: 0,
            substituted: 0,
            sink: None,
            failure: None,
        }
    }

    /// Keep the first failure
    pub(crate) fn fail(&mut self, error: PipelineError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Files written by this worker's sink
    pub fn files(&self) -> &[PathBuf] {
        match &self.sink {
            Some(sink) => &sink.files,
            None => &[],
        }
    }
}

/// Summary of a complete run
#[derive(Debug)]
pub struct RunReport {
    /// Workers in id order
    pub workers: Vec<WorkerReport>,
    pub scheduler: MetricsSnapshot,
    pub elapsed: Duration,
}

impl RunReport {
    /// Total rows across workers
    pub fn rows(&self) -> u64 {
        self.workers.iter().map(|w| w.rows).sum()
    }

    /// Total substituted rows across workers
    pub fn substituted(&self) -> u64 {
        self.workers.iter().map(|w| w.substituted).sum()
    }

    /// Every output file, grouped by worker in sequence order
    pub fn files(&self) -> Vec<PathBuf> {
        self.workers
            .iter()
            .flat_map(|w| w.files().iter().cloned())
            .collect()
    }

    /// `(worker, digest)` for digest runs
    pub fn digests(&self) -> Vec<(usize, String)> {
        self.workers
            .iter()
            .filter_map(|w| {
                let digest = w.sink.as_ref()?.digest.clone()?;
                Some((w.worker, digest))
            })
            .collect()
    }

    /// Workers that stopped early
    pub fn failures(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(|w| !w.is_ok())
    }

    pub fn is_ok(&self) -> bool {
        self.workers.iter().all(WorkerReport::is_ok)
    }
}
