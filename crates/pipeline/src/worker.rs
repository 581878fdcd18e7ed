//! Worker
//!
//! Owns one connection, one producer and one sink for its whole lifetime.
//! The producer and the sink run as two tasks joined by a capacity-1 row
//! channel, so at most one row per worker is in flight.

use std::sync::Arc;

use crossfire::MAsyncRx;
use tokio::sync::mpsc;
use unload_protocol::{Range, Record};
use unload_sinks::SinkMetrics;
use unload_sources::{Connection, Connector, Producer, SourceError, SourceMetrics};

use crate::error::PipelineError;
use crate::metrics::SchedulerMetrics;
use crate::params::Params;
use crate::report::WorkerReport;

/// Shared counters handed to every worker
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    pub source: Arc<SourceMetrics>,
    pub sink: Arc<SinkMetrics>,
    pub scheduler: Arc<SchedulerMetrics>,
}

/// What a worker runs once connected
pub enum Work {
    /// One unparameterized query
    Table,
    /// Ranges pulled from the shared partition channel until it closes
    Ranges(MAsyncRx<Range>),
}

/// A connected worker
pub struct Worker<C: Connection> {
    id: usize,
    /// File name suffix; `None` for single-worker runs
    suffix: Option<usize>,
    conn: C,
    params: Arc<Params>,
    producer: Producer,
    metrics: RunMetrics,
}

impl<C: Connection> Worker<C> {
    /// Connect and run the session statements
    ///
    /// A failing session statement counts as a connection failure.
    pub async fn connect<K>(
        connector: &K,
        id: usize,
        suffix: Option<usize>,
        params: Arc<Params>,
        metrics: RunMetrics,
    ) -> Result<Self, SourceError>
    where
        K: Connector<Connection = C>,
    {
        let mut conn = connector.connect(id).await?;
        metrics.source.connection_opened();

        for statement in &params.session_init {
            if let Err(e) = conn.execute(statement).await {
                if let Err(close) = conn.close().await {
                    tracing::warn!(worker = id, error = %close, "failed to close connection");
                }
                return Err(e);
            }
        }

        let producer = Producer::new(
            id,
            params.dialect.type_table(),
            params.codec,
            Arc::clone(&metrics.source),
        );
        tracing::info!(worker = id, source = connector.name(), "worker connected");

        Ok(Self {
            id,
            suffix,
            conn,
            params,
            producer,
            metrics,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Run the work to completion, finalize the sink and close the connection
    ///
    /// A query or cursor failure stops this worker; ranges it has not pulled
    /// yet are left for the other workers.
    pub async fn run(mut self, work: Work) -> WorkerReport {
        let (tx, rx) = mpsc::channel::<Record>(1);
        let sink = self
            .params
            .sink
            .build(self.suffix, rx, Arc::clone(&self.metrics.sink));
        let sink_task = tokio::spawn(sink.run());

        let mut report = WorkerReport::new(self.id);
        match work {
            Work::Table => {
                self.produce(None, &tx, &mut report).await;
            }
            Work::Ranges(ranges) => {
                while let Ok(range) = ranges.recv().await {
                    report.ranges += 1;
                    if !self.produce(Some(range), &tx, &mut report).await {
                        break;
                    }
                }
            }
        }
        drop(tx);

        match sink_task.await {
            Ok(Ok(sink_report)) => report.sink = Some(sink_report),
            Ok(Err(e)) => {
                tracing::error!(worker = self.id, error = %e, "sink failed");
                // The producer only saw a closed channel; the sink error is the cause
                report.failure = Some(e.into());
            }
            Err(e) => report.fail(PipelineError::Task {
                worker: self.id,
                message: e.to_string(),
            }),
        }

        if let Err(e) = self.conn.close().await {
            tracing::warn!(worker = self.id, error = %e, "failed to close connection");
        }
        tracing::info!(
            worker = self.id,
            ranges = report.ranges,
            rows = report.rows,
            ok = report.is_ok(),
            "worker finished"
        );
        report
    }

    /// Run one query; returns false if the worker must stop
    async fn produce(
        &mut self,
        range: Option<Range>,
        tx: &mpsc::Sender<Record>,
        report: &mut WorkerReport,
    ) -> bool {
        let bounds = range.map(|r| r.params());
        let params: &[i64] = match &bounds {
            Some(bounds) => bounds,
            None => &[],
        };

        match self
            .producer
            .produce(&mut self.conn, &self.params.query, params, tx)
            .await
        {
            Ok(stats) => {
                report.rows += stats.rows;
                report.substituted += stats.substituted;
                if let Some(range) = range {
                    self.metrics.scheduler.range_completed();
                    tracing::debug!(
                        worker = self.id,
                        range_first = range.first(),
                        range_last = range.last(),
                        rows = stats.rows,
                        "range complete"
                    );
                }
                true
            }
            Err(e) => {
                if let Some(range) = range {
                    self.metrics.scheduler.range_failed();
                    tracing::error!(
                        worker = self.id,
                        range_first = range.first(),
                        range_last = range.last(),
                        error = %e,
                        "range failed, worker stopping"
                    );
                } else {
                    tracing::error!(worker = self.id, error = %e, "query failed");
                }
                report.fail(e.into());
                false
            }
        }
    }
}
