//! Row Stream Producer
//!
//! Runs one query on one connection and pushes encoded records onto the
//! worker's row channel. The producer is the only sender on that channel;
//! the sink task is the only receiver.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use unload_protocol::{Codec, Record, TypeTable};

use crate::cell::scan;
use crate::common::SourceMetrics;
use crate::error::{Result, SourceError};
use crate::rate_limited_logger::RateLimitedLogger;
use crate::traits::Connection;

/// Counters for one `produce` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProduceStats {
    /// Records sent, substituted ones included
    pub rows: u64,
    /// Rows that failed to scan and were replaced by empty fields
    pub substituted: u64,
}

/// Executes queries and feeds a row channel
pub struct Producer {
    worker_id: usize,
    types: &'static TypeTable,
    codec: Codec,
    metrics: Arc<SourceMetrics>,
    scan_warnings: RateLimitedLogger,
}

impl Producer {
    pub fn new(
        worker_id: usize,
        types: &'static TypeTable,
        codec: Codec,
        metrics: Arc<SourceMetrics>,
    ) -> Self {
        Self {
            worker_id,
            types,
            codec,
            metrics,
            scan_warnings: RateLimitedLogger::default(),
        }
    }

    /// Run `sql` with `params` and send every row on `tx`
    ///
    /// Column descriptors are built once from the result metadata; an
    /// unmapped column type fails before any row is sent. A row that fails
    /// to scan is replaced by an all-empty row of the same width. A query or
    /// cursor failure stops the producer and is returned; rows already sent
    /// stay sent.
    pub async fn produce<C: Connection>(
        &self,
        conn: &mut C,
        sql: &str,
        params: &[i64],
        tx: &mpsc::Sender<Record>,
    ) -> Result<ProduceStats> {
        self.metrics.query_started();
        let result = match conn.query(sql, params).await {
            Ok(result) => result,
            Err(e) => {
                self.metrics.error();
                return Err(e);
            }
        };

        let descriptors = self.types.describe(&result.columns)?;
        let mut rows = result.rows;
        let mut stats = ProduceStats::default();

        tracing::debug!(
            worker = self.worker_id,
            columns = descriptors.len(),
            ?params,
            "query started"
        );

        while let Some(next) = rows.next().await {
            let cells = match next {
                Ok(cells) => cells,
                Err(e) => {
                    self.metrics.error();
                    return Err(match e {
                        SourceError::Cursor { .. } => e,
                        other => SourceError::Cursor {
                            rows: stats.rows,
                            message: other.to_string(),
                        },
                    });
                }
            };
            self.metrics.row_fetched();

            let record = match scan(cells, &descriptors) {
                Ok(values) => self.codec.encode_row(&values, &descriptors),
                Err(e) => {
                    self.scan_warnings
                        .warn("row failed to scan, writing empty row", &e, self.worker_id);
                    self.metrics.row_substituted();
                    stats.substituted += 1;
                    vec![String::new(); descriptors.len()]
                }
            };

            tx.send(record)
                .await
                .map_err(|_| SourceError::ChannelClosed)?;
            stats.rows += 1;
        }

        Ok(stats)
    }
}
