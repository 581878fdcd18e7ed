//! Pipeline error types

use thiserror::Error;
use unload_config::ConfigError;
use unload_protocol::ProtocolError;
use unload_sinks::SinkError;
use unload_sources::SourceError;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more workers could not connect; nothing was dispatched
    #[error("{} of {total} workers failed to connect: {}", .errors.len(), join_errors(.errors))]
    WorkerSetup {
        total: usize,
        errors: Vec<SourceError>,
    },

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid range or batch size
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A query or cursor failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A sink failed
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// A worker or sink task panicked
    #[error("worker {worker} task failed: {message}")]
    Task { worker: usize, message: String },
}

fn join_errors(errors: &[SourceError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_setup_lists_every_failure() {
        let err = PipelineError::WorkerSetup {
            total: 3,
            errors: vec![
                SourceError::connect(2, "refused"),
                SourceError::connect(3, "timeout"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 of 3 workers"));
        assert!(msg.contains("worker 2"));
        assert!(msg.contains("worker 3"));
    }

    #[test]
    fn test_task_error_display() {
        let err = PipelineError::Task {
            worker: 4,
            message: "panicked".into(),
        };
        assert!(err.to_string().contains("worker 4"));
    }

    #[test]
    fn test_from_source_error() {
        let err: PipelineError = SourceError::Query("boom".into()).into();
        assert!(matches!(err, PipelineError::Source(_)));
        assert!(err.to_string().contains("boom"));
    }
}
