use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the hostmetrics service
#[derive(Error, Debug)]
pub enum HostMetricsError {
    #[error("Failed to read {path}: {source}")]
    LogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("Tunnel error: {0}")]
    Tunnel(String),
}

/// Result type alias for the hostmetrics service
pub type Result<T> = std::result::Result<T, HostMetricsError>;

impl HostMetricsError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        HostMetricsError::Config(msg.into())
    }

    /// Wrap an I/O failure on a configured log file
    pub fn log_read<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        HostMetricsError::LogRead {
            path: path.into(),
            source,
        }
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        HostMetricsError::MetricCollection(msg.into())
    }

    pub fn tunnel<S: Into<String>>(msg: S) -> Self {
        HostMetricsError::Tunnel(msg.into())
    }
}
