use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for resmon
#[derive(Error, Debug)]
pub enum ResmonError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export to {} failed: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("GPU not available: {0}")]
    GpuNotAvailable(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for resmon
pub type Result<T> = std::result::Result<T, ResmonError>;

impl ResmonError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ResmonError::Config(msg.into())
    }

    /// Wrap an I/O failure that happened while writing an export file
    pub fn export<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        ResmonError::Export {
            path: path.into(),
            source,
        }
    }

    pub fn unknown_metric<S: Into<String>>(key: S) -> Self {
        ResmonError::UnknownMetric(key.into())
    }

    pub fn gpu_not_available<S: Into<String>>(msg: S) -> Self {
        ResmonError::GpuNotAvailable(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        ResmonError::MetricCollection(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ResmonError::Other(msg.into())
    }

    /// True for failures raised while writing export files
    pub fn is_export(&self) -> bool {
        matches!(self, ResmonError::Export { .. } | ResmonError::Serialization(_))
    }
}
