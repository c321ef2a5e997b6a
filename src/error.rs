use std::io;
use thiserror::Error;

/// Custom error type for the resmon library
#[derive(Error, Debug)]
pub enum ResmonError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid history capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    #[error("Counter read failed: {0}")]
    CounterRead(String),

    #[error("Battery error: {0}")]
    Battery(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Alert sink error: {0}")]
    AlertSink(String),
}

/// Result type alias for the resmon library
pub type Result<T> = std::result::Result<T, ResmonError>;

impl ResmonError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ResmonError::Config(msg.into())
    }

    pub fn counter_read<S: Into<String>>(msg: S) -> Self {
        ResmonError::CounterRead(msg.into())
    }

    pub fn battery<S: Into<String>>(msg: S) -> Self {
        ResmonError::Battery(msg.into())
    }

    pub fn export<S: Into<String>>(msg: S) -> Self {
        ResmonError::Export(msg.into())
    }

    pub fn alert_sink<S: Into<String>>(msg: S) -> Self {
        ResmonError::AlertSink(msg.into())
    }
}
