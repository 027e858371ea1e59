//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from validating simulator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Success rate is not a probability.
    #[error("invalid success rate {rate}: must be within [0, 1]")]
    InvalidSuccessRate {
        /// The rejected rate.
        rate: f64,
    },
}

/// Errors from exporting the connection log.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The log file could not be created or written.
    #[error("failed to write connection log to {}: {source}", path.display())]
    Io {
        /// Target path of the export.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The log could not be encoded as JSON.
    #[error("failed to serialize connection log: {0}")]
    Serialize(#[from] serde_json::Error),
}
