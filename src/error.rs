//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Probe failures are
//! deliberately absent: a refused or timed-out connect is a scan outcome,
//! not an error.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a scan from producing a result.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("could not resolve hostname '{host}': {reason}")]
    Resolution { host: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl ScanError {
    /// Build a resolution error for `host`.
    pub fn resolution(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            host: host.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write report to {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<PortError> for CliError {
    fn from(err: PortError) -> Self {
        Self::Scan(ScanError::Port(err))
    }
}
