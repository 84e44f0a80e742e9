use std::time::Duration;
use thiserror::Error;

/// Errors produced by configuration, scanning and the clipboard
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid target range {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("timeout must be positive, got {0:?}")]
    InvalidTimeout(Duration),

    #[error("create scanner: {0}")]
    DiscoveryBackendUnavailable(String),

    #[error("run scan: {0}")]
    DiscoveryExecutionFailed(String),

    #[error("scan cancelled after {0:?}")]
    ScanCancelled(Duration),

    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
