use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Request-level failures. Item-level trouble (permission denied on one
/// entry, a file vanishing mid-scan) is surfaced as counters and error
/// lists inside the reports, never as a call failure.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Root path does not exist or is not a directory.
    #[error("not a scannable directory: {0}")]
    RootNotFound(PathBuf),

    /// A scan is already in flight for this root.
    #[error("a scan is already running for {0}")]
    AlreadyScanning(PathBuf),

    /// A clean request named a category id that is not in the rule table.
    #[error("unknown junk category: {0}")]
    UnknownCategory(String),

    /// Worker pool could not be constructed.
    #[error("thread pool: {0}")]
    ThreadPool(String),

    /// I/O error while setting up a request (not per-entry I/O).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
