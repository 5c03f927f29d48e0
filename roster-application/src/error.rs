use std::io;

use thiserror::Error;

use roster_domain::LookupError;

/// Scan-level failures. All variants are recoverable at the daemon loop:
/// the cycle is logged and retried after the next sleep, with the watermark
/// left where it was.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("cannot read log file {path}: {source}")]
    LogRead {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("store failure: {0}")]
    Store(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
