//! Fatal pipeline errors.
//!
//! Anything that reaches [`PipelineError`] aborts the run. Per-batch write
//! failures never do; they are contained in the dispatch workers and
//! reported through diagnostics.

use crate::journal::SentinelError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Input line is not a well-formed `{"Item": {...}}` envelope.
    #[error("line {line}: malformed backup record: {source}")]
    Decode {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// Source-tenant journal row whose payload cannot be inspected.
    #[error("line {line}: corrupt journal row: {source}")]
    Sentinel {
        line: u64,
        #[source]
        source: SentinelError,
    },

    /// Reading the input failed.
    #[error("failed to read input after line {line}: {source}")]
    Io {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    /// Host-side failure (worker panic, closed channel, file open).
    #[error(transparent)]
    Infrastructure(#[from] anyhow::Error),
}

impl PipelineError {
    /// 1-based input line the error refers to, when it has one.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Decode { line, .. } | Self::Sentinel { line, .. } | Self::Io { line, .. } => {
                Some(*line)
            }
            Self::Infrastructure(_) => None,
        }
    }
}
