//! Structured error model for batch writes.
//!
//! [`WriteError`] carries classification and a retry hint for a failed
//! write-batch call. Construct via category-specific factory methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification of a write failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid client or request construction.
    Config,
    /// Credentials rejected or missing permissions.
    Auth,
    /// Destination table does not exist.
    NotFound,
    /// Provisioned throughput or request rate exceeded.
    Throttled,
    /// Request rejected by server-side validation.
    Validation,
    /// Connection-level failure.
    TransientNetwork,
    /// Operation did not complete in time.
    Timeout,
    /// Item could not be converted between representations.
    Conversion,
    /// Anything else the store reported.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Config => "config",
            Self::Auth => "auth",
            Self::NotFound => "not_found",
            Self::Throttled => "throttled",
            Self::Validation => "validation",
            Self::TransientNetwork => "transient_network",
            Self::Timeout => "timeout",
            Self::Conversion => "conversion",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Failed write-batch call.
///
/// `retryable` is informational: the remote client has already exhausted
/// its own retry policy by the time this error surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("[{category}] {code}: {message}")]
pub struct WriteError {
    pub category: ErrorCategory,
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl WriteError {
    fn new(
        category: ErrorCategory,
        retryable: bool,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }

    #[must_use]
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Config, false, code, message)
    }

    #[must_use]
    pub fn auth(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Auth, false, code, message)
    }

    #[must_use]
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NotFound, false, code, message)
    }

    /// Throttling error (retryable).
    #[must_use]
    pub fn throttled(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Throttled, true, code, message)
    }

    #[must_use]
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, false, code, message)
    }

    /// Transient network error (retryable).
    #[must_use]
    pub fn transient_network(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::TransientNetwork, true, code, message)
    }

    /// Timeout (retryable).
    #[must_use]
    pub fn timeout(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Timeout, true, code, message)
    }

    #[must_use]
    pub fn conversion(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Conversion, false, code, message)
    }

    #[must_use]
    pub fn internal(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, false, code, message)
    }
}
