//! Fire-and-forget diagnostics stream for per-batch failures.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use chrono::{SecondsFormat, Utc};
use dynarestore_types::diagnostic::{DiagnosticEvent, Timestamp};

/// Destination for diagnostic events.
///
/// `emit` never fails from the caller's perspective; sinks log and drop
/// events they cannot deliver.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}

/// Writes each event as one JSON line.
pub struct JsonLinesDiagnostics<W: Write + Send> {
    out: Mutex<W>,
}

impl JsonLinesDiagnostics<std::io::Stderr> {
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> JsonLinesDiagnostics<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> DiagnosticSink for JsonLinesDiagnostics<W> {
    fn emit(&self, event: DiagnosticEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize diagnostic event");
                return;
            }
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::error!(error = %e, "Failed to write diagnostic event");
        }
    }
}

/// Keeps events in memory.
#[derive(Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemoryDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn emit(&self, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

pub(crate) fn now() -> Timestamp {
    Timestamp::new(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}
