//! Diagnostic events emitted for per-batch write failures.
//!
//! [`DiagnosticEvent`] is serialized one JSON object per line. An
//! [`UnprocessedReport`] carries its items in `BatchWriteItem` put-request
//! form so an operator can resubmit them as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WriteError;
use crate::record::{Record, WriteRequest};

/// ISO-8601 formatted timestamp string.
///
/// Callers are trusted to provide valid ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    #[must_use]
    pub fn new(iso8601: impl Into<String>) -> Self {
        Self(iso8601.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Items a write-batch call accepted but did not persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprocessedReport {
    pub table: String,
    pub worker: usize,
    /// Size of the batch the items were submitted in.
    pub batch_size: usize,
    pub items: Vec<WriteRequest>,
    pub reported_at: Timestamp,
}

impl UnprocessedReport {
    #[must_use]
    pub fn new(
        table: impl Into<String>,
        worker: usize,
        batch_size: usize,
        unprocessed: Vec<Record>,
        reported_at: Timestamp,
    ) -> Self {
        Self {
            table: table.into(),
            worker,
            batch_size,
            items: unprocessed.into_iter().map(WriteRequest::from).collect(),
            reported_at,
        }
    }

    /// Borrow the unprocessed items.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().map(|req| &req.put_request.item)
    }
}

/// A write-batch call that failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFailure {
    pub table: String,
    pub worker: usize,
    pub batch_size: usize,
    pub error: WriteError,
    pub reported_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    UnprocessedItems(UnprocessedReport),
    WriteFailed(WriteFailure),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;

    #[test]
    fn unprocessed_event_is_tagged() {
        let record: Record = [("a", AttributeValue::S("x".into()))].into_iter().collect();
        let event = DiagnosticEvent::UnprocessedItems(UnprocessedReport::new(
            "table-1",
            3,
            25,
            vec![record],
            Timestamp::new("2026-01-15T10:30:00Z"),
        ));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "unprocessed_items");
        assert_eq!(json["table"], "table-1");
        assert_eq!(json["items"][0]["PutRequest"]["Item"]["a"]["S"], "x");
    }

    #[test]
    fn write_failed_roundtrip() {
        let event = DiagnosticEvent::WriteFailed(WriteFailure {
            table: "t".into(),
            worker: 0,
            batch_size: 1,
            error: WriteError::timeout("Timeout", "no response"),
            reported_at: Timestamp::new("2026-01-15T10:30:00Z"),
        });
        let json = serde_json::to_string(&event).unwrap();
        let back: DiagnosticEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
