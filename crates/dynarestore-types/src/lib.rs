//! Shared value model, write-error, and diagnostic types for dynarestore.
//!
//! This crate has no AWS SDK dependency; the SDK conversion lives in the
//! `dest-dynamodb` connector.

pub mod attribute;
pub mod diagnostic;
pub mod error;
pub mod record;

pub use attribute::{AttributeType, AttributeValue};
pub use error::{ErrorCategory, WriteError};
pub use record::{ItemEnvelope, Record, WriteRequest};

/// Maximum number of put requests DynamoDB accepts in one `BatchWriteItem`.
pub const MAX_BATCH_ITEMS: usize = 25;
