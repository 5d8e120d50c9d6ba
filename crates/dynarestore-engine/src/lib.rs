//! Tenant-scoped DynamoDB backup restore pipeline.
//!
//! One producer decodes backup lines, keeps the source tenant's records,
//! drops its default journal row, and rewrites the tenant prefix. A pool of
//! dispatch workers batches the records and writes them through a
//! [`BatchWriter`].

pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod dispatcher;
pub mod errors;
pub mod filter;
pub mod identity;
pub mod journal;
pub mod orchestrator;
pub mod producer;
pub mod result;
pub mod writer;

// Re-export public API for convenience
pub use config::RestoreConfig;
pub use diagnostics::{DiagnosticSink, JsonLinesDiagnostics, MemoryDiagnostics};
pub use dispatcher::DispatchContext;
pub use errors::PipelineError;
pub use filter::{Disposition, TenantRules};
pub use identity::{derive_identifier, TenantId, TenantScope};
pub use orchestrator::{restore_stream, run_restore, worker_count};
pub use result::RestoreSummary;
pub use writer::{BatchWriter, DryRunWriter};
