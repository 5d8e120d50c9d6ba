//! Restore configuration model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::identity::TenantScope;

pub const DEFAULT_FILE: &str = "backup.jsonl";
pub const DEFAULT_TABLE: &str = "0a5ccc1d-7ac0-4efb-818b-d845b3a82165";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

/// Fully resolved, immutable parameters of one restore run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestoreConfig {
    /// Tenant whose records are restored.
    #[serde(default)]
    pub source: TenantScope,
    /// Tenant the records are rewritten into.
    #[serde(default)]
    pub destination: TenantScope,
    /// JSON-lines backup, one `{"Item": {...}}` per line.
    #[serde(default = "default_file")]
    pub file: PathBuf,
    /// Destination table name.
    #[serde(default = "default_table")]
    pub table: String,
    /// Endpoint override for a local or alternate DynamoDB.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Upper bound on dispatch workers; defaults to available parallelism.
    #[serde(default)]
    pub concurrency: Option<usize>,
    /// Attempts per write-batch call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Deadline for one write-batch call, retries included.
    #[serde(default)]
    pub operation_timeout_secs: Option<u64>,
}

fn default_file() -> PathBuf {
    PathBuf::from(DEFAULT_FILE)
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            source: TenantScope::default(),
            destination: TenantScope::default(),
            file: default_file(),
            table: default_table(),
            endpoint: None,
            concurrency: None,
            max_attempts: default_max_attempts(),
            operation_timeout_secs: None,
        }
    }
}

/// Optional per-field overrides, applied on top of a base config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub from_account: Option<String>,
    pub from_region: Option<String>,
    pub to_account: Option<String>,
    pub to_region: Option<String>,
    pub file: Option<PathBuf>,
    pub table: Option<String>,
    pub endpoint: Option<String>,
    pub concurrency: Option<usize>,
    pub max_attempts: Option<u32>,
    pub operation_timeout_secs: Option<u64>,
}

impl RestoreConfig {
    /// Apply explicitly provided values over this config.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(v) = overrides.from_account {
            self.source.account_id = v;
        }
        if let Some(v) = overrides.from_region {
            self.source.region = v;
        }
        if let Some(v) = overrides.to_account {
            self.destination.account_id = v;
        }
        if let Some(v) = overrides.to_region {
            self.destination.region = v;
        }
        if let Some(v) = overrides.file {
            self.file = v;
        }
        if let Some(v) = overrides.table {
            self.table = v;
        }
        if overrides.endpoint.is_some() {
            self.endpoint = overrides.endpoint;
        }
        if overrides.concurrency.is_some() {
            self.concurrency = overrides.concurrency;
        }
        if let Some(v) = overrides.max_attempts {
            self.max_attempts = v;
        }
        if overrides.operation_timeout_secs.is_some() {
            self.operation_timeout_secs = overrides.operation_timeout_secs;
        }
        self
    }

    /// Whether source and destination resolve to the same tenant.
    #[must_use]
    pub fn is_same_tenant(&self) -> bool {
        self.source.tenant_id() == self.destination.tenant_id()
    }
}
