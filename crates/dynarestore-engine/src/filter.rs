//! Per-record tenant membership and sentinel exclusion.

use dynarestore_types::Record;

use crate::identity::{identity_prefix, rewrite_tenant, TenantId};
use crate::journal::{is_sentinel_record, SentinelError, JOURNAL_TABLE_ID};

/// Whether the record's identity prefix equals `tenant`.
#[must_use]
pub fn belongs_to_tenant(record: &Record, tenant: &TenantId) -> bool {
    identity_prefix(record) == Some(&tenant.as_bytes()[..])
}

/// What the producer does with one decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Source-tenant record to rewrite and dispatch.
    Restore,
    /// Belongs to another tenant; dropped silently.
    OtherTenant,
    /// Source tenant's default journal row; excluded.
    Sentinel,
}

/// Source/destination tenant pair applied to every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRules {
    source: TenantId,
    destination: TenantId,
}

impl TenantRules {
    #[must_use]
    pub fn new(source: TenantId, destination: TenantId) -> Self {
        Self {
            source,
            destination,
        }
    }

    #[must_use]
    pub fn source(&self) -> &TenantId {
        &self.source
    }

    #[must_use]
    pub fn destination(&self) -> &TenantId {
        &self.destination
    }

    /// Classify a record. The tenant test runs first; only source-tenant
    /// rows have their journal payload decoded.
    ///
    /// # Errors
    ///
    /// Propagates [`SentinelError`] for corrupt journal rows of the source
    /// tenant.
    pub fn classify(&self, record: &Record) -> Result<Disposition, SentinelError> {
        if !belongs_to_tenant(record, &self.source) {
            return Ok(Disposition::OtherTenant);
        }
        if is_sentinel_record(record, &JOURNAL_TABLE_ID)? {
            return Ok(Disposition::Sentinel);
        }
        Ok(Disposition::Restore)
    }

    /// Move a classified record into the destination tenant.
    pub fn rewrite(&self, record: &mut Record) -> bool {
        rewrite_tenant(record, &self.destination)
    }
}
