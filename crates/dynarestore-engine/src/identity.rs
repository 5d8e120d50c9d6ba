//! Tenant identifiers and the in-place identity-field rewrite.
//!
//! A tenant id is the UUIDv5 of the account's ARN-formatted resource name
//! under [`ACCOUNT_NAMESPACE`]. Every item stores its tenant id as the
//! first 16 bytes of the binary identity attribute.

use std::fmt;

use dynarestore_types::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace under which account resource names are hashed.
pub const ACCOUNT_NAMESPACE: Uuid = Uuid::from_u128(0x0cf4_9e6e_ec7e_4c81_b7ba_a984_b8db_762a);

pub const TENANT_PARTITION: &str = "twisp";
pub const TENANT_SERVICE: &str = "database";

/// Attribute carrying the tenant-prefixed row identity.
pub const IDENTITY_FIELD: &str = "a";

pub const TENANT_ID_LEN: usize = 16;

pub const DEFAULT_ACCOUNT: &str = "000000000000";
pub const DEFAULT_REGION: &str = "us-west-2";

/// 16-byte tenant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TenantId([u8; TENANT_ID_LEN]);

impl TenantId {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; TENANT_ID_LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; TENANT_ID_LEN] {
        &self.0
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        Uuid::from_bytes(self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_uuid().hyphenated(), f)
    }
}

/// ARN-formatted resource name with an empty resource part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceName<'a> {
    pub partition: &'a str,
    pub service: &'a str,
    pub region: &'a str,
    pub account_id: &'a str,
}

impl fmt::Display for ResourceName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:",
            self.partition, self.service, self.region, self.account_id
        )
    }
}

/// Derive the tenant id for a (partition, service, region, account) tuple.
#[must_use]
pub fn derive_identifier(partition: &str, service: &str, region: &str, account_id: &str) -> TenantId {
    let name = ResourceName {
        partition,
        service,
        region,
        account_id,
    }
    .to_string();
    TenantId(*Uuid::new_v5(&ACCOUNT_NAMESPACE, name.as_bytes()).as_bytes())
}

/// Account and region that scope one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantScope {
    #[serde(default = "default_account")]
    pub account_id: String,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_account() -> String {
    DEFAULT_ACCOUNT.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for TenantScope {
    fn default() -> Self {
        Self {
            account_id: default_account(),
            region: default_region(),
        }
    }
}

impl TenantScope {
    #[must_use]
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
        }
    }

    #[must_use]
    pub fn resource_name(&self) -> String {
        ResourceName {
            partition: TENANT_PARTITION,
            service: TENANT_SERVICE,
            region: &self.region,
            account_id: &self.account_id,
        }
        .to_string()
    }

    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        derive_identifier(TENANT_PARTITION, TENANT_SERVICE, &self.region, &self.account_id)
    }
}

/// Tenant prefix of the identity attribute.
///
/// Only binary identities strictly longer than the prefix qualify: a bare
/// 16-byte value carries no row part and is not a tenant-scoped key.
#[must_use]
pub fn identity_prefix(record: &Record) -> Option<&[u8]> {
    record
        .binary(IDENTITY_FIELD)
        .filter(|bytes| bytes.len() > TENANT_ID_LEN)
        .map(|bytes| &bytes[..TENANT_ID_LEN])
}

/// Overwrite the tenant prefix of the identity attribute with `destination`.
///
/// Returns `false` and leaves the record untouched when it has no qualifying
/// identity attribute. Must only run after the record has been matched
/// against the source tenant.
pub fn rewrite_tenant(record: &mut Record, destination: &TenantId) -> bool {
    match record.binary_mut(IDENTITY_FIELD) {
        Some(bytes) if bytes.len() > TENANT_ID_LEN => {
            bytes[..TENANT_ID_LEN].copy_from_slice(destination.as_bytes());
            true
        }
        _ => false,
    }
}
