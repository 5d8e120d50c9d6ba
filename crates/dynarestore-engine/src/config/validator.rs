//! Semantic validation of a resolved restore config.

use anyhow::{bail, Result};

use crate::config::types::RestoreConfig;
use crate::identity::TenantScope;

fn validate_scope(scope: &TenantScope, context: &str, errors: &mut Vec<String>) {
    if scope.account_id.contains(':') {
        errors.push(format!(
            "{context}: account id '{}' must not contain ':'",
            scope.account_id
        ));
    }
    if scope.region.contains(':') {
        errors.push(format!(
            "{context}: region '{}' must not contain ':'",
            scope.region
        ));
    }
}

/// Validate a resolved restore config.
///
/// # Errors
///
/// Returns an error listing every validation failure found.
pub fn validate_config(config: &RestoreConfig) -> Result<()> {
    let mut errors = Vec::new();

    validate_scope(&config.source, "source", &mut errors);
    validate_scope(&config.destination, "destination", &mut errors);

    if config.table.trim().is_empty() {
        errors.push("Destination table must not be empty".to_string());
    }

    if config.file.as_os_str().is_empty() {
        errors.push("Backup file path must not be empty".to_string());
    }

    if let Some(endpoint) = &config.endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(format!(
                "Endpoint '{endpoint}' must be an http:// or https:// URL"
            ));
        }
    }

    if config.concurrency == Some(0) {
        errors.push("concurrency must be at least 1".to_string());
    }

    if config.max_attempts == 0 {
        errors.push("max_attempts must be at least 1".to_string());
    }

    if config.operation_timeout_secs == Some(0) {
        errors.push("operation_timeout_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("Restore config validation failed:\n  - {}", errors.join("\n  - "));
    }
}
