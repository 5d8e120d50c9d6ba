use dynarestore_engine::TenantScope;

/// Execute the `tenant-id` command: print the resource name and the
/// identifier prefix its records carry.
pub fn execute(account: &str, region: &str) {
    let scope = TenantScope::new(account, region);
    println!("{}", scope.resource_name());
    println!("{}", scope.tenant_id());
}
