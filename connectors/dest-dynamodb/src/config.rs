use dynarestore_engine::config::types::DEFAULT_MAX_ATTEMPTS;
use dynarestore_engine::RestoreConfig;

/// Region forced when an endpoint override points at a local DynamoDB.
pub const LOCAL_REGION: &str = "us-west-2";

/// DynamoDB client settings. The region comes from the default provider
/// chain unless an endpoint override is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint override. Switches to static local credentials.
    pub endpoint_url: Option<String>,
    pub max_attempts: u32,
    /// Overall deadline per call, retries included.
    pub operation_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            operation_timeout_secs: None,
        }
    }
}

impl From<&RestoreConfig> for ClientConfig {
    fn from(config: &RestoreConfig) -> Self {
        Self {
            endpoint_url: config.endpoint.clone(),
            max_attempts: config.max_attempts,
            operation_timeout_secs: config.operation_timeout_secs,
        }
    }
}

impl ClientConfig {
    /// Whether the client targets a local endpoint rather than AWS.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.endpoint_url.is_some()
    }
}
