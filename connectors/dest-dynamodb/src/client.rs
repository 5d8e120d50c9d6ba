//! DynamoDB client construction.

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::config::Credentials;

use crate::config::{ClientConfig, LOCAL_REGION};

/// Build a client from the default AWS provider chain.
///
/// Retries use standard mode with `max_attempts` and exponential backoff.
/// Standard mode also draws from the retry partition's token bucket, so a
/// long burst of throttling can stop retries before `max_attempts` is
/// reached; such batches surface as throttled write failures. An endpoint
/// override pins the region to `us-west-2` and uses static `key`/`secret`
/// credentials, which is what DynamoDB Local accepts.
pub async fn build_client(config: &ClientConfig) -> aws_sdk_dynamodb::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));

    if let Some(endpoint) = &config.endpoint_url {
        tracing::info!(endpoint = endpoint.as_str(), "Using local DynamoDB endpoint");
        loader = loader
            .endpoint_url(endpoint)
            .region(Region::new(LOCAL_REGION))
            .credentials_provider(Credentials::new("key", "secret", None, None, "static"));
    }

    if let Some(secs) = config.operation_timeout_secs {
        loader = loader.timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(secs))
                .build(),
        );
    }

    let sdk_config = loader.load().await;
    aws_sdk_dynamodb::Client::new(&sdk_config)
}
