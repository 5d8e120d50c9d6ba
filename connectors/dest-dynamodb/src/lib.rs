//! DynamoDB destination: writes restore batches with `BatchWriteItem`.

pub mod client;
pub mod config;
pub mod encode;
pub mod error;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemError, BatchWriteItemOutput};
use dynarestore_engine::BatchWriter;
use dynarestore_types::{Record, WriteError};

pub use config::ClientConfig;
use encode::PreparedBatch;

/// [`BatchWriter`] backed by one shared SDK client.
#[derive(Debug, Clone)]
pub struct DynamoDbWriter {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoDbWriter {
    pub async fn connect(config: &ClientConfig) -> Self {
        Self::from_client(client::build_client(config).await)
    }

    #[must_use]
    pub fn from_client(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchWriter for DynamoDbWriter {
    async fn write_batch(&self, table: &str, items: Vec<Record>) -> Result<Vec<Record>, WriteError> {
        let batch = PreparedBatch::new(items)?;
        let batch_size = batch.len();

        let response = self
            .client
            .batch_write_item()
            .request_items(table, batch.requests().to_vec())
            .send()
            .await;

        let unprocessed = read_response(batch, table, response)?;
        tracing::debug!(
            table,
            batch_size,
            unprocessed = unprocessed.len(),
            "BatchWriteItem completed"
        );
        Ok(unprocessed)
    }
}

fn read_response<R: std::fmt::Debug>(
    batch: PreparedBatch,
    table: &str,
    response: Result<BatchWriteItemOutput, SdkError<BatchWriteItemError, R>>,
) -> Result<Vec<Record>, WriteError> {
    let output = response.map_err(|e| error::classify_sdk_error(&e))?;
    batch.unprocessed(output.unprocessed_items(), table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::types::error::{
        ProvisionedThroughputExceededException, ResourceNotFoundException,
    };
    use dynarestore_types::{AttributeValue, ErrorCategory};
    use pretty_assertions::assert_eq;

    type Response = Result<BatchWriteItemOutput, SdkError<BatchWriteItemError, ()>>;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                [
                    ("a", AttributeValue::B(vec![i as u8; 20])),
                    ("n", AttributeValue::N(i.to_string())),
                ]
                .into_iter()
                .collect()
            })
            .collect()
    }

    #[test]
    fn two_of_twenty_five_unprocessed_returns_exactly_those() {
        let items = records(25);
        let batch = PreparedBatch::new(items.clone()).unwrap();
        let output = BatchWriteItemOutput::builder()
            .unprocessed_items(
                "dest",
                vec![batch.requests()[3].clone(), batch.requests()[17].clone()],
            )
            .build();

        let unprocessed = read_response(batch, "dest", Response::Ok(output)).unwrap();
        assert_eq!(unprocessed, vec![items[3].clone(), items[17].clone()]);
    }

    #[test]
    fn empty_unprocessed_map_means_all_written() {
        let batch = PreparedBatch::new(records(25)).unwrap();
        let output = BatchWriteItemOutput::builder().build();
        assert!(read_response(batch, "dest", Response::Ok(output)).unwrap().is_empty());
    }

    #[test]
    fn throughput_exceeded_service_error_is_throttled() {
        let exception = ProvisionedThroughputExceededException::builder()
            .message("The level of configured provisioned throughput for the table was exceeded")
            .meta(
                ErrorMetadata::builder()
                    .code("ProvisionedThroughputExceededException")
                    .build(),
            )
            .build();
        let err = SdkError::service_error(
            BatchWriteItemError::ProvisionedThroughputExceededException(exception),
            (),
        );

        let batch = PreparedBatch::new(records(2)).unwrap();
        let error = read_response(batch, "dest", Response::Err(err)).unwrap_err();
        assert_eq!(error.category, ErrorCategory::Throttled);
        assert!(error.retryable);
        assert_eq!(error.code, "ProvisionedThroughputExceededException");
    }

    #[test]
    fn missing_table_service_error_is_not_found() {
        let exception = ResourceNotFoundException::builder()
            .message("Requested resource not found")
            .meta(ErrorMetadata::builder().code("ResourceNotFoundException").build())
            .build();
        let err = SdkError::service_error(
            BatchWriteItemError::ResourceNotFoundException(exception),
            (),
        );

        let batch = PreparedBatch::new(records(1)).unwrap();
        let error = read_response(batch, "dest", Response::Err(err)).unwrap_err();
        assert_eq!(error.category, ErrorCategory::NotFound);
    }

    #[test]
    fn sdk_timeout_is_timeout() {
        let err = SdkError::timeout_error("operation deadline exceeded");
        let batch = PreparedBatch::new(records(1)).unwrap();
        let error = read_response(batch, "dest", Response::Err(err)).unwrap_err();
        assert_eq!(error.category, ErrorCategory::Timeout);
        assert!(error.retryable);
    }
}
