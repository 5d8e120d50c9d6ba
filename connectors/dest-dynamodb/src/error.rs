//! Classification of SDK failures into [`WriteError`] categories.
//!
//! - `ServiceError` is mapped by its service error code
//! - `TimeoutError` becomes a retryable timeout
//! - `DispatchFailure` becomes a transient network error
//! - `ConstructionFailure` becomes a config error
//! - `ResponseError` becomes an internal error
//!
//! The SDK has already exhausted its retry budget by the time any of these
//! reach a worker; the `retryable` flag only describes the failure.

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use dynarestore_types::WriteError;

const MAX_ERROR_LEN: usize = 512;

fn truncated(msg: &str) -> String {
    if msg.len() <= MAX_ERROR_LEN {
        return msg.to_string();
    }
    let mut end = MAX_ERROR_LEN;
    while end > 0 && !msg.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &msg[..end])
}

/// Classify a failed `BatchWriteItem` call.
pub fn classify_sdk_error<E, R>(err: &SdkError<E, R>) -> WriteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service_err) => {
            let inner = service_err.err();
            let msg = truncated(&DisplayErrorContext(inner).to_string());
            classify_service_code(inner.code().unwrap_or("Unknown"), &msg)
        }
        SdkError::TimeoutError(_) => {
            WriteError::timeout("TIMEOUT", "DynamoDB operation timed out")
        }
        SdkError::DispatchFailure(e) => WriteError::transient_network(
            "DISPATCH_FAILURE",
            truncated(&format!("DynamoDB dispatch failure: {e:?}")),
        ),
        SdkError::ConstructionFailure(e) => WriteError::config(
            "REQUEST_CONSTRUCTION",
            truncated(&format!("DynamoDB request construction failure: {e:?}")),
        ),
        SdkError::ResponseError(e) => WriteError::internal(
            "RESPONSE_ERROR",
            truncated(&format!("DynamoDB response error: {e:?}")),
        ),
        _ => classify_error_message(&truncated(&format!("{err:?}"))),
    }
}

/// Map a DynamoDB service error code.
#[must_use]
pub fn classify_service_code(code: &str, msg: &str) -> WriteError {
    match code {
        "ProvisionedThroughputExceededException"
        | "RequestLimitExceeded"
        | "ThrottlingException"
        | "LimitExceededException" => WriteError::throttled(code, msg),
        "AccessDeniedException"
        | "UnrecognizedClientException"
        | "InvalidSignatureException"
        | "MissingAuthenticationTokenException"
        | "ExpiredTokenException" => WriteError::auth(code, msg),
        "ResourceNotFoundException" => WriteError::not_found(code, msg),
        "ValidationException"
        | "ItemCollectionSizeLimitExceededException"
        | "SerializationException" => WriteError::validation(code, msg),
        "InternalServerError" | "ServiceUnavailable" | "ReplicatedWriteConflictException" => {
            WriteError::transient_network(code, msg)
        }
        "InvalidEndpointException" => WriteError::config(code, msg),
        _ => classify_error_message(msg),
    }
}

/// Fallback when the code is missing or unrecognized.
fn classify_error_message(msg: &str) -> WriteError {
    let lower = msg.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        WriteError::timeout("TIMEOUT", msg)
    } else if lower.contains("throttl") || lower.contains("rate exceeded") {
        WriteError::throttled("THROTTLED", msg)
    } else if lower.contains("access denied") || lower.contains("unauthorized") {
        WriteError::auth("ACCESS_DENIED", msg)
    } else if lower.contains("not found") {
        WriteError::not_found("NOT_FOUND", msg)
    } else if lower.contains("validation") || lower.contains("invalid") {
        WriteError::validation("VALIDATION", msg)
    } else if lower.contains("connection") || lower.contains("unavailable") {
        WriteError::transient_network("CONNECTION", msg)
    } else {
        WriteError::internal("UNKNOWN", msg)
    }
}
