//! AWS error classification and handling
//!
//! Provides typed errors for AWS SDK operations using the `.code()` method
//! instead of string matching on Debug format.

use aws_sdk_sagemaker::error::ProvideErrorMetadata;
use thiserror::Error;

/// AWS error categories for cleanup logic
#[derive(Debug, Error)]
pub enum AwsError {
    /// Resource was not found (safe to skip in cleanup)
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Rate limit exceeded (retryable with backoff)
    #[error("Rate limit exceeded")]
    Throttled,

    /// Resource is busy with another operation (e.g. endpoint updating)
    #[error("Resource is in use")]
    ResourceInUse,

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, AwsError::Throttled | AwsError::ResourceInUse)
    }
}

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &["ResourceNotFound", "ResourceNotFoundException"];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Known AWS error codes for busy resources
const IN_USE_CODES: &[&str] = &["ResourceInUse", "ResourceInUseException"];

/// Classify an AWS SDK error using the error code.
///
/// SageMaker reports a missing endpoint on delete as a `ValidationException`
/// with a "Could not find" message rather than a dedicated not-found code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound { message },
        Some("ValidationException") if message.contains("Could not find") => {
            AwsError::NotFound { message }
        }
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        Some(c) if IN_USE_CODES.contains(&c) => AwsError::ResourceInUse,
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify any SDK operation error via its `ProvideErrorMetadata` impl.
///
/// `SdkError<E, R>` forwards metadata from the modeled service error, so one
/// generic helper covers every SageMaker operation.
pub fn classify_sdk_error<E>(error: &E) -> AwsError
where
    E: ProvideErrorMetadata,
{
    classify_aws_error(error.code(), error.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes() {
        for code in NOT_FOUND_CODES {
            let err = classify_aws_error(Some(code), Some("some message"));
            assert!(err.is_not_found(), "Expected NotFound for code: {code}");
        }
    }

    #[test]
    fn validation_exception_missing_endpoint() {
        let err = classify_aws_error(
            Some("ValidationException"),
            Some("Could not find endpoint \"ep-1\"."),
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn validation_exception_other_message() {
        let err = classify_aws_error(Some("ValidationException"), Some("1 validation error"));
        assert!(matches!(err, AwsError::Sdk { .. }));
    }

    #[test]
    fn throttling_codes() {
        for code in THROTTLING_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(err.is_retryable(), "Expected retryable for code: {code}");
            assert!(matches!(err, AwsError::Throttled));
        }
    }

    #[test]
    fn resource_in_use() {
        let err = classify_aws_error(Some("ResourceInUse"), Some("endpoint is updating"));
        assert!(err.is_retryable());
        assert!(matches!(err, AwsError::ResourceInUse));
    }

    #[test]
    fn unknown_and_missing_codes() {
        let err = classify_aws_error(Some("SomeNewError"), Some("details"));
        assert!(matches!(err, AwsError::Sdk { .. }));

        let err2 = classify_aws_error(None, Some("something failed"));
        assert!(matches!(err2, AwsError::Sdk { code: None, .. }));
    }
}
