//! AWS client modules
//!
//! This module provides wrappers around AWS SDK clients for:
//! - SageMaker: notebook instance and endpoint enumeration/deletion

pub mod context;
pub mod error;
pub mod sagemaker;

pub use context::AwsContext;
pub use error::{classify_aws_error, classify_sdk_error, AwsError};
pub use sagemaker::{ResourceRecord, SageMakerApi, SageMakerClient};
