//! Per-service cleanup handlers
//!
//! Each handler owns one provider service: it enumerates that service's
//! resources, applies the configured retention policy, and appends every
//! examined id to the shared result tree. Handlers are best-effort and never
//! propagate provider failures to the caller.

pub mod sagemaker;

pub use sagemaker::SageMakerCleanup;

/// Provider label used as the result tree root
pub const PROVIDER: &str = "AWS";
