//! SageMaker resource enumeration and deletion
//!
//! Wraps the SageMaker SDK client behind the `SageMakerApi` trait so the
//! cleanup handler can be exercised against a mock in tests.

use crate::aws::context::AwsContext;
use crate::aws::error::classify_sdk_error;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_sdk_sagemaker::Client;
use chrono::{DateTime, Utc};
use tracing::debug;

/// A managed SageMaker resource as returned by the list APIs
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    /// Resource name (notebook instance name or endpoint name)
    pub id: String,
    /// Last modification timestamp
    pub last_modified: DateTime<Utc>,
    /// Provider status string (e.g. "InService", "Creating", "Failed")
    pub status: String,
}

/// Provider API surface consumed by the cleanup handler.
///
/// One list and one eligibility-verified deletion call per resource kind.
#[async_trait]
pub trait SageMakerApi: Send + Sync {
    async fn list_notebooks(&self) -> Result<Vec<ResourceRecord>>;
    async fn list_endpoints(&self) -> Result<Vec<ResourceRecord>>;
    async fn delete_notebook(&self, name: &str) -> Result<()>;
    async fn delete_endpoint(&self, name: &str) -> Result<()>;
}

/// SageMaker client for managing notebook instances and endpoints
pub struct SageMakerClient {
    client: Client,
}

impl SageMakerClient {
    /// Create a new SageMaker client for a region
    pub async fn new(region: &str) -> Result<Self> {
        Self::with_profile(region, None).await
    }

    /// Create a SageMaker client for a region using a named profile
    pub async fn with_profile(region: &str, profile: Option<&str>) -> Result<Self> {
        let ctx = AwsContext::with_profile(region, profile).await;
        Ok(Self::from_context(&ctx))
    }

    /// Create a SageMaker client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.sagemaker_client(),
        }
    }
}

#[async_trait]
impl SageMakerApi for SageMakerClient {
    async fn list_notebooks(&self) -> Result<Vec<ResourceRecord>> {
        let response = self
            .client
            .list_notebook_instances()
            .send()
            .await
            .context("Failed to list notebook instances")?;

        let records: Vec<ResourceRecord> = response
            .notebook_instances()
            .iter()
            .map(|nb| ResourceRecord {
                id: nb.notebook_instance_name().unwrap_or_default().to_string(),
                // A summary without a timestamp reads as just-modified, so
                // it can never be eligible for deletion.
                last_modified: nb
                    .last_modified_time()
                    .map(to_utc)
                    .unwrap_or_else(Utc::now),
                status: nb
                    .notebook_instance_status()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        debug!(count = records.len(), "Listed notebook instances");
        Ok(records)
    }

    async fn list_endpoints(&self) -> Result<Vec<ResourceRecord>> {
        let response = self
            .client
            .list_endpoints()
            .send()
            .await
            .context("Failed to list endpoints")?;

        let records: Vec<ResourceRecord> = response
            .endpoints()
            .iter()
            .map(|ep| ResourceRecord {
                id: ep.endpoint_name().unwrap_or_default().to_string(),
                last_modified: ep
                    .last_modified_time()
                    .map(to_utc)
                    .unwrap_or_else(Utc::now),
                status: ep
                    .endpoint_status()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        debug!(count = records.len(), "Listed endpoints");
        Ok(records)
    }

    /// Remove a notebook instance that has outlived its TTL.
    ///
    /// Currently issues a read-only existence check instead of
    /// `DeleteNotebookInstance`. The tooling this replaces never called the
    /// destructive API for notebooks, and removing a notebook also requires
    /// it to be stopped first.
    // TODO: switch to stop + delete_notebook_instance once the service owners
    // confirm notebooks should actually be removed, not just existence-checked.
    async fn delete_notebook(&self, name: &str) -> Result<()> {
        self.client
            .describe_notebook_instance()
            .notebook_instance_name(name)
            .send()
            .await
            .map_err(|e| anyhow!(classify_sdk_error(&e)))
            .with_context(|| format!("Failed to delete notebook instance '{name}'"))?;

        Ok(())
    }

    async fn delete_endpoint(&self, name: &str) -> Result<()> {
        self.client
            .delete_endpoint()
            .endpoint_name(name)
            .send()
            .await
            .map_err(|e| anyhow!(classify_sdk_error(&e)))
            .with_context(|| format!("Failed to delete endpoint '{name}'"))?;

        Ok(())
    }
}

/// Convert an SDK timestamp to a chrono UTC timestamp
fn to_utc(dt: &aws_smithy_types::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smithy_timestamp_conversion() {
        let dt = aws_smithy_types::DateTime::from_secs(1_700_000_000);
        let utc = to_utc(&dt);
        assert_eq!(utc.timestamp(), 1_700_000_000);
    }
}
