//! SageMaker retention sweep
//!
//! Applies the age-based retention policy to notebook instances and serving
//! endpoints in one region. Both operations share the same shape: gate on the
//! `clean` flag, list, then judge each resource against the whitelist, its
//! age, and its state. Only resources in `InService` state are deleted, and
//! under dry-run the delete call is suppressed while the deletion is still
//! logged as if it happened, so a simulate-only run shows the full outcome.

use crate::aws::sagemaker::{ResourceRecord, SageMakerApi};
use crate::cleanup::PROVIDER;
use crate::config::{Settings, Whitelist};
use crate::resource_tree::ResourceTree;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

/// Result tree service label
const SERVICE: &str = "SageMaker";
/// Whitelist service key
const WHITELIST_SERVICE: &str = "sagemaker";
/// The only state a resource may be deleted from
const STATUS_IN_SERVICE: &str = "InService";

/// Retention decision for a single examined resource
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    /// Exempt by whitelist; age is never computed for these
    Whitelisted,
    /// Within TTL (age in whole days)
    TooYoung(i64),
    /// Over TTL but not in a deletable state
    WrongState(String),
    /// Over TTL, in service, safe to delete (age in whole days)
    Eligible(i64),
}

/// Decide what to do with one resource under the given policy.
///
/// Order matters: whitelist first, then age, then state. Ids within the TTL
/// (`age <= ttl`) are kept; deletion requires strictly exceeding it.
fn assess(
    record: &ResourceRecord,
    whitelisted: bool,
    ttl_days: i64,
    now: DateTime<Utc>,
) -> Verdict {
    if whitelisted {
        return Verdict::Whitelisted;
    }

    let age_days = (now - record.last_modified).num_days();
    if age_days <= ttl_days {
        return Verdict::TooYoung(age_days);
    }

    if record.status != STATUS_IN_SERVICE {
        return Verdict::WrongState(record.status.clone());
    }

    Verdict::Eligible(age_days)
}

/// Cleanup handler for SageMaker resources in one region.
///
/// Best-effort: a failed list call aborts that kind's sweep for the run, a
/// failed delete is logged and iteration continues. Nothing propagates out
/// of [`run`](Self::run).
pub struct SageMakerCleanup<'a, S> {
    api: S,
    whitelist: &'a Whitelist,
    settings: &'a Settings,
    region: String,
}

impl<'a, S: SageMakerApi> SageMakerCleanup<'a, S> {
    pub fn new(
        api: S,
        whitelist: &'a Whitelist,
        settings: &'a Settings,
        region: impl Into<String>,
    ) -> Self {
        Self {
            api,
            whitelist,
            settings,
            region: region.into(),
        }
    }

    /// Sweep notebook instances, then endpoints
    pub async fn run(&self, tree: &mut ResourceTree) {
        self.notebooks(tree).await;
        self.endpoints(tree).await;
    }

    /// Sweep SageMaker notebook instances past their TTL
    pub async fn notebooks(&self, tree: &mut ResourceTree) {
        let policy = self.settings.services.sagemaker.notebooks;
        if !policy.clean {
            debug!(region = %self.region, "Skipping cleanup of SageMaker notebook instances");
            return;
        }

        let resources = match self.api.list_notebooks().await {
            Ok(resources) => resources,
            Err(e) => {
                error!(region = %self.region, error = ?e, "Failed to list SageMaker notebook instances");
                return;
            }
        };

        let now = Utc::now();
        for record in resources {
            let whitelisted = self
                .whitelist
                .contains(WHITELIST_SERVICE, "notebook", &record.id);

            match assess(&record, whitelisted, policy.ttl, now) {
                Verdict::Whitelisted => {
                    debug!(notebook = %record.id, "Notebook instance is whitelisted, not deleted");
                }
                Verdict::TooYoung(age_days) => {
                    debug!(
                        notebook = %record.id,
                        age_days,
                        ttl_days = policy.ttl,
                        "Notebook instance is within TTL, not deleted"
                    );
                }
                Verdict::WrongState(state) => {
                    debug!(
                        notebook = %record.id,
                        state = %state,
                        "Notebook instance cannot be deleted in its current state"
                    );
                }
                Verdict::Eligible(age_days) => {
                    if self.settings.general.dry_run {
                        info!(notebook = %record.id, age_days, "Notebook instance deleted");
                    } else {
                        match self.api.delete_notebook(&record.id).await {
                            Ok(()) => {
                                info!(notebook = %record.id, age_days, "Notebook instance deleted");
                            }
                            Err(e) => {
                                error!(
                                    notebook = %record.id,
                                    error = ?e,
                                    "Failed to delete notebook instance"
                                );
                            }
                        }
                    }
                }
            }

            tree.record(PROVIDER, &self.region, SERVICE, "Notebooks", &record.id);
        }
    }

    /// Sweep SageMaker endpoints past their TTL
    pub async fn endpoints(&self, tree: &mut ResourceTree) {
        let policy = self.settings.services.sagemaker.endpoints;
        if !policy.clean {
            debug!(region = %self.region, "Skipping cleanup of SageMaker endpoints");
            return;
        }

        let resources = match self.api.list_endpoints().await {
            Ok(resources) => resources,
            Err(e) => {
                error!(region = %self.region, error = ?e, "Failed to list SageMaker endpoints");
                return;
            }
        };

        let now = Utc::now();
        for record in resources {
            let whitelisted = self
                .whitelist
                .contains(WHITELIST_SERVICE, "endpoint", &record.id);

            match assess(&record, whitelisted, policy.ttl, now) {
                Verdict::Whitelisted => {
                    debug!(endpoint = %record.id, "Endpoint is whitelisted, not deleted");
                }
                Verdict::TooYoung(age_days) => {
                    debug!(
                        endpoint = %record.id,
                        age_days,
                        ttl_days = policy.ttl,
                        "Endpoint is within TTL, not deleted"
                    );
                }
                Verdict::WrongState(state) => {
                    debug!(
                        endpoint = %record.id,
                        state = %state,
                        "Endpoint cannot be deleted in its current state"
                    );
                }
                Verdict::Eligible(age_days) => {
                    if self.settings.general.dry_run {
                        info!(endpoint = %record.id, age_days, "Endpoint deleted");
                    } else {
                        match self.api.delete_endpoint(&record.id).await {
                            Ok(()) => {
                                info!(endpoint = %record.id, age_days, "Endpoint deleted");
                            }
                            Err(e) => {
                                error!(
                                    endpoint = %record.id,
                                    error = ?e,
                                    "Failed to delete endpoint"
                                );
                            }
                        }
                    }
                }
            }

            tree.record(PROVIDER, &self.region, SERVICE, "Endpoints", &record.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(age_days: i64, status: &str, now: DateTime<Utc>) -> ResourceRecord {
        ResourceRecord {
            id: "r-1".to_string(),
            last_modified: now - Duration::days(age_days),
            status: status.to_string(),
        }
    }

    #[test]
    fn whitelisted_wins_over_everything() {
        let now = Utc::now();
        // Old and in a broken state: whitelist still decides first
        let verdict = assess(&record(100, "Failed", now), true, 7, now);
        assert_eq!(verdict, Verdict::Whitelisted);
    }

    #[test]
    fn age_at_ttl_is_too_young() {
        let now = Utc::now();
        assert_eq!(
            assess(&record(7, "InService", now), false, 7, now),
            Verdict::TooYoung(7)
        );
        assert_eq!(
            assess(&record(0, "InService", now), false, 7, now),
            Verdict::TooYoung(0)
        );
    }

    #[test]
    fn over_ttl_wrong_state_is_kept() {
        let now = Utc::now();
        assert_eq!(
            assess(&record(10, "Updating", now), false, 7, now),
            Verdict::WrongState("Updating".to_string())
        );
    }

    #[test]
    fn over_ttl_in_service_is_eligible() {
        let now = Utc::now();
        assert_eq!(
            assess(&record(10, "InService", now), false, 7, now),
            Verdict::Eligible(10)
        );
        assert_eq!(
            assess(&record(8, "InService", now), false, 7, now),
            Verdict::Eligible(8)
        );
    }
}
