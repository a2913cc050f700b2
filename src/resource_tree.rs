//! Shared audit trail of examined resources
//!
//! The tree records every resource id a handler examined, keyed
//! `provider -> region -> service -> kind`, whether or not the resource was
//! deleted. The caller creates one tree per run, each handler appends to it,
//! and the tree is reported once all handlers finish.

use serde::Serialize;
use std::collections::BTreeMap;

type KindMap = BTreeMap<String, Vec<String>>;
type ServiceMap = BTreeMap<String, KindMap>;
type RegionMap = BTreeMap<String, ServiceMap>;

/// Append-only nested map of examined resource ids
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResourceTree(BTreeMap<String, RegionMap>);

impl ResourceTree {
    /// Append an examined resource id under its provider/region/service/kind
    pub fn record(&mut self, provider: &str, region: &str, service: &str, kind: &str, id: &str) {
        self.0
            .entry(provider.to_string())
            .or_default()
            .entry(region.to_string())
            .or_default()
            .entry(service.to_string())
            .or_default()
            .entry(kind.to_string())
            .or_default()
            .push(id.to_string());
    }

    /// Ids recorded under a provider/region/service/kind, in examination order
    pub fn ids(&self, provider: &str, region: &str, service: &str, kind: &str) -> Option<&[String]> {
        self.0
            .get(provider)?
            .get(region)?
            .get(service)?
            .get(kind)
            .map(Vec::as_slice)
    }

    /// Total number of recorded ids across all paths
    pub fn len(&self) -> usize {
        self.0
            .values()
            .flat_map(|regions| regions.values())
            .flat_map(|services| services.values())
            .map(|ids| ids.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the tree as pretty-printed JSON for the post-run report
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
