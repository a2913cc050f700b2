//! Configuration types for the sweeper
//!
//! Settings and whitelist are loaded from TOML files. Every field carries a
//! serde default so sparse files resolve to the documented defaults:
//! `clean = false`, `ttl = 7` days, `dry_run = true`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level sweeper settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub services: ServiceSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }
}

/// Global flags shared by all service handlers
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSettings {
    /// When set, deletions are logged but no destructive API call is made
    #[serde(default = "default_true")]
    pub dry_run: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self { dry_run: true }
    }
}

/// Per-service settings tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSettings {
    #[serde(default)]
    pub sagemaker: SageMakerSettings,
}

/// Retention policies for SageMaker resource kinds
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SageMakerSettings {
    #[serde(default)]
    pub notebooks: ResourcePolicy,
    #[serde(default)]
    pub endpoints: ResourcePolicy,
}

/// Retention policy for a single resource kind
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResourcePolicy {
    /// Whether this kind is cleaned at all (opt-in)
    #[serde(default)]
    pub clean: bool,
    /// Time-to-live in whole days; resources are deleted once strictly older
    #[serde(default = "default_ttl")]
    pub ttl: i64,
}

impl Default for ResourcePolicy {
    fn default() -> Self {
        Self {
            clean: false,
            ttl: default_ttl(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> i64 {
    7
}

/// Resource ids exempt from deletion, keyed by service then resource kind.
///
/// Kind keys are singular (`notebook`, `endpoint`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Whitelist(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl Whitelist {
    /// Load a whitelist from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read whitelist file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse whitelist file {}", path.display()))
    }

    /// Check whether an id is exempt from deletion for a service/kind
    pub fn contains(&self, service: &str, kind: &str, id: &str) -> bool {
        self.0
            .get(service)
            .and_then(|kinds| kinds.get(kind))
            .is_some_and(|ids| ids.iter().any(|w| w == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_resolve_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.general.dry_run);
        assert!(!settings.services.sagemaker.notebooks.clean);
        assert_eq!(settings.services.sagemaker.notebooks.ttl, 7);
        assert!(!settings.services.sagemaker.endpoints.clean);
        assert_eq!(settings.services.sagemaker.endpoints.ttl, 7);
    }

    #[test]
    fn partial_settings_keep_unset_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [services.sagemaker.endpoints]
            clean = true
            ttl = 30
            "#,
        )
        .unwrap();

        assert!(settings.general.dry_run, "dry_run defaults on");
        assert!(settings.services.sagemaker.endpoints.clean);
        assert_eq!(settings.services.sagemaker.endpoints.ttl, 30);
        assert!(!settings.services.sagemaker.notebooks.clean);
    }

    #[test]
    fn dry_run_can_be_disabled() {
        let settings: Settings = toml::from_str("[general]\ndry_run = false\n").unwrap();
        assert!(!settings.general.dry_run);
    }

    #[test]
    fn whitelist_lookup() {
        let whitelist: Whitelist = toml::from_str(
            r#"
            [sagemaker]
            notebook = ["nb-keep"]
            endpoint = ["ep-keep", "ep-prod"]
            "#,
        )
        .unwrap();

        assert!(whitelist.contains("sagemaker", "notebook", "nb-keep"));
        assert!(whitelist.contains("sagemaker", "endpoint", "ep-prod"));
        assert!(!whitelist.contains("sagemaker", "notebook", "nb-other"));
        assert!(!whitelist.contains("sagemaker", "endpoint", "nb-keep"));
        assert!(!whitelist.contains("ec2", "notebook", "nb-keep"));
    }

    #[test]
    fn empty_whitelist_matches_nothing() {
        let whitelist = Whitelist::default();
        assert!(!whitelist.contains("sagemaker", "notebook", "nb-1"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[services.sagemaker.notebooks]\nclean = true\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert!(settings.services.sagemaker.notebooks.clean);

        let missing = Settings::load(&dir.path().join("nope.toml"));
        assert!(missing.is_err());
    }
}
