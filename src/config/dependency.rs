// file: src/config/dependency.rs
// version: 1.0.0
// guid: a94c2b7e-1f30-4d5a-8e6b-3c7f0d2a9b18

//! Third-party chart dependencies and the helm repositories that serve them

use super::require;
use crate::utils::paths::resolve_against;
use crate::{DevctlError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A `dependencies.<name>` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DependencyEntry {
    /// Chart reference, e.g. `bitnami/redis`
    pub chart_name: String,
    pub version: String,
    pub namespace: String,
    pub values_file: String,
    /// Skipped by `deploy dependencies` unless `--optional` is given
    pub optional: bool,
}

/// A `helm_repositories.<name>` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RepoEntry {
    pub url: String,
}

/// A validated dependency release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRelease {
    pub name: String,
    pub chart: String,
    pub version: Option<String>,
    pub namespace: Option<String>,
    pub values_file: Option<PathBuf>,
}

/// A validated helm repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl DependencyEntry {
    /// Validate the entry; a relative values file resolves against `base_dir`
    pub fn release(&self, name: &str, base_dir: &Path) -> Result<DependencyRelease> {
        let chart = require(&self.chart_name, || {
            format!("dependencies.{}.chart_name", name)
        })?;

        Ok(DependencyRelease {
            name: name.to_string(),
            chart: chart.to_string(),
            version: non_empty(&self.version).map(str::to_string),
            namespace: non_empty(&self.namespace).map(str::to_string),
            values_file: non_empty(&self.values_file).map(|v| resolve_against(base_dir, v)),
        })
    }
}

impl RepoEntry {
    pub fn repository(&self, name: &str) -> Result<Repository> {
        let raw = require(&self.url, || format!("helm_repositories.{}.url", name))?;
        let parsed = url::Url::parse(raw).map_err(|e| {
            DevctlError::config(format!(
                "helm_repositories.{}.url '{}' is not a valid URL: {}",
                name, raw, e
            ))
        })?;

        Ok(Repository {
            name: name.to_string(),
            url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_drops_empty_optionals() {
        let entry = DependencyEntry {
            chart_name: "bitnami/redis".to_string(),
            version: "18.0.0".to_string(),
            namespace: "data".to_string(),
            ..Default::default()
        };

        let release = entry.release("redis", Path::new("/cfg")).unwrap();
        assert_eq!(release.chart, "bitnami/redis");
        assert_eq!(release.version.as_deref(), Some("18.0.0"));
        assert_eq!(release.namespace.as_deref(), Some("data"));
        assert_eq!(release.values_file, None);
    }

    #[test]
    fn test_release_requires_chart_name() {
        let entry = DependencyEntry {
            version: "1.0.0".to_string(),
            ..Default::default()
        };
        let err = entry.release("redis", Path::new("/cfg")).unwrap_err();
        assert_eq!(err.to_string(), "dependencies.redis.chart_name is required");
    }

    #[test]
    fn test_values_file_resolves_against_base_dir() {
        let entry = DependencyEntry {
            chart_name: "bitnami/postgresql".to_string(),
            values_file: "values/pg.yaml".to_string(),
            ..Default::default()
        };
        let release = entry.release("pg", Path::new("/home/dev/.config/devctl")).unwrap();
        assert_eq!(
            release.values_file,
            Some(PathBuf::from("/home/dev/.config/devctl/values/pg.yaml"))
        );
    }

    #[test]
    fn test_repository_rejects_bad_url() {
        let entry = RepoEntry {
            url: "not a url".to_string(),
        };
        assert!(matches!(entry.repository("bitnami"), Err(DevctlError::Config(_))));
    }

    #[test]
    fn test_repository_keeps_url() {
        let entry = RepoEntry {
            url: "https://charts.bitnami.com/bitnami".to_string(),
        };
        let repo = entry.repository("bitnami").unwrap();
        assert_eq!(repo.url, "https://charts.bitnami.com/bitnami");
    }
}
