// file: src/config/mod.rs
// version: 2.0.0
// guid: a1b2c3d4-e5f6-7a8b-9c0d-1e2f3a4b5c6d

//! Configuration module for devctl
//!
//! Holds the typed view of the configuration file and resolves named
//! sections into validated records before any tool is invoked.

pub mod app;
pub mod cluster;
pub mod dependency;
pub mod loader;

pub use app::{AppEntry, AppRelease, BuildSection, BuildTarget, InstallSection};
pub use cluster::{ClusterConfig, RegistryConfig};
pub use dependency::{DependencyEntry, DependencyRelease, RepoEntry, Repository};
pub use loader::ConfigLoader;

use crate::{DevctlError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Loaded configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub apps: BTreeMap<String, AppEntry>,
    pub dependencies: BTreeMap<String, DependencyEntry>,
    pub helm_repositories: BTreeMap<String, RepoEntry>,
    pub cluster: ClusterConfig,

    /// File this configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Trimmed value of a required field, or a missing field error naming it
pub(crate) fn require<F>(value: &str, field: F) -> Result<&str>
where
    F: FnOnce() -> String,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DevctlError::missing(field()));
    }
    Ok(trimmed)
}

impl Config {
    /// Look up `apps.<name>`
    pub fn app(&self, name: &str) -> Result<&AppEntry> {
        self.apps
            .get(name)
            .ok_or_else(|| DevctlError::not_found("Application", name))
    }

    /// Look up `dependencies.<name>`
    pub fn dependency(&self, name: &str) -> Result<&DependencyEntry> {
        self.dependencies
            .get(name)
            .ok_or_else(|| DevctlError::not_found("Dependency", name))
    }

    /// Validated release for a single dependency
    pub fn dependency_release(&self, name: &str) -> Result<DependencyRelease> {
        self.dependency(name)?.release(name, &self.base_dir())
    }

    /// Validated releases in key order; optional entries only when `include_optional`
    pub fn dependency_releases(&self, include_optional: bool) -> Result<Vec<DependencyRelease>> {
        let base_dir = self.base_dir();
        self.dependencies
            .iter()
            .filter(|(_, entry)| include_optional || !entry.optional)
            .map(|(name, entry)| entry.release(name, &base_dir))
            .collect()
    }

    /// Validated helm repositories in key order
    pub fn repositories(&self) -> Result<Vec<Repository>> {
        self.helm_repositories
            .iter()
            .map(|(name, entry)| entry.repository(name))
            .collect()
    }

    /// Directory relative dependency paths resolve against
    pub fn base_dir(&self) -> PathBuf {
        self.source
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
