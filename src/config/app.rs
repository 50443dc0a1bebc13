// file: src/config/app.rs
// version: 1.0.0
// guid: 7d1e9a42-5c3b-4e80-b6f2-90a8c4d1e357

//! Application entries: where the source lives, how to build it, how to install it

use super::require;
use crate::utils::paths::{expand_home, resolve_against};
use crate::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// An `apps.<name>` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppEntry {
    /// Filesystem location of the application source
    pub project_path: String,
    /// Container image build details
    pub build: BuildSection,
    /// Helm chart install details
    pub install: InstallSection,
}

/// Container image build details
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Image tag passed to `docker build -t`
    pub image_name: String,
    /// Dockerfile, relative to the build context
    pub dockerfile: String,
    /// Build context, relative to the project path
    pub context: String,
    /// `KEY=VALUE` pairs forwarded as `--build-arg`
    pub build_args: Vec<String>,
}

/// Helm chart install details
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InstallSection {
    pub chart_path: String,
    pub values_file: String,
    pub namespace: String,
}

/// A validated image build, ready for the docker command builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub app: String,
    pub project_path: PathBuf,
    pub image_name: String,
    pub dockerfile: String,
    pub context: String,
    pub build_args: Vec<String>,
}

/// A validated chart release for an application, with paths already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRelease {
    pub app: String,
    pub project_path: PathBuf,
    pub chart_path: PathBuf,
    pub values_file: PathBuf,
    pub namespace: String,
}

impl AppEntry {
    /// Expanded project path, or a missing field error naming `apps.<app>.project_path`
    pub fn project_dir(&self, app: &str) -> Result<PathBuf> {
        let raw = require(&self.project_path, || format!("apps.{}.project_path", app))?;
        Ok(expand_home(raw))
    }

    /// Validate the build section for `app`
    pub fn build_target(&self, app: &str) -> Result<BuildTarget> {
        let project_path = self.project_dir(app)?;
        let field = |name: &str| format!("apps.{}.build.{}", app, name);

        let image_name = require(&self.build.image_name, || field("image_name"))?;
        let dockerfile = require(&self.build.dockerfile, || field("dockerfile"))?;
        let context = require(&self.build.context, || field("context"))?;

        Ok(BuildTarget {
            app: app.to_string(),
            project_path,
            image_name: image_name.to_string(),
            dockerfile: dockerfile.to_string(),
            context: context.to_string(),
            build_args: self
                .build
                .build_args
                .iter()
                .filter(|arg| !arg.trim().is_empty())
                .cloned()
                .collect(),
        })
    }

    /// Validate the install section for `app` and resolve its paths against the project
    pub fn release(&self, app: &str) -> Result<AppRelease> {
        let project_path = self.project_dir(app)?;
        let field = |name: &str| format!("apps.{}.install.{}", app, name);

        let chart_path = require(&self.install.chart_path, || field("chart_path"))?;
        let values_file = require(&self.install.values_file, || field("values_file"))?;
        let namespace = require(&self.install.namespace, || field("namespace"))?;

        Ok(AppRelease {
            app: app.to_string(),
            chart_path: resolve_against(&project_path, chart_path),
            values_file: resolve_against(&project_path, values_file),
            project_path,
            namespace: namespace.to_string(),
        })
    }

    /// Namespace used when removing the release; uninstall does not need the full install section
    pub fn namespace(&self) -> Option<&str> {
        let ns = self.install.namespace.trim();
        (!ns.is_empty()).then_some(ns)
    }
}
