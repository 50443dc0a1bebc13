// file: src/config/loader.rs
// version: 2.0.0
// guid: d4e5f6g7-h8i9-0123-4567-890123defghi

//! Configuration file loading and environment variable substitution

use super::Config;
use crate::{DevctlError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable that overrides `cluster.name`
pub const CLUSTER_NAME_ENV: &str = "DEVCTL_CLUSTER_NAME";

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Default location: `<config_dir>/devctl/config.yaml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("devctl").join("config.yaml"))
    }

    /// Load the file named by `--config`, or the default file when present.
    ///
    /// A missing default file yields an empty configuration; a missing
    /// explicit file is an error.
    pub async fn load(&self, explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No configuration file found, using defaults");
                    return self.apply_env_overrides(Config::default());
                }
            },
        };

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DevctlError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Using config file: {}", path.display());
        self.parse(&content, Some(path))
    }

    /// Parse configuration content; `source` anchors relative dependency paths
    pub fn parse(&self, content: &str, source: Option<PathBuf>) -> Result<Config> {
        let expanded = self.expand_env_vars(content)?;

        let mut config: Config = if expanded.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&expanded)?
        };
        config.source = source;

        self.apply_env_overrides(config)
    }

    /// Expand `${VAR}` references in configuration content.
    ///
    /// Full-line `#` comments are left as written. A reference in a trailing
    /// comment after a value is still expanded.
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| DevctlError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut missing_vars: Vec<String> = Vec::new();
        let mut expanded = String::with_capacity(content.len());

        for line in content.split_inclusive('\n') {
            if line.trim_start().starts_with('#') {
                expanded.push_str(line);
                continue;
            }

            let replaced = re.replace_all(line, |caps: &regex::Captures| {
                let var_name = &caps[1];
                match self.env_vars.get(var_name) {
                    Some(value) => value.clone(),
                    None => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        caps[0].to_string()
                    }
                }
            });
            expanded.push_str(&replaced);
        }

        if !missing_vars.is_empty() {
            return Err(DevctlError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(expanded)
    }

    fn apply_env_overrides(&self, mut config: Config) -> Result<Config> {
        if let Some(name) = self.env_vars.get(CLUSTER_NAME_ENV) {
            if !name.trim().is_empty() {
                debug!("Cluster name overridden by {}", CLUSTER_NAME_ENV);
                config.cluster.name = name.trim().to_string();
            }
        }
        Ok(config)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env_vars.insert(key.into(), value.into());
    }

    /// Remove an environment variable from the substitution set
    pub fn unset_env_var(&mut self, key: &str) {
        self.env_vars.remove(key);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
