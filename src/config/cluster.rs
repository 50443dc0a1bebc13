// file: src/config/cluster.rs
// version: 1.0.0
// guid: 52e8f0c1-9d47-4a3b-a2e6-7b1c5f8d0e94

//! Local cluster and registry mirror settings

use serde::Deserialize;

/// The optional `cluster` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// k3d cluster name
    pub name: String,
    /// Pull-through registry mirror
    pub registry: RegistryConfig,
}

/// Registry mirror container settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub enabled: bool,
    /// Docker container name
    pub name: String,
    /// Host port the registry listens on
    pub port: u16,
    /// Upstream registry proxied by the mirror
    pub remote_url: String,
    /// Remove the container when the cluster is deleted
    pub remove_on_delete: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "devctl-registry".to_string(),
            port: 5000,
            remote_url: "https://registry-1.docker.io".to_string(),
            remove_on_delete: true,
        }
    }
}

impl RegistryConfig {
    /// Endpoint the cluster nodes use to reach the mirror on the host
    pub fn endpoint(&self) -> String {
        format!("http://host.k3d.internal:{}", self.port)
    }
}
