// file: src/cluster/registry.rs
// version: 1.0.0
// guid: 8c2f6a0e-5b19-4d73-a4e8-1f7b3d9c2a65

//! Registry mirror lifecycle policy and the k3d mirror configuration file

use crate::config::RegistryConfig;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name k3d reads through `--registry-config`
pub const MIRROR_CONFIG_FILE: &str = "registries.yaml";

/// What the cluster commands do with the registry mirror container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryPolicy {
    /// Ensure the container runs on create and follow the cluster on start/stop
    pub manage: bool,
    /// Stop and remove the container after the cluster is deleted
    pub remove_on_delete: bool,
}

impl RegistryPolicy {
    /// Policy from configuration; `keep_registry` comes from `cluster delete --keep-registry`
    pub fn from_config(registry: &RegistryConfig, keep_registry: bool) -> Self {
        Self {
            manage: registry.enabled,
            remove_on_delete: registry.enabled && registry.remove_on_delete && !keep_registry,
        }
    }

    /// Leave the registry alone entirely
    pub fn unmanaged() -> Self {
        Self {
            manage: false,
            remove_on_delete: false,
        }
    }
}

/// Default location: `<cache_dir>/devctl`
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("devctl")
}

/// k3s `registries.yaml` document
#[derive(Debug, Serialize)]
struct MirrorConfig {
    mirrors: BTreeMap<String, Mirror>,
}

#[derive(Debug, Serialize)]
struct Mirror {
    endpoint: Vec<String>,
}

/// k3s `registries.yaml` content mirroring docker.io through the local registry
pub fn mirror_config(registry: &RegistryConfig) -> Result<String> {
    let mut mirrors = BTreeMap::new();
    mirrors.insert(
        "docker.io".to_string(),
        Mirror {
            endpoint: vec![registry.endpoint()],
        },
    );
    Ok(serde_yaml::to_string(&MirrorConfig { mirrors })?)
}

/// Write the mirror configuration unless the file already matches the registry settings
pub async fn ensure_mirror_config(cache_dir: &Path, registry: &RegistryConfig) -> Result<PathBuf> {
    let path = cache_dir.join(MIRROR_CONFIG_FILE);
    let content = mirror_config(registry)?;

    if tokio::fs::try_exists(&path).await? {
        if tokio::fs::read_to_string(&path).await? == content {
            debug!("Registry mirror config up to date at {}", path.display());
            return Ok(path);
        }
        info!("Registry settings changed, rewriting {}", path.display());
    }

    tokio::fs::create_dir_all(cache_dir).await?;
    tokio::fs::write(&path, content).await?;
    info!("Wrote registry mirror config to {}", path.display());
    Ok(path)
}
