// file: src/cluster/mod.rs
// version: 1.0.0
// guid: 2b9e4d7c-0a63-4f18-b5c2-d8e1a6f3c049

//! Local k3d cluster lifecycle, including the registry mirror container

pub mod registry;

pub use registry::{default_cache_dir, ensure_mirror_config, RegistryPolicy};

use crate::config::ClusterConfig;
use crate::executor::CommandRunner;
use crate::output::OutputSink;
use crate::tools::{docker, k3d, Invocation};
use crate::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Sequences k3d and docker invocations for one cluster
pub struct ClusterManager<'a> {
    runner: &'a dyn CommandRunner,
    cluster: &'a ClusterConfig,
    cache_dir: PathBuf,
    write_files: bool,
}

impl<'a> ClusterManager<'a> {
    pub fn new(runner: &'a dyn CommandRunner, cluster: &'a ClusterConfig) -> Self {
        Self {
            runner,
            cluster,
            cache_dir: default_cache_dir(),
            write_files: true,
        }
    }

    /// Keep the mirror configuration somewhere other than the user cache directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Skip writing the mirror configuration file (dry runs)
    pub fn without_file_writes(mut self) -> Self {
        self.write_files = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.cluster.name
    }

    /// Create the cluster; with a managed registry, start the mirror and point k3d at it
    pub async fn create(&self, policy: RegistryPolicy, sink: &dyn OutputSink) -> Result<()> {
        info!("Creating cluster '{}'", self.name());

        let registry_config = if policy.manage {
            self.ensure_registry(sink).await?;
            Some(self.mirror_config_path().await?)
        } else {
            None
        };

        self.runner
            .run(&k3d::create(self.name(), registry_config.as_deref()), sink)
            .await
    }

    /// Delete the cluster, then remove the registry best-effort when the policy says so
    pub async fn delete(&self, policy: RegistryPolicy, sink: &dyn OutputSink) -> Result<()> {
        info!("Deleting cluster '{}'", self.name());
        self.runner.run(&k3d::delete(self.name()), sink).await?;

        if policy.remove_on_delete {
            let registry = &self.cluster.registry;
            self.best_effort(&docker::registry_stop(registry), sink).await;
            self.best_effort(&docker::registry_remove(registry), sink).await;
        }
        Ok(())
    }

    /// Start a stopped cluster; the registry is started first, best-effort
    pub async fn start(&self, policy: RegistryPolicy, sink: &dyn OutputSink) -> Result<()> {
        if policy.manage {
            self.best_effort(&docker::registry_start(&self.cluster.registry), sink)
                .await;
        }
        self.runner.run(&k3d::start(self.name()), sink).await
    }

    /// Stop the cluster; the registry is stopped afterwards, best-effort
    pub async fn stop(&self, policy: RegistryPolicy, sink: &dyn OutputSink) -> Result<()> {
        self.runner.run(&k3d::stop(self.name()), sink).await?;
        if policy.manage {
            self.best_effort(&docker::registry_stop(&self.cluster.registry), sink)
                .await;
        }
        Ok(())
    }

    async fn ensure_registry(&self, sink: &dyn OutputSink) -> Result<()> {
        let registry = &self.cluster.registry;
        if self.runner.probe(&docker::registry_exists(registry)).await {
            debug!("Registry container '{}' exists, starting it", registry.name);
            self.runner.run(&docker::registry_start(registry), sink).await
        } else {
            info!("Starting registry mirror '{}' on port {}", registry.name, registry.port);
            self.runner.run(&docker::registry_run(registry), sink).await
        }
    }

    async fn mirror_config_path(&self) -> Result<PathBuf> {
        if self.write_files {
            ensure_mirror_config(&self.cache_dir, &self.cluster.registry).await
        } else {
            Ok(self.cache_dir.join(registry::MIRROR_CONFIG_FILE))
        }
    }

    async fn best_effort(&self, invocation: &Invocation, sink: &dyn OutputSink) {
        if let Err(e) = self.runner.run(invocation, sink).await {
            warn!("Ignoring registry cleanup failure: {}", e);
        }
    }
}
