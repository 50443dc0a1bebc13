// file: src/deploy/mod.rs
// version: 1.0.0
// guid: f5d1a8c3-7e24-4b96-9c0a-3b6e2f4d8a17

//! Building applications and installing charts into the cluster
//!
//! Every operation resolves and validates its configuration before the first
//! invocation is handed to the runner, so an incomplete entry never leaves a
//! half-applied change behind.

use crate::config::{AppRelease, BuildTarget, Config, DependencyRelease, Repository};
use crate::executor::CommandRunner;
use crate::output::OutputSink;
use crate::tools::{docker, helm};
use crate::Result;
use tracing::{debug, info};

/// Drives docker and helm for the apps and dependencies in one configuration
pub struct Deployer<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a Config,
}

impl<'a> Deployer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a Config) -> Self {
        Self { runner, config }
    }

    /// Validated build for `app`
    pub fn build_target(&self, app: &str) -> Result<BuildTarget> {
        self.config.app(app)?.build_target(app)
    }

    /// Validated chart release for `app`
    pub fn app_release(&self, app: &str) -> Result<AppRelease> {
        self.config.app(app)?.release(app)
    }

    /// Build the container image for `app`
    pub async fn build_app(&self, app: &str, sink: &dyn OutputSink) -> Result<()> {
        let target = self.build_target(app)?;
        self.run_build(&target, sink).await
    }

    /// Install or upgrade the chart for `app`, registering repositories first
    pub async fn install_app(&self, app: &str, sink: &dyn OutputSink) -> Result<()> {
        let release = self.app_release(app)?;
        let repositories = self.config.repositories()?;

        self.configure_repositories(&repositories, sink).await?;
        self.run_app_install(&release, sink).await
    }

    /// Build the image, then install the chart
    pub async fn deploy_app(&self, app: &str, sink: &dyn OutputSink) -> Result<()> {
        let target = self.build_target(app)?;
        let release = self.app_release(app)?;
        let repositories = self.config.repositories()?;

        self.run_build(&target, sink).await?;
        self.configure_repositories(&repositories, sink).await?;
        self.run_app_install(&release, sink).await
    }

    /// Remove the release for `app`; only the project path and namespace are needed
    pub async fn uninstall_app(&self, app: &str, sink: &dyn OutputSink) -> Result<()> {
        let entry = self.config.app(app)?;
        entry.project_dir(app)?;

        self.runner
            .run(&helm::uninstall("application", app, entry.namespace()), sink)
            .await
    }

    /// Install or upgrade a single dependency, registering repositories first
    pub async fn install_dependency(&self, name: &str, sink: &dyn OutputSink) -> Result<()> {
        let release = self.config.dependency_release(name)?;
        let repositories = self.config.repositories()?;

        self.configure_repositories(&repositories, sink).await?;
        self.run_dependency_install(&release, sink).await
    }

    pub async fn uninstall_dependency(&self, name: &str, sink: &dyn OutputSink) -> Result<()> {
        let release = self.config.dependency_release(name)?;
        self.runner
            .run(
                &helm::uninstall("dependency", &release.name, release.namespace.as_deref()),
                sink,
            )
            .await
    }

    /// Install every dependency in name order, stopping at the first failure.
    ///
    /// Entries flagged `optional` are skipped unless `include_optional` is set.
    /// Returns the names that were installed.
    pub async fn deploy_dependencies(
        &self,
        include_optional: bool,
        sink: &dyn OutputSink,
    ) -> Result<Vec<String>> {
        let releases = self.config.dependency_releases(include_optional)?;
        let repositories = self.config.repositories()?;

        if releases.is_empty() {
            info!("No dependencies to deploy");
            return Ok(Vec::new());
        }

        self.configure_repositories(&repositories, sink).await?;

        let mut installed = Vec::with_capacity(releases.len());
        for release in &releases {
            self.run_dependency_install(release, sink).await?;
            installed.push(release.name.clone());
        }
        Ok(installed)
    }

    /// `helm repo add` for each repository, then one `helm repo update`; no-op when none are configured
    pub async fn configure_repositories(
        &self,
        repositories: &[Repository],
        sink: &dyn OutputSink,
    ) -> Result<()> {
        if repositories.is_empty() {
            debug!("No helm repositories configured");
            return Ok(());
        }

        for repo in repositories {
            self.runner.run(&helm::repo_add(repo), sink).await?;
        }
        self.runner.run(&helm::repo_update(), sink).await
    }

    async fn run_build(&self, target: &BuildTarget, sink: &dyn OutputSink) -> Result<()> {
        info!("Building image {} for {}", target.image_name, target.app);
        self.runner.run(&docker::build(target), sink).await
    }

    async fn run_app_install(&self, release: &AppRelease, sink: &dyn OutputSink) -> Result<()> {
        info!("Installing {} into namespace {}", release.app, release.namespace);
        self.runner.run(&helm::install_app(release), sink).await
    }

    async fn run_dependency_install(
        &self,
        release: &DependencyRelease,
        sink: &dyn OutputSink,
    ) -> Result<()> {
        info!("Installing dependency {} ({})", release.name, release.chart);
        self.runner.run(&helm::install_dependency(release), sink).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::executor::testing::ScriptedRunner;
    use crate::output::Passthrough;
    use crate::DevctlError;

    const CONFIG: &str = r#"
apps:
  web:
    project_path: /srv/web
    build:
      image_name: web:dev
      dockerfile: Dockerfile
      context: .
    install:
      chart_path: ./chart
      values_file: values.yaml
      namespace: web
  broken:
    project_path: /srv/broken
    build:
      image_name: broken:dev
dependencies:
  redis:
    chart_name: bitnami/redis
    version: 18.0.0
    namespace: data
  kafka:
    chart_name: bitnami/kafka
    optional: true
helm_repositories:
  bitnami:
    url: https://charts.bitnami.com/bitnami
"#;

    fn config() -> Config {
        ConfigLoader::new().parse(CONFIG, None).unwrap()
    }

    #[tokio::test]
    async fn test_build_app() {
        let runner = ScriptedRunner::default();
        let config = config();
        Deployer::new(&runner, &config)
            .build_app("web", &Passthrough)
            .await
            .unwrap();
        assert_eq!(runner.calls(), vec!["docker build -t web:dev -f ./Dockerfile ."]);
    }

    #[tokio::test]
    async fn test_invalid_app_spawns_nothing() {
        let runner = ScriptedRunner::default();
        let config = config();
        let err = Deployer::new(&runner, &config)
            .deploy_app("broken", &Passthrough)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "apps.broken.build.dockerfile is required");
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_install_app_registers_repositories_first() {
        let runner = ScriptedRunner::default();
        let config = config();
        Deployer::new(&runner, &config)
            .install_app("web", &Passthrough)
            .await
            .unwrap();

        assert_eq!(
            runner.calls(),
            vec![
                "helm repo add bitnami https://charts.bitnami.com/bitnami",
                "helm repo update",
                "helm upgrade --install web /srv/web/chart -f /srv/web/values.yaml --namespace web --create-namespace",
            ]
        );
    }

    #[tokio::test]
    async fn test_deploy_app_builds_then_installs() {
        let runner = ScriptedRunner::default();
        let config = config();
        Deployer::new(&runner, &config)
            .deploy_app("web", &Passthrough)
            .await
            .unwrap();

        let calls = runner.calls();
        assert!(calls[0].starts_with("docker build"));
        assert!(calls.last().unwrap().starts_with("helm upgrade --install web"));
    }

    #[tokio::test]
    async fn test_deploy_dependencies_skips_optional() {
        let runner = ScriptedRunner::default();
        let config = config();
        let installed = Deployer::new(&runner, &config)
            .deploy_dependencies(false, &Passthrough)
            .await
            .unwrap();

        assert_eq!(installed, vec!["redis"]);
        assert!(!runner.calls().iter().any(|c| c.contains("kafka")));
    }

    #[tokio::test]
    async fn test_deploy_dependencies_with_optional() {
        let runner = ScriptedRunner::default();
        let config = config();
        let installed = Deployer::new(&runner, &config)
            .deploy_dependencies(true, &Passthrough)
            .await
            .unwrap();
        assert_eq!(installed, vec!["kafka", "redis"]);
    }

    #[tokio::test]
    async fn test_deploy_dependencies_stops_at_first_failure() {
        let runner = ScriptedRunner::failing(&["bitnami/kafka"]);
        let config = config();
        let result = Deployer::new(&runner, &config)
            .deploy_dependencies(true, &Passthrough)
            .await;

        assert!(matches!(result, Err(DevctlError::Process { .. })));
        assert!(!runner.calls().iter().any(|c| c.contains("bitnami/redis")));
    }

    #[tokio::test]
    async fn test_install_dependency_end_to_end_args() {
        let runner = ScriptedRunner::default();
        let config = config();
        Deployer::new(&runner, &config)
            .install_dependency("redis", &Passthrough)
            .await
            .unwrap();

        assert_eq!(
            runner.calls().last().unwrap(),
            "helm upgrade --install redis bitnami/redis --version 18.0.0 --namespace data --create-namespace"
        );
    }

    #[tokio::test]
    async fn test_unknown_dependency_spawns_nothing() {
        let runner = ScriptedRunner::default();
        let config = config();
        let err = Deployer::new(&runner, &config)
            .uninstall_dependency("mongo", &Passthrough)
            .await
            .unwrap_err();
        assert!(matches!(err, DevctlError::NotFound { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_uninstall_app_uses_namespace() {
        let runner = ScriptedRunner::default();
        let config = config();
        Deployer::new(&runner, &config)
            .uninstall_app("web", &Passthrough)
            .await
            .unwrap();
        assert_eq!(runner.calls(), vec!["helm uninstall web --namespace web"]);
    }
}
