// file: src/cli/commands.rs
// version: 2.0.0
// guid: g7h8i9j0-k1l2-3456-7890-123456ghijkl

//! Command implementations for the CLI
//!
//! Each command validates its configuration, asks for confirmation when it
//! destroys something, runs its invocations behind the chosen output sink and
//! prints a one-line result. Failures are returned to `main`, which reports
//! them and exits non-zero.

use super::args::{ClusterAction, Commands, DeployTarget, InstallTarget, UninstallTarget};
use crate::cluster::{ClusterManager, RegistryPolicy};
use crate::config::Config;
use crate::deploy::Deployer;
use crate::executor::{CommandRunner, DryRunRunner, ProcessRunner};
use crate::output::{sink_for, OutputSink};
use crate::utils::prompt::confirm_stdin;
use crate::utils::SystemUtils;
use crate::{DevctlError, Result};
use colored::Colorize;
use std::future::Future;
use std::path::PathBuf;
use tracing::info;

/// How a command ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user declined a confirmation prompt; nothing was run
    Aborted,
}

/// Asks the user a yes/no question
pub type Prompt = fn(&str) -> Result<bool>;

/// Everything a command needs, passed in explicitly
pub struct CommandContext {
    pub config: Config,
    runner: Box<dyn CommandRunner>,
    dry_run: bool,
    prompt: Prompt,
    cache_dir: Option<PathBuf>,
}

impl CommandContext {
    /// Real processes, or a printing dry-run runner
    pub fn new(config: Config, dry_run: bool) -> Self {
        let runner: Box<dyn CommandRunner> = if dry_run {
            Box::new(DryRunRunner::new())
        } else {
            Box::new(ProcessRunner::new())
        };

        Self {
            config,
            runner,
            dry_run,
            prompt: confirm_stdin,
            cache_dir: None,
        }
    }

    /// Use a specific runner, e.g. a recording one
    pub fn with_runner(config: Config, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            config,
            runner,
            dry_run: false,
            prompt: confirm_stdin,
            cache_dir: None,
        }
    }

    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// Where the registry mirror configuration is written
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    fn sink(&self, verbose: bool) -> Box<dyn OutputSink> {
        sink_for(verbose || self.dry_run)
    }

    fn deployer(&self) -> Deployer<'_> {
        Deployer::new(self.runner.as_ref(), &self.config)
    }

    fn cluster(&self) -> ClusterManager<'_> {
        let mut manager = ClusterManager::new(self.runner.as_ref(), &self.config.cluster);
        if let Some(ref dir) = self.cache_dir {
            manager = manager.with_cache_dir(dir);
        }
        if self.dry_run && self.cache_dir.is_none() {
            manager = manager.without_file_writes();
        }
        manager
    }

    /// The prompt reads stdin on a blocking thread so Ctrl+C still reaches `main`
    async fn confirmed(&self, question: &str, assume_yes: bool) -> Result<bool> {
        if assume_yes {
            return Ok(true);
        }
        let prompt = self.prompt;
        let question = question.to_string();
        tokio::task::spawn_blocking(move || prompt(&question))
            .await
            .map_err(|e| DevctlError::system(format!("Confirmation prompt failed: {}", e)))?
    }
}

/// Show `message` on the sink while `work` runs
async fn with_progress<F>(sink: &dyn OutputSink, message: String, work: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    sink.begin(&message);
    let result = work.await;
    sink.end();
    result
}

fn success(message: impl AsRef<str>) -> Outcome {
    println!("{}", message.as_ref().green());
    Outcome::Completed
}

fn aborted() -> Outcome {
    println!("{}", "Aborted.".yellow());
    Outcome::Aborted
}

/// Dispatch a parsed command
pub async fn execute(command: Commands, ctx: &CommandContext) -> Result<Outcome> {
    match command {
        Commands::Build { app, output } => build_command(ctx, &app, output.verbose).await,
        Commands::Cluster { action } => match action {
            ClusterAction::Create { output } => cluster_create_command(ctx, output.verbose).await,
            ClusterAction::Delete {
                output,
                confirm,
                keep_registry,
            } => cluster_delete_command(ctx, output.verbose, confirm.yes, keep_registry).await,
            ClusterAction::Start { output } => cluster_start_command(ctx, output.verbose).await,
            ClusterAction::Stop { output } => cluster_stop_command(ctx, output.verbose).await,
        },
        Commands::Deploy { target } => match target {
            DeployTarget::Dependencies { optional, output } => {
                deploy_dependencies_command(ctx, optional, output.verbose).await
            }
            DeployTarget::App { app, output } => deploy_app_command(ctx, &app, output.verbose).await,
        },
        Commands::Install { target } => match target {
            InstallTarget::Dependency { name, output } => {
                install_dependency_command(ctx, &name, output.verbose).await
            }
            InstallTarget::App { app, output } => {
                install_app_command(ctx, &app, output.verbose).await
            }
        },
        Commands::Uninstall { target } => match target {
            UninstallTarget::Dependency { name, output } => {
                uninstall_dependency_command(ctx, &name, output.verbose).await
            }
            UninstallTarget::App {
                app,
                output,
                confirm,
            } => uninstall_app_command(ctx, &app, output.verbose, confirm.yes).await,
        },
        Commands::CheckPrereqs => check_prerequisites_command(),
    }
}

/// Build an application's image
pub async fn build_command(ctx: &CommandContext, app: &str, verbose: bool) -> Result<Outcome> {
    let deployer = ctx.deployer();
    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Building application {}...", app),
        deployer.build_app(app, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Application {} built successfully!", app)))
}

pub async fn cluster_create_command(ctx: &CommandContext, verbose: bool) -> Result<Outcome> {
    let cluster = ctx.cluster();
    let policy = RegistryPolicy::from_config(&ctx.config.cluster.registry, false);

    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Creating cluster {}...", cluster.name()),
        cluster.create(policy, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Cluster '{}' created successfully!", cluster.name())))
}

/// Delete the cluster after confirmation
pub async fn cluster_delete_command(
    ctx: &CommandContext,
    verbose: bool,
    assume_yes: bool,
    keep_registry: bool,
) -> Result<Outcome> {
    let cluster = ctx.cluster();
    let policy = RegistryPolicy::from_config(&ctx.config.cluster.registry, keep_registry);

    let question = format!("Delete cluster '{}'?", cluster.name());
    if !ctx.confirmed(&question, assume_yes).await? {
        info!("Cluster deletion declined");
        return Ok(aborted());
    }

    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Deleting cluster {}...", cluster.name()),
        cluster.delete(policy, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Cluster '{}' deleted successfully!", cluster.name())))
}

pub async fn cluster_start_command(ctx: &CommandContext, verbose: bool) -> Result<Outcome> {
    let cluster = ctx.cluster();
    let policy = RegistryPolicy::from_config(&ctx.config.cluster.registry, false);

    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Starting cluster {}...", cluster.name()),
        cluster.start(policy, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Cluster '{}' started successfully!", cluster.name())))
}

pub async fn cluster_stop_command(ctx: &CommandContext, verbose: bool) -> Result<Outcome> {
    let cluster = ctx.cluster();
    let policy = RegistryPolicy::from_config(&ctx.config.cluster.registry, false);

    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Stopping cluster {}...", cluster.name()),
        cluster.stop(policy, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Cluster '{}' stopped successfully!", cluster.name())))
}

/// Install every dependency, optionally including the optional ones
pub async fn deploy_dependencies_command(
    ctx: &CommandContext,
    optional: bool,
    verbose: bool,
) -> Result<Outcome> {
    let message = if optional {
        "Deploying dependencies (including optional)..."
    } else {
        "Deploying dependencies..."
    };

    let sink = ctx.sink(verbose);
    sink.begin(message);
    let result = ctx.deployer().deploy_dependencies(optional, sink.as_ref()).await;
    sink.end();
    let installed = result?;

    if installed.is_empty() {
        return Ok(success("No dependencies to deploy"));
    }
    if optional {
        Ok(success("Dependencies (including optional) deployed successfully!"))
    } else {
        Ok(success("Dependencies deployed successfully!"))
    }
}

/// Build an application and install its chart
pub async fn deploy_app_command(ctx: &CommandContext, app: &str, verbose: bool) -> Result<Outcome> {
    let deployer = ctx.deployer();
    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Deploying application {}...", app),
        deployer.deploy_app(app, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Application {} deployed successfully!", app)))
}

pub async fn install_dependency_command(
    ctx: &CommandContext,
    name: &str,
    verbose: bool,
) -> Result<Outcome> {
    let deployer = ctx.deployer();
    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Installing dependency {}...", name),
        deployer.install_dependency(name, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Dependency '{}' installed successfully!", name)))
}

pub async fn install_app_command(ctx: &CommandContext, app: &str, verbose: bool) -> Result<Outcome> {
    let deployer = ctx.deployer();
    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Installing application {}...", app),
        deployer.install_app(app, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Application {} installed successfully!", app)))
}

pub async fn uninstall_dependency_command(
    ctx: &CommandContext,
    name: &str,
    verbose: bool,
) -> Result<Outcome> {
    let deployer = ctx.deployer();
    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Uninstalling dependency {}...", name),
        deployer.uninstall_dependency(name, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Dependency '{}' uninstalled successfully!", name)))
}

/// Uninstall an application release after confirmation
pub async fn uninstall_app_command(
    ctx: &CommandContext,
    app: &str,
    verbose: bool,
    assume_yes: bool,
) -> Result<Outcome> {
    let entry = ctx.config.app(app)?;
    entry.project_dir(app)?;

    let question = format!("Uninstall application '{}'?", app);
    if !ctx.confirmed(&question, assume_yes).await? {
        info!("Uninstall of {} declined", app);
        return Ok(aborted());
    }

    let deployer = ctx.deployer();
    let sink = ctx.sink(verbose);
    with_progress(
        sink.as_ref(),
        format!("Uninstalling application {}...", app),
        deployer.uninstall_app(app, sink.as_ref()),
    )
    .await?;

    Ok(success(format!("Application {} uninstalled successfully!", app)))
}

/// Report which external tools are available
pub fn check_prerequisites_command() -> Result<Outcome> {
    let statuses = SystemUtils::check_prerequisites();

    for status in &statuses {
        match status.path {
            Some(ref path) => println!("{} {} ({})", "✓".green(), status.tool, path.display()),
            None => println!(
                "{} {} not found, see {}",
                "✗".red(),
                status.tool,
                status.tool.install_hint()
            ),
        }
    }

    let missing: Vec<&str> = SystemUtils::missing_tools(&statuses)
        .into_iter()
        .map(|tool| tool.binary())
        .collect();

    if missing.is_empty() {
        Ok(success("All required tools are available"))
    } else {
        Err(DevctlError::system(format!(
            "Missing {} required tool(s): {}",
            missing.len(),
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::executor::testing::ScriptedRunner;
    use std::sync::Arc;

    const CONFIG: &str = r#"
apps:
  web:
    project_path: /srv/web
    install:
      namespace: web
cluster:
  name: dev
  registry:
    enabled: false
"#;

    /// Shares one scripted runner between the context and the assertions
    struct Shared(Arc<ScriptedRunner>);

    #[async_trait::async_trait]
    impl CommandRunner for Shared {
        async fn run(
            &self,
            invocation: &crate::tools::Invocation,
            sink: &dyn OutputSink,
        ) -> Result<()> {
            self.0.run(invocation, sink).await
        }

        async fn probe(&self, invocation: &crate::tools::Invocation) -> bool {
            self.0.probe(invocation).await
        }
    }

    fn context(prompt: Prompt) -> (CommandContext, Arc<ScriptedRunner>) {
        let runner = Arc::new(ScriptedRunner::default());
        let config = ConfigLoader::new().parse(CONFIG, None).unwrap();
        let ctx = CommandContext::with_runner(config, Box::new(Shared(runner.clone())))
            .with_prompt(prompt);
        (ctx, runner)
    }

    #[tokio::test]
    async fn test_declined_delete_runs_nothing() {
        let (ctx, runner) = context(|_| Ok(false));
        let outcome = cluster_delete_command(&ctx, false, false, false).await.unwrap();
        assert_eq!(outcome, Outcome::Aborted);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_delete_runs_k3d() {
        let (ctx, runner) = context(|_| Ok(true));
        let outcome = cluster_delete_command(&ctx, false, false, false).await.unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(runner.calls(), vec!["k3d cluster delete dev"]);
    }

    #[tokio::test]
    async fn test_yes_flag_skips_prompt() {
        let (ctx, runner) = context(|_| panic!("prompt must not be shown"));
        cluster_delete_command(&ctx, false, true, false).await.unwrap();
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_uninstall_unknown_app_fails_before_prompt() {
        let (ctx, runner) = context(|_| panic!("prompt must not be shown"));
        let err = uninstall_app_command(&ctx, "api", false, false).await.unwrap_err();
        assert!(matches!(err, DevctlError::NotFound { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_declined_uninstall_runs_nothing() {
        let (ctx, runner) = context(|_| Ok(false));
        let outcome = uninstall_app_command(&ctx, "web", false, false).await.unwrap();
        assert_eq!(outcome, Outcome::Aborted);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_runs_off_the_async_thread() {
        let (ctx, runner) = context(|question| {
            assert_eq!(question, "Delete cluster 'dev'?");
            assert_eq!(std::thread::current().name(), Some("tokio-runtime-worker"));
            Ok(true)
        });
        let outcome = cluster_delete_command(&ctx, false, false, false).await.unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(runner.calls(), vec!["k3d cluster delete dev"]);
    }

    #[tokio::test]
    async fn test_failing_prompt_is_an_error() {
        let (ctx, runner) = context(|_| panic!("stdin went away"));
        let err = cluster_delete_command(&ctx, false, false, false).await.unwrap_err();
        assert!(matches!(err, DevctlError::System(_)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_build_missing_section_names_field() {
        let (ctx, runner) = context(|_| Ok(true));
        let err = build_command(&ctx, "web", false).await.unwrap_err();
        assert_eq!(err.to_string(), "apps.web.build.image_name is required");
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cluster_create_without_registry() {
        let (ctx, runner) = context(|_| Ok(true));
        cluster_create_command(&ctx, false).await.unwrap();
        assert_eq!(runner.calls(), vec!["k3d cluster create dev"]);
    }
}
