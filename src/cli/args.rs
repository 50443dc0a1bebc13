// file: src/cli/args.rs
// version: 2.0.0
// guid: f6g7h8i9-j0k1-2345-6789-012345fghijk

//! Command line argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "devctl")]
#[command(about = "Drive a local k3d cluster, docker builds and helm releases from one config file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default is <config dir>/devctl/config.yaml)
    #[arg(long, global = true, env = "DEVCTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the commands that would run instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Shared `--verbose` switch
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Show the underlying tool output instead of a spinner
    #[arg(long)]
    pub verbose: bool,
}

/// Shared `--yes` switch for destructive operations
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an application's container image
    Build {
        #[arg(value_name = "APP_NAME")]
        app: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage the local cluster
    Cluster {
        #[command(subcommand)]
        action: ClusterAction,
    },

    /// Deploy resources to the cluster
    Deploy {
        #[command(subcommand)]
        target: DeployTarget,
    },

    /// Install a dependency or application chart
    Install {
        #[command(subcommand)]
        target: InstallTarget,
    },

    /// Uninstall a dependency or application release
    Uninstall {
        #[command(subcommand)]
        target: UninstallTarget,
    },

    /// Check that docker, k3d and helm are installed
    CheckPrereqs,
}

#[derive(Subcommand, Debug)]
pub enum ClusterAction {
    /// Create the cluster and its registry mirror
    Create {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete the cluster
    Delete {
        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        confirm: ConfirmArgs,

        /// Leave the registry mirror container in place
        #[arg(long)]
        keep_registry: bool,
    },

    /// Start a stopped cluster
    Start {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Stop a running cluster
    Stop {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum DeployTarget {
    /// Install every configured dependency
    Dependencies {
        /// Include dependencies marked optional
        #[arg(long)]
        optional: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build an application and install its chart
    App {
        #[arg(value_name = "APP_NAME")]
        app: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum InstallTarget {
    /// Install a single dependency
    Dependency {
        #[arg(value_name = "DEPENDENCY_NAME")]
        name: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Install an application chart
    App {
        #[arg(value_name = "APP_NAME")]
        app: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum UninstallTarget {
    /// Uninstall a single dependency
    Dependency {
        #[arg(value_name = "DEPENDENCY_NAME")]
        name: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Uninstall an application release
    App {
        #[arg(value_name = "APP_NAME")]
        app: String,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

impl Commands {
    /// What was being attempted, for `Error <label>: <cause>` reports
    pub fn failure_label(&self) -> String {
        match self {
            Commands::Build { app, .. } => format!("building application '{}'", app),
            Commands::Cluster { action } => match action {
                ClusterAction::Create { .. } => "creating cluster".to_string(),
                ClusterAction::Delete { .. } => "deleting cluster".to_string(),
                ClusterAction::Start { .. } => "starting cluster".to_string(),
                ClusterAction::Stop { .. } => "stopping cluster".to_string(),
            },
            Commands::Deploy { target } => match target {
                DeployTarget::Dependencies { .. } => "deploying dependencies".to_string(),
                DeployTarget::App { app, .. } => format!("deploying application '{}'", app),
            },
            Commands::Install { target } => match target {
                InstallTarget::Dependency { name, .. } => format!("installing dependency '{}'", name),
                InstallTarget::App { app, .. } => format!("installing application '{}'", app),
            },
            Commands::Uninstall { target } => match target {
                UninstallTarget::Dependency { name, .. } => {
                    format!("uninstalling dependency '{}'", name)
                }
                UninstallTarget::App { app, .. } => format!("uninstalling application '{}'", app),
            },
            Commands::CheckPrereqs => "checking prerequisites".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_install_dependency_verbose() {
        let cli = Cli::try_parse_from(["devctl", "install", "dependency", "redis", "--verbose"]).unwrap();
        match cli.command {
            Commands::Install {
                target: InstallTarget::Dependency { name, output },
            } => {
                assert_eq!(name, "redis");
                assert!(output.verbose);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["devctl", "build", "web", "--config", "/tmp/devctl.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/devctl.yaml")));
    }

    #[test]
    fn test_cluster_delete_flags() {
        let cli = Cli::try_parse_from(["devctl", "cluster", "delete", "-y", "--keep-registry"]).unwrap();
        match cli.command {
            Commands::Cluster {
                action: ClusterAction::Delete { confirm, keep_registry, .. },
            } => {
                assert!(confirm.yes);
                assert!(keep_registry);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_build_requires_app_name() {
        assert!(Cli::try_parse_from(["devctl", "build"]).is_err());
    }

    #[test]
    fn test_failure_label() {
        let cli = Cli::try_parse_from(["devctl", "deploy", "app", "web"]).unwrap();
        assert_eq!(cli.command.failure_label(), "deploying application 'web'");
    }
}
