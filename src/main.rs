// file: src/main.rs
// version: 2.0.0
// guid: h8i9j0k1-l2m3-4567-8901-234567hijklm

//! devctl - Main entry point

use clap::Parser;
use colored::Colorize;
use devctl::{
    cli::{execute, Cli, CommandContext},
    config::ConfigLoader,
    logging::logger,
};
use tokio::signal;
use tracing::warn;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(cli.debug, cli.quiet) {
        eprintln!("{}", e);
    }

    let label = cli.command.failure_label();
    let Cli {
        command,
        config,
        dry_run,
        ..
    } = cli;

    let command_future = async move {
        let config = ConfigLoader::new().load(config.as_deref()).await?;
        let ctx = CommandContext::new(config, dry_run);
        execute(command, &ctx).await
    };

    // Children share our process group, so Ctrl+C reaches them as well
    let result = tokio::select! {
        result = command_future => result,
        _ = signal::ctrl_c() => {
            warn!("Interrupted by user");
            std::process::exit(130);
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", format!("Error {}:", label).red(), e);
        std::process::exit(1);
    }
}
