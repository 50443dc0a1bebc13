// file: src/executor.rs
// version: 3.0.0
// guid: bb371682-35cb-4f34-b318-8bf69ec125bd

//! Running tool invocations

use crate::error::{DevctlError, Result};
use crate::output::OutputSink;
use crate::tools::Invocation;
use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::process::Command;
use tracing::debug;

/// Executes invocations built by the command builders
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion; launch failures and non-zero exits are both `DevctlError::Process`
    async fn run(&self, invocation: &Invocation, sink: &dyn OutputSink) -> Result<()>;

    /// Run silently and report whether the command exited zero
    async fn probe(&self, invocation: &Invocation) -> bool;
}

/// Spawns real child processes
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(invocation.tool.binary());
        cmd.args(&invocation.args).stdin(Stdio::null());
        if let Some(ref dir) = invocation.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation, sink: &dyn OutputSink) -> Result<()> {
        debug!("Executing: {}", invocation);

        let mut cmd = Self::command(invocation);
        if sink.passthrough() {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = cmd.status().await.map_err(|e| {
            debug!("Failed to launch {}: {}", invocation.tool, e);
            DevctlError::process(invocation.tool.binary(), &invocation.operation, e.to_string())
        })?;

        if !status.success() {
            debug!("{} exited with {}", invocation, status);
            return Err(DevctlError::process(
                invocation.tool.binary(),
                &invocation.operation,
                status.to_string(),
            ));
        }

        debug!("Command executed successfully");
        Ok(())
    }

    async fn probe(&self, invocation: &Invocation) -> bool {
        debug!("Probing: {}", invocation);
        Self::command(invocation)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Records invocations instead of running them; probes report "absent"
#[derive(Debug, Default)]
pub struct DryRunRunner {
    echo: bool,
    recorded: Mutex<Vec<Invocation>>,
}

impl DryRunRunner {
    /// Print each command to stdout as it is recorded
    pub fn new() -> Self {
        Self {
            echo: true,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Record without printing
    pub fn silent() -> Self {
        Self::default()
    }

    /// Everything recorded so far, probes included
    pub fn invocations(&self) -> Vec<Invocation> {
        self.recorded
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    fn record(&self, invocation: &Invocation) {
        if self.echo {
            let mut stdout = std::io::stdout();
            let _ = match invocation.working_dir {
                Some(ref dir) => writeln!(
                    stdout,
                    "DRY RUN: Would execute: {} (in {})",
                    invocation,
                    dir.display()
                ),
                None => writeln!(stdout, "DRY RUN: Would execute: {}", invocation),
            };
        }
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(invocation.clone());
        }
    }
}

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, invocation: &Invocation, _sink: &dyn OutputSink) -> Result<()> {
        self.record(invocation);
        Ok(())
    }

    async fn probe(&self, invocation: &Invocation) -> bool {
        self.record(invocation);
        false
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable runner for unit tests

    use super::*;

    /// Records invocations and fails those whose command line contains a marker
    #[derive(Default)]
    pub struct ScriptedRunner {
        pub fail_on: Vec<String>,
        pub probe_ok: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        pub fn failing(markers: &[&str]) -> Self {
            Self {
                fail_on: markers.iter().map(|m| m.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, invocation: &Invocation, _sink: &dyn OutputSink) -> Result<()> {
            let line = invocation.command_line();
            self.calls.lock().unwrap().push(line.clone());
            if self.fail_on.iter().any(|m| line.contains(m.as_str())) {
                return Err(DevctlError::process(
                    invocation.tool.binary(),
                    &invocation.operation,
                    "exit status: 1",
                ));
            }
            Ok(())
        }

        async fn probe(&self, invocation: &Invocation) -> bool {
            self.calls.lock().unwrap().push(invocation.command_line());
            self.probe_ok
        }
    }
}
