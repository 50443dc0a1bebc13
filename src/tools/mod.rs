// file: src/tools/mod.rs
// version: 1.0.0
// guid: 9b4e1c7a-3f62-4d08-a5b9-2e7d0c8f1a46

//! Command builders for the external tools devctl drives
//!
//! Every builder is a pure function from a validated configuration record to
//! an [`Invocation`]; nothing here touches the filesystem or spawns processes.

pub mod docker;
pub mod helm;
pub mod k3d;

use std::fmt;
use std::path::{Path, PathBuf};

/// External binaries devctl knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Docker,
    K3d,
    Helm,
}

impl Tool {
    /// All tools, in the order prerequisites are reported
    pub const ALL: [Tool; 3] = [Tool::Docker, Tool::K3d, Tool::Helm];

    /// Executable name looked up on `PATH`
    pub fn binary(&self) -> &'static str {
        match self {
            Tool::Docker => "docker",
            Tool::K3d => "k3d",
            Tool::Helm => "helm",
        }
    }

    /// Install hint shown when the binary is missing
    pub fn install_hint(&self) -> &'static str {
        match self {
            Tool::Docker => "https://docs.docker.com/engine/install/",
            Tool::K3d => "https://k3d.io/#installation",
            Tool::Helm => "https://helm.sh/docs/intro/install/",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// One external command: tool, ordered arguments, optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    /// Short description of what the command does, used in error reports
    pub operation: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(tool: Tool, operation: impl Into<String>) -> Self {
        Self {
            tool,
            operation: operation.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `flag value` only when `value` is present
    pub fn flag_opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.arg(flag).arg(value),
            None => self,
        }
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Shell-like rendering for logs and dry runs
    pub fn command_line(&self) -> String {
        let mut line = self.tool.binary().to_string();
        for arg in &self.args {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push('\'');
                line.push_str(arg);
                line.push('\'');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_opt_skips_none() {
        let inv = Invocation::new(Tool::Helm, "test")
            .arg("uninstall")
            .flag_opt("--namespace", None);
        assert_eq!(inv.args, vec!["uninstall"]);
    }

    #[test]
    fn test_command_line_quotes_whitespace() {
        let inv = Invocation::new(Tool::Docker, "test").args(["build", "--build-arg", "MSG=hello world"]);
        assert_eq!(inv.command_line(), "docker build --build-arg 'MSG=hello world'");
    }
}
