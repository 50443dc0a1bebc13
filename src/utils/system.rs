// file: src/utils/system.rs
// version: 2.0.0
// guid: w3x4y5z6-a7b8-9012-3456-789012wxyzab

//! Locating the external tools on this machine

use crate::tools::Tool;
use std::path::PathBuf;
use tracing::debug;

/// Where a tool was found, if anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub tool: Tool,
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// System utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Resolve every tool devctl drives
    pub fn check_prerequisites() -> Vec<ToolStatus> {
        Tool::ALL
            .iter()
            .map(|&tool| {
                let path = which::which(tool.binary()).ok();
                debug!("{} -> {:?}", tool, path);
                ToolStatus { tool, path }
            })
            .collect()
    }

    /// Tools a prerequisite check did not find
    pub fn missing_tools(statuses: &[ToolStatus]) -> Vec<Tool> {
        statuses
            .iter()
            .filter(|status| !status.is_available())
            .map(|status| status.tool)
            .collect()
    }
}
