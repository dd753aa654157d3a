//! External tool availability checks
//!
//! Every generator and package manager the pipeline shells out to is looked
//! up on `PATH` before any work starts.

use anyhow::Result;
use std::process::Command;

/// Configuration for a CLI tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Name of the tool binary (e.g., "cordova")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// How to install the tool when it is missing
    pub install_hint: &'static str,
}

impl ToolConfig {
    /// Check if the tool is installed and available in PATH
    pub fn is_installed(&self) -> bool {
        Command::new("which")
            .arg(self.name)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// Check that every tool is available; the error lists each missing tool with its install hint
pub fn check_tools(tools: &[ToolConfig]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .filter(|tool| !tool.is_installed())
        .map(|tool| format!("  - {} ({})", tool.display_name, tool.install_hint))
        .collect();

    if !missing.is_empty() {
        anyhow::bail!("Missing required tools:\n{}", missing.join("\n"));
    }

    Ok(())
}
