//! Product configuration trait for CLI binaries
//!
//! This trait defines everything that is specific to one scaffolded product:
//! the generators it shells out to, the platforms it registers, the templates
//! it copies and the instructions it prints.

use crate::pipeline::AppIdentity;
use crate::runtime::{CommandSpec, ToolConfig};
use crate::templates::BundledTemplates;
use std::path::Path;

/// Configuration trait for scaffolded products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command and scratch directory names)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Identifier used when none is given on the command line
    fn default_app_id(&self) -> &'static str;

    /// Generate the native-shell skeleton into `target` (which must not exist yet)
    fn create_shell_app(&self, target: &Path, app: &AppIdentity) -> CommandSpec;

    /// Generate the web-app skeleton into `target` (which must not exist yet)
    fn create_web_app(&self, target: &Path) -> CommandSpec;

    /// Install dependencies; runs inside the merged project
    fn install_dependencies(&self) -> CommandSpec;

    /// Register one platform; runs inside the merged project
    fn add_platform(&self, platform: &str) -> CommandSpec;

    /// Platforms registered, in order
    fn platforms(&self) -> &'static [&'static str];

    /// Tools that must be on PATH before the run starts
    fn required_tools(&self) -> Vec<ToolConfig>;

    /// Templates compiled into the binary
    fn bundled_templates(&self) -> BundledTemplates;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, app: &AppIdentity) -> Vec<String>;
}
