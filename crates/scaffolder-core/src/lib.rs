//! Scaffolder Core - Shared library for hybrid Cordova + React scaffolding
//!
//! This library generates a Cordova shell app and a `create-react-app` web app
//! separately, then merges their trees and manifests into one project. Product
//! specifics (generator commands, platforms, templates, instructions) come from
//! a [`ProductConfig`] implemented by the CLI binary.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - XML/JSON manifest editing, template loading
//!   and copying, external commands, scratch workspace handling
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and the
//!   sequential [`pipeline::run`]
//! - **Layer 3: Output** - [`Reporter`] implementations; the cliclack one is
//!   feature-gated
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based `ClackReporter`
//!
//! # Example Usage
//!
//! ```ignore
//! use scaffolder_core::{pipeline, CleanupHandle, CreateArgs, PlainReporter};
//!
//! let cleanup = CleanupHandle::new();
//! let args = CreateArgs { directory: Some("demo".into()), ..CreateArgs::default() };
//! let project = pipeline::run(&MyConfig, args, &PlainReporter, &cleanup).await?;
//! ```

pub mod manifest;
pub mod pipeline;
pub mod product;
pub mod report;
pub mod runtime;
pub mod templates;
pub mod workspace;

// Re-export main types for convenience
pub use pipeline::{run, AppIdentity, CreateArgs, ValidationError};
pub use product::ProductConfig;
pub use report::{PlainReporter, Reporter};
pub use runtime::{CommandSpec, ToolConfig};
pub use templates::BundledTemplates;
pub use workspace::CleanupHandle;

#[cfg(feature = "tui")]
pub use report::ClackReporter;
