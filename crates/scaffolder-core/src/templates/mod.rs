//! Template loading and copying
//!
//! This module provides:
//! - Template manifest types (`template.yaml`)
//! - Template loading from the bundled set or a local directory
//! - Byte-for-byte copying into the generated project

pub mod copier;
pub mod manifest;
pub mod source;

pub use copier::copy_file;
pub use manifest::{TemplateFile, TemplateManifest, SCRIPTS_DIR};
pub use source::{BundledTemplates, TemplateSet, TemplateSource};
