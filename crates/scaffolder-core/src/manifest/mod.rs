//! Project manifest editing
//!
//! This module provides:
//! - An attributed XML tree with parsing and serialization (`xml`)
//! - Non-destructive tag lookups and edits over that tree (`editor`)
//! - Hook declarations in Cordova's `config.xml` (`config_xml`)
//! - `package.json` reconciliation (`package`)

pub mod config_xml;
pub mod editor;
pub mod package;
pub mod xml;

pub use config_xml::{add_hook, add_hook_to_file, Hook};
pub use editor::TagContainer;
pub use package::{reconcile, reconcile_files, PackageManifest};
pub use xml::{Attributes, Document, Element, Node, XmlError};
