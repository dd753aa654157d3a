//! Hook declarations in Cordova's `config.xml`

use super::editor::{describe, TagContainer};
use super::xml::{Document, Element, XmlError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Root tag of a Cordova `config.xml`
pub const ROOT_TAG: &str = "widget";

const PLATFORM_TAG: &str = "platform";
const HOOK_TAG: &str = "hook";

/// A `<hook type=".." src=".." />` declaration, optionally scoped to a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    /// Lifecycle event, e.g. `before_prepare`
    #[serde(rename = "type")]
    pub kind: String,

    /// Script path relative to the project root
    pub src: String,

    /// Platform name (e.g. `android`); the hook goes under the root tag when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl Hook {
    pub fn to_element(&self) -> Element {
        Element::new(HOOK_TAG)
            .with_attr("type", self.kind.as_str())
            .with_attr("src", self.src.as_str())
    }
}

/// Append `hook` under the root tag, or under the matching `<platform>` tag
pub fn add_hook(document: &Document, hook: &Hook) -> Result<Document, XmlError> {
    let widget = document
        .first_child(ROOT_TAG, &[])
        .ok_or_else(|| XmlError::TagNotFound(ROOT_TAG.to_string()))?;

    let widget = match &hook.platform {
        None => widget.with_child(hook.to_element()),
        Some(platform) => {
            let filter = [("name", platform.as_str())];
            let platform_tag = widget
                .first_child(PLATFORM_TAG, &filter)
                .ok_or_else(|| XmlError::TagNotFound(describe(PLATFORM_TAG, &filter)))?
                .with_child(hook.to_element());
            widget.try_replace_first_child(PLATFORM_TAG, &filter, platform_tag)?
        }
    };

    document.try_replace_first_child(ROOT_TAG, &[], widget)
}

/// Read `config.xml`, append `hook`, and write the whole document back
pub async fn add_hook_to_file(path: &Path, hook: &Hook) -> Result<()> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document =
        Document::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    let document = add_hook(&document, hook).with_context(|| {
        format!(
            "Failed to add {} hook to {}",
            hook.kind,
            path.display()
        )
    })?;

    fs::write(path, document.to_xml_string())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
