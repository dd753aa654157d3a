//! Template manifest types and parsing

use crate::manifest::Hook;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Directory (relative to the project root) that holds automation scripts
pub const SCRIPTS_DIR: &str = "scripts";

/// Name of the manifest file inside a template directory
pub const MANIFEST_FILE: &str = "template.yaml";

/// A file copied verbatim into the generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    /// Source path relative to the template directory
    pub source: String,

    /// Destination path in the project (defaults to source if not specified)
    #[serde(default)]
    pub dest: Option<String>,
}

impl TemplateFile {
    /// Get the destination path (falls back to source if dest not specified)
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }

    /// Scripts are copied after platform registration, everything else before it
    pub fn is_script(&self) -> bool {
        Path::new(self.destination()).starts_with(SCRIPTS_DIR)
    }
}

/// Template manifest (templates/<name>/template.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Files to copy, in order
    #[serde(default)]
    pub files: Vec<TemplateFile>,

    /// Hooks declared in `config.xml`
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

impl TemplateManifest {
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Files that replace web-app entry points
    pub fn entry_files(&self) -> impl Iterator<Item = &TemplateFile> {
        self.files.iter().filter(|file| !file.is_script())
    }

    /// Files that land in the scripts directory
    pub fn script_files(&self) -> impl Iterator<Item = &TemplateFile> {
        self.files.iter().filter(|file| file.is_script())
    }

    /// Hooks whose script is `dest`
    pub fn hooks_for<'a>(&'a self, dest: &'a str) -> impl Iterator<Item = &'a Hook> {
        self.hooks.iter().filter(move |hook| hook.src == dest)
    }

    /// Hooks pointing at a script no template file provides
    pub fn unbound_hooks(&self) -> impl Iterator<Item = &Hook> {
        self.hooks.iter().filter(move |hook| {
            !self
                .script_files()
                .any(|file| file.destination() == hook.src)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
name: cordova-react
description: Cordova shell with a create-react-app frontend
files:
  - source: index.html
    dest: public/index.html
  - source: index.js
    dest: src/index.js
  - source: startDevServer.sh
    dest: scripts/startDevServer.sh
  - source: updateWWWFiles.js
    dest: scripts/updateWWWFiles.js
  - source: scripts/extra.js
hooks:
  - type: before_prepare
    src: scripts/updateWWWFiles.js
  - type: before_deploy
    src: scripts/missing.js
    platform: android
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = TemplateManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.name, "cordova-react");
        assert_eq!(manifest.files.len(), 5);
        assert_eq!(manifest.hooks.len(), 2);
        assert_eq!(manifest.hooks[1].platform.as_deref(), Some("android"));
    }

    #[test]
    fn test_destination_defaults_to_source() {
        let manifest = TemplateManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.files[0].destination(), "public/index.html");
        assert_eq!(manifest.files[4].destination(), "scripts/extra.js");
    }

    #[test]
    fn test_files_split_by_scripts_dir() {
        let manifest = TemplateManifest::parse(MANIFEST).unwrap();
        let entries: Vec<_> = manifest.entry_files().map(|f| f.destination()).collect();
        let scripts: Vec<_> = manifest.script_files().map(|f| f.destination()).collect();

        assert_eq!(entries, vec!["public/index.html", "src/index.js"]);
        assert_eq!(
            scripts,
            vec![
                "scripts/startDevServer.sh",
                "scripts/updateWWWFiles.js",
                "scripts/extra.js"
            ]
        );
    }

    #[test]
    fn test_hooks_are_bound_to_scripts() {
        let manifest = TemplateManifest::parse(MANIFEST).unwrap();

        let bound: Vec<_> = manifest
            .hooks_for("scripts/updateWWWFiles.js")
            .map(|h| h.kind.as_str())
            .collect();
        assert_eq!(bound, vec!["before_prepare"]);

        let unbound: Vec<_> = manifest.unbound_hooks().map(|h| h.src.as_str()).collect();
        assert_eq!(unbound, vec!["scripts/missing.js"]);
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest = TemplateManifest::parse("name: bare\n").unwrap();
        assert!(manifest.files.is_empty());
        assert!(manifest.hooks.is_empty());
        assert!(manifest.description.is_empty());
    }
}
