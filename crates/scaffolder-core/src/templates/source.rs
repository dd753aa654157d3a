//! Template loading from the bundled set or a local directory
//!
//! Both sources end up as a fully loaded [`TemplateSet`] before any project
//! work starts, so a missing template file fails the run early.

use super::manifest::{TemplateManifest, MANIFEST_FILE};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;

/// Templates compiled into a binary
#[derive(Debug, Clone, Copy)]
pub struct BundledTemplates {
    /// Contents of `template.yaml`
    pub manifest: &'static str,

    /// `(source path, contents)` pairs
    pub files: &'static [(&'static str, &'static [u8])],
}

/// Template source - either bundled with the binary or a local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Bundled(BundledTemplates),
    Local(PathBuf),
}

/// A manifest together with the contents of every file it lists
#[derive(Debug, Clone)]
pub struct TemplateSet {
    manifest: TemplateManifest,
    files: HashMap<String, Vec<u8>>,
}

impl TemplateSet {
    /// Load the manifest and every listed file from `source`
    pub async fn load(source: &TemplateSource) -> Result<Self> {
        match source {
            TemplateSource::Bundled(bundled) => Self::from_bundled(bundled),
            TemplateSource::Local(path) => {
                let manifest_path = path.join(MANIFEST_FILE);
                let content = fs::read_to_string(&manifest_path)
                    .await
                    .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
                let manifest = TemplateManifest::parse(&content)
                    .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

                let mut files = HashMap::new();
                for file in &manifest.files {
                    let file_path = path.join(&file.source);
                    let bytes = fs::read(&file_path).await.with_context(|| {
                        format!(
                            "Template file '{}' not found (specified in {})",
                            file_path.display(),
                            manifest_path.display()
                        )
                    })?;
                    files.insert(file.source.clone(), bytes);
                }

                Ok(Self { manifest, files })
            }
        }
    }

    fn from_bundled(bundled: &BundledTemplates) -> Result<Self> {
        let manifest = TemplateManifest::parse(bundled.manifest)
            .context("Failed to parse bundled template manifest")?;

        let available: HashMap<&str, &[u8]> = bundled.files.iter().copied().collect();
        let mut files = HashMap::new();
        for file in &manifest.files {
            let bytes = available.get(file.source.as_str()).ok_or_else(|| {
                anyhow::anyhow!("Bundled template is missing '{}'", file.source)
            })?;
            files.insert(file.source.clone(), bytes.to_vec());
        }

        Ok(Self { manifest, files })
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    /// Contents of a template file by its source path
    pub fn file_bytes(&self, source: &str) -> Result<&[u8]> {
        self.files
            .get(source)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "File '{}' not found in template '{}'",
                    source,
                    self.manifest.name
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "name: test\nfiles:\n  - source: index.html\n    dest: public/index.html\n";

    #[tokio::test]
    async fn test_bundled_templates_load() {
        const FILES: &[(&str, &[u8])] = &[("index.html", b"<html></html>")];
        let bundled = BundledTemplates {
            manifest: MANIFEST,
            files: FILES,
        };

        let set = TemplateSet::load(&TemplateSource::Bundled(bundled)).await.unwrap();

        assert_eq!(set.manifest().name, "test");
        assert_eq!(set.file_bytes("index.html").unwrap(), b"<html></html>");
        assert!(set.file_bytes("other.js").is_err());
    }

    #[tokio::test]
    async fn test_bundled_template_missing_file() {
        let bundled = BundledTemplates {
            manifest: MANIFEST,
            files: &[],
        };

        let err = TemplateSet::load(&TemplateSource::Bundled(bundled)).await.unwrap_err();
        assert!(err.to_string().contains("index.html"));
    }

    #[tokio::test]
    async fn test_local_templates_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>local</html>").unwrap();

        let set = TemplateSet::load(&TemplateSource::Local(dir.path().to_path_buf()))
            .await
            .unwrap();

        assert_eq!(set.file_bytes("index.html").unwrap(), b"<html>local</html>");
    }

    #[tokio::test]
    async fn test_local_templates_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();

        let err = TemplateSet::load(&TemplateSource::Local(dir.path().to_path_buf()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("template.yaml"));
    }
}
