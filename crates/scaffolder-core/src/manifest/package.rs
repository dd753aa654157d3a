//! `package.json` reconciliation between the web app and the Cordova app

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;

/// A parsed `package.json`: top-level keys in document order
pub type PackageManifest = Map<String, Value>;

pub const SCRIPTS_KEY: &str = "scripts";
pub const HOMEPAGE_KEY: &str = "homepage";

/// Relative homepage so the built bundle loads from Cordova's `www`
pub const HOMEPAGE: &str = "./";

/// npm scripts every generated project gets
pub const PROJECT_SCRIPTS: [(&str, &str); 3] = [
    ("start", "bash scripts/startDevServer.sh"),
    ("move", "mv build/* www/"),
    ("clear", "rm -rf www/*"),
];

/// Shallow merge: the shell manifest wins on conflicts, except that its `scripts` are dropped
pub fn merge_manifests(web: &PackageManifest, shell: &PackageManifest) -> PackageManifest {
    let mut merged = web.clone();
    for (key, value) in shell {
        if key == SCRIPTS_KEY {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Force-set the homepage and the project scripts
pub fn apply_project_overrides(manifest: &mut PackageManifest) {
    manifest.insert(HOMEPAGE_KEY.to_string(), Value::String(HOMEPAGE.to_string()));

    let scripts = manifest
        .entry(SCRIPTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !scripts.is_object() {
        *scripts = Value::Object(Map::new());
    }
    if let Value::Object(scripts) = scripts {
        for (name, command) in PROJECT_SCRIPTS {
            scripts.insert(name.to_string(), Value::String(command.to_string()));
        }
    }
}

/// Merge then override; the full reconciliation applied to generated projects
pub fn reconcile(web: &PackageManifest, shell: &PackageManifest) -> PackageManifest {
    let mut manifest = merge_manifests(web, shell);
    apply_project_overrides(&mut manifest);
    manifest
}

async fn read_manifest(path: &Path) -> Result<PackageManifest> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Reconcile two manifests on disk and write the result compactly to `output`
pub async fn reconcile_files(web: &Path, shell: &Path, output: &Path) -> Result<()> {
    let web_manifest = read_manifest(web).await?;
    let shell_manifest = read_manifest(shell).await?;

    let manifest = reconcile(&web_manifest, &shell_manifest);
    let content = serde_json::to_string(&manifest).context("Failed to serialize package.json")?;

    fs::write(output, content)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(())
}
