//! Template file copying into the generated project

use crate::templates::manifest::TemplateFile;
use crate::templates::source::TemplateSet;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Copy one template file byte-for-byte to `target_dir/<dest>`
pub async fn copy_file(templates: &TemplateSet, file: &TemplateFile, target_dir: &Path) -> Result<()> {
    let target_path = target_dir.join(file.destination());
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = templates.file_bytes(&file.source)?;
    fs::write(&target_path, content)
        .await
        .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

    Ok(())
}
