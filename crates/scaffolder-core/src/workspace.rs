//! Scratch workspace and filesystem moves
//!
//! The scratch directory is removed on every exit path: explicitly after a
//! successful run, on drop when the pipeline bails out, and through a shared
//! [`CleanupHandle`] from an interrupt handler.

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::fs;
use walkdir::WalkDir;

/// Subdirectory receiving the Cordova generator output
pub const SHELL_APP_DIR: &str = "temp-cordova-app";

/// Subdirectory receiving the create-react-app output
pub const WEB_APP_DIR: &str = "temp-react-app";

/// Shared record of the live scratch directory, usable from a signal handler
#[derive(Debug, Clone, Default)]
pub struct CleanupHandle {
    path: Arc<Mutex<Option<PathBuf>>>,
}

impl CleanupHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<PathBuf>> {
        self.path.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn register(&self, path: PathBuf) {
        *self.slot() = Some(path);
    }

    /// Forget `path` unless another workspace has registered since
    fn release(&self, path: &Path) {
        let mut slot = self.slot();
        if slot.as_deref() == Some(path) {
            slot.take();
        }
    }

    /// Directory currently scheduled for cleanup
    pub fn registered(&self) -> Option<PathBuf> {
        self.slot().clone()
    }

    /// Remove the registered directory if it still exists. Safe to call repeatedly.
    pub fn cleanup(&self) -> io::Result<()> {
        let path = self.slot().take();
        match path {
            Some(path) if path.exists() => std::fs::remove_dir_all(path),
            _ => Ok(()),
        }
    }
}

/// A randomly-named directory owned by one run
pub struct ScratchWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
    handle: CleanupHandle,
}

impl ScratchWorkspace {
    /// Create `<root>/.<name>-XXXXXX` and register it with `handle`
    pub fn create_in(root: &Path, name: &str, handle: &CleanupHandle) -> Result<Self> {
        let prefix = format!(".{}-", name);
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(root)
            .with_context(|| format!("Failed to create scratch directory in {}", root.display()))?;
        let path = dir.path().to_path_buf();
        handle.register(path.clone());

        Ok(Self {
            dir: Some(dir),
            path,
            handle: handle.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shell_app_dir(&self) -> PathBuf {
        self.path.join(SHELL_APP_DIR)
    }

    pub fn web_app_dir(&self) -> PathBuf {
        self.path.join(WEB_APP_DIR)
    }

    /// Delete the workspace now, reporting failures
    pub fn remove(mut self) -> Result<()> {
        self.handle.release(&self.path);
        if let Some(dir) = self.dir.take() {
            dir.close()
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        self.handle.release(&self.path);
        // TempDir removes itself when dropped
    }
}

/// `EXDEV` on Unix, `ERROR_NOT_SAME_DEVICE` on Windows
#[cfg(unix)]
const CROSS_DEVICE_ERROR: i32 = 18;
#[cfg(not(unix))]
const CROSS_DEVICE_ERROR: i32 = 17;

fn is_cross_device(error: &io::Error) -> bool {
    error.raw_os_error() == Some(CROSS_DEVICE_ERROR)
}

/// Move a file or directory, copying only when the rename crosses filesystems
///
/// The copy fallback never writes into an existing `to`.
pub async fn move_path(from: &Path, to: &Path) -> Result<()> {
    let rename_error = match fs::rename(from, to).await {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if !is_cross_device(&rename_error) || fs::symlink_metadata(to).await.is_ok() {
        return Err(rename_error)
            .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()));
    }

    let (src, dst) = (from.to_path_buf(), to.to_path_buf());
    tokio::task::spawn_blocking(move || copy_tree(&src, &dst))
        .await
        .context("Copy task panicked")?
        .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()))?;

    let metadata = fs::symlink_metadata(from).await?;
    if metadata.is_dir() {
        fs::remove_dir_all(from).await?;
    } else {
        fs::remove_file(from).await?;
    }
    Ok(())
}

/// Move every entry of `from_dir` (hidden ones included) into `to_dir`
pub async fn move_contents(from_dir: &Path, to_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(from_dir)
        .await
        .with_context(|| format!("Failed to read directory: {}", from_dir.display()))?;

    let mut moved = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let target = to_dir.join(entry.file_name());
        move_path(&entry.path(), &target).await?;
        moved.push(target);
    }
    Ok(moved)
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let target = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else if file_type.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    let destination = std::fs::read_link(link)?;
    std::os::unix::fs::symlink(destination, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::fs::copy(link, target).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_is_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let handle = CleanupHandle::new();

        let path = {
            let workspace = ScratchWorkspace::create_in(root.path(), "test", &handle).unwrap();
            assert!(workspace.path().is_dir());
            assert_eq!(handle.registered().as_deref(), Some(workspace.path()));
            workspace.path().to_path_buf()
        };

        assert!(!path.exists());
        assert!(handle.registered().is_none());
    }

    #[test]
    fn test_workspace_names_are_random() {
        let root = tempfile::tempdir().unwrap();
        let handle = CleanupHandle::new();
        let a = ScratchWorkspace::create_in(root.path(), "test", &handle).unwrap();
        let b = ScratchWorkspace::create_in(root.path(), "test", &handle).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(".test-"));
    }

    #[test]
    fn test_explicit_remove() {
        let root = tempfile::tempdir().unwrap();
        let handle = CleanupHandle::new();
        let workspace = ScratchWorkspace::create_in(root.path(), "test", &handle).unwrap();
        let path = workspace.path().to_path_buf();
        std::fs::create_dir_all(workspace.web_app_dir().join("src")).unwrap();

        workspace.remove().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_handle_cleanup_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let handle = CleanupHandle::new();
        let workspace = ScratchWorkspace::create_in(root.path(), "test", &handle).unwrap();
        std::fs::write(workspace.path().join("file"), "x").unwrap();

        handle.cleanup().unwrap();
        assert!(!workspace.path().exists());
        handle.cleanup().unwrap();

        // dropping after an interrupt-style cleanup must not fail
        drop(workspace);
    }

    #[tokio::test]
    async fn test_move_path_renames_directory() {
        let root = tempfile::tempdir().unwrap();
        let from = root.path().join("platforms");
        std::fs::create_dir_all(from.join("android")).unwrap();
        std::fs::write(from.join("android/build.gradle"), "x").unwrap();
        let to = root.path().join("app/platforms");
        std::fs::create_dir_all(root.path().join("app")).unwrap();

        move_path(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert!(to.join("android/build.gradle").is_file());
    }

    #[tokio::test]
    async fn test_move_path_missing_source_is_error() {
        let root = tempfile::tempdir().unwrap();
        let err = move_path(&root.path().join("nope"), &root.path().join("dest"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to move"));
    }

    #[tokio::test]
    async fn test_move_path_never_merges_into_existing_directory() {
        let root = tempfile::tempdir().unwrap();
        let from = root.path().join("app");
        let to = root.path().join("demo");
        std::fs::create_dir_all(&from).unwrap();
        std::fs::write(from.join("package.json"), "{}").unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(to.join("notes.txt"), "mine").unwrap();

        let err = move_path(&from, &to).await.unwrap_err();

        assert!(err.to_string().contains("Failed to move"));
        assert!(from.join("package.json").is_file());
        assert!(!to.join("package.json").exists());
        assert_eq!(std::fs::read_to_string(to.join("notes.txt")).unwrap(), "mine");
    }

    #[test]
    fn test_only_exdev_counts_as_cross_device() {
        assert!(is_cross_device(&io::Error::from_raw_os_error(CROSS_DEVICE_ERROR)));
        assert!(!is_cross_device(&io::Error::from(io::ErrorKind::AlreadyExists)));
        assert!(!is_cross_device(&io::Error::from(io::ErrorKind::NotFound)));
    }

    #[tokio::test]
    async fn test_move_contents_includes_hidden_entries() {
        let root = tempfile::tempdir().unwrap();
        let from = root.path().join("from");
        let to = root.path().join("to");
        std::fs::create_dir_all(from.join("src")).unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(from.join(".gitignore"), "node_modules\n").unwrap();
        std::fs::write(from.join("package.json"), "{}").unwrap();

        let moved = move_contents(&from, &to).await.unwrap();

        assert_eq!(moved.len(), 3);
        assert!(to.join(".gitignore").is_file());
        assert!(to.join("package.json").is_file());
        assert!(to.join("src").is_dir());
        assert_eq!(std::fs::read_dir(&from).unwrap().count(), 0);
    }

    #[test]
    fn test_copy_tree_copies_nested_files() {
        let root = tempfile::tempdir().unwrap();
        let from = root.path().join("a");
        std::fs::create_dir_all(from.join("b/c")).unwrap();
        std::fs::write(from.join("b/c/d.txt"), "deep").unwrap();

        copy_tree(&from, &root.path().join("copy")).unwrap();

        assert_eq!(
            std::fs::read_to_string(root.path().join("copy/b/c/d.txt")).unwrap(),
            "deep"
        );
    }
}
