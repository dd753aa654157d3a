//! Argument resolution and precondition checks
//!
//! Both checks run before anything touches the filesystem.

use super::CreateArgs;
use crate::product::ProductConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Terminal, user-facing rejections of the command line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No app name provided.")]
    MissingName,

    #[error(
        "Directory with name `{0}` already exists in the current folder. \
         You can try to delete it or to choose another app name."
    )]
    DestinationExists(String),
}

/// Who the generated app is: its directory, reverse-DNS identifier and display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub directory: String,
    pub id: String,
    pub name: String,
}

impl AppIdentity {
    /// Fill in the identifier and display name defaults
    pub fn resolve<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<Self, ValidationError> {
        let directory = non_empty(&args.directory).ok_or(ValidationError::MissingName)?;
        let id = non_empty(&args.identifier).unwrap_or(config.default_app_id());
        let name = non_empty(&args.display_name).unwrap_or(directory);

        Ok(Self {
            directory: directory.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The destination path under `base_dir`, which must not exist yet
pub fn check_destination(base_dir: &Path, app: &AppIdentity) -> Result<PathBuf, ValidationError> {
    let destination = base_dir.join(&app.directory);
    if destination.exists() {
        return Err(ValidationError::DestinationExists(app.directory.clone()));
    }
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::TestConfig;

    fn args(directory: Option<&str>, identifier: Option<&str>, name: Option<&str>) -> CreateArgs {
        CreateArgs {
            directory: directory.map(String::from),
            identifier: identifier.map(String::from),
            display_name: name.map(String::from),
            ..CreateArgs::default()
        }
    }

    #[test]
    fn test_defaults_fill_identifier_and_name() {
        let app = AppIdentity::resolve(&TestConfig, &args(Some("demo"), None, None)).unwrap();
        assert_eq!(
            app,
            AppIdentity {
                directory: "demo".to_string(),
                id: "io.cordova.hellocordova".to_string(),
                name: "demo".to_string(),
            }
        );
    }

    #[test]
    fn test_explicit_identity_is_kept() {
        let app = AppIdentity::resolve(
            &TestConfig,
            &args(Some("hello"), Some("com.example.hello"), Some("Hello")),
        )
        .unwrap();
        assert_eq!(app.directory, "hello");
        assert_eq!(app.id, "com.example.hello");
        assert_eq!(app.name, "Hello");
    }

    #[test]
    fn test_missing_or_blank_name_is_rejected() {
        assert_eq!(
            AppIdentity::resolve(&TestConfig, &args(None, None, None)),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            AppIdentity::resolve(&TestConfig, &args(Some("  "), None, None)),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_existing_destination_is_rejected() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("demo")).unwrap();
        let app = AppIdentity::resolve(&TestConfig, &args(Some("demo"), None, None)).unwrap();

        let err = check_destination(base.path(), &app).unwrap_err();

        assert_eq!(err, ValidationError::DestinationExists("demo".to_string()));
        assert!(err.to_string().contains("`demo` already exists"));
    }

    #[test]
    fn test_free_destination_is_accepted() {
        let base = tempfile::tempdir().unwrap();
        let app = AppIdentity::resolve(&TestConfig, &args(Some("demo"), None, None)).unwrap();
        assert_eq!(
            check_destination(base.path(), &app).unwrap(),
            base.path().join("demo")
        );
    }
}
