//! The scaffolding pipeline
//!
//! Steps run strictly in order; each one prints a marker, does its work and
//! prints `Done!`. The first failure aborts the run and the scratch workspace
//! is removed on the way out. The destination directory is only created once
//! everything else has succeeded.

mod validate;

pub use validate::{check_destination, AppIdentity, ValidationError};

use crate::manifest::{self, Hook};
use crate::product::ProductConfig;
use crate::report::Reporter;
use crate::runtime::check_tools;
use crate::templates::{self, TemplateFile, TemplateSet, TemplateSource, SCRIPTS_DIR};
use crate::workspace::{self, CleanupHandle, ScratchWorkspace};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

const PLATFORMS_DIR: &str = "platforms";
const PLUGINS_DIR: &str = "plugins";
const WWW_DIR: &str = "www";
const CONFIG_XML: &str = "config.xml";
const PACKAGE_JSON: &str = "package.json";
const YARN_LOCK: &str = "yarn.lock";

/// Arguments for one scaffolding run
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Destination directory name
    pub directory: Option<String>,

    /// Reverse-DNS app identifier
    pub identifier: Option<String>,

    /// Human-readable app name
    pub display_name: Option<String>,

    /// Local directory to use for templates instead of the bundled ones
    pub template_dir: Option<PathBuf>,

    /// Skip checking that external tools are installed
    pub skip_tool_check: bool,

    /// Directory the destination is created in (defaults to the current directory)
    pub base_dir: Option<PathBuf>,

    /// Where the scratch workspace is created (defaults to the system temp directory)
    pub scratch_root: Option<PathBuf>,
}

/// Run the whole pipeline and return the created project directory
///
/// Validation failures come back as a [`ValidationError`] inside the
/// `anyhow::Error` so callers can tell them apart from real failures.
pub async fn run<C: ProductConfig, R: Reporter>(
    config: &C,
    args: CreateArgs,
    reporter: &R,
    cleanup: &CleanupHandle,
) -> Result<PathBuf> {
    let base_dir = match &args.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    let app = AppIdentity::resolve(config, &args)?;
    let destination = check_destination(&base_dir, &app)?;

    if !args.skip_tool_check {
        check_tools(&config.required_tools())?;
    }

    let source = match &args.template_dir {
        Some(path) => TemplateSource::Local(path.clone()),
        None => TemplateSource::Bundled(config.bundled_templates()),
    };
    let templates = TemplateSet::load(&source).await?;

    reporter.intro(config.display_name())?;

    let scratch_root = args.scratch_root.clone().unwrap_or_else(std::env::temp_dir);
    let workspace = ScratchWorkspace::create_in(&scratch_root, config.name(), cleanup)?;

    let pipeline = Pipeline {
        config,
        reporter,
        app: &app,
        templates: &templates,
        workspace: &workspace,
    };
    pipeline.generate().await?;
    pipeline.merge().await?;
    pipeline.prepare().await?;
    pipeline.automate().await?;
    pipeline.finalize(&destination).await?;

    reporter.step("Removing temp folders.")?;
    workspace.remove()?;
    reporter.done()?;

    reporter.finish(
        &format!(
            "Success! Now you can cd to `{}` and start development by:",
            app.directory
        ),
        &config.next_steps(&app),
    )?;

    Ok(destination)
}

struct Pipeline<'a, C, R> {
    config: &'a C,
    reporter: &'a R,
    app: &'a AppIdentity,
    templates: &'a TemplateSet,
    workspace: &'a ScratchWorkspace,
}

impl<'a, C: ProductConfig, R: Reporter> Pipeline<'a, C, R> {
    fn web_app(&self) -> PathBuf {
        self.workspace.web_app_dir()
    }

    fn shell_app(&self) -> PathBuf {
        self.workspace.shell_app_dir()
    }

    /// Run both generators inside the scratch workspace
    async fn generate(&self) -> Result<()> {
        self.reporter.step("Creating Cordova app.")?;
        self.config
            .create_shell_app(&self.shell_app(), self.app)
            .run_in(self.workspace.path())
            .await?;
        self.reporter.done()?;

        self.reporter.step("Creating `create-react-app`.")?;
        self.config
            .create_web_app(&self.web_app())
            .run_in(self.workspace.path())
            .await?;
        self.reporter.done()?;

        Ok(())
    }

    /// Move the Cordova parts into the React app and reconcile `package.json`
    async fn merge(&self) -> Result<()> {
        let (shell, web) = (self.shell_app(), self.web_app());

        self.reporter
            .step("NOT moving Cordova `hooks`, because this folder is deprecated.")?;
        self.reporter.done()?;

        for dir in [PLATFORMS_DIR, PLUGINS_DIR] {
            self.reporter.step(&format!("Moving Cordova `{}`.", dir))?;
            move_or_create_dir(&shell.join(dir), &web.join(dir)).await?;
            self.reporter.done()?;
        }

        self.reporter.step("Creating Cordova `www`.")?;
        fs::create_dir_all(web.join(WWW_DIR))
            .await
            .context("Failed to create www directory")?;
        self.reporter.done()?;

        self.reporter.step("Moving Cordova `config.xml`.")?;
        workspace::move_path(&shell.join(CONFIG_XML), &web.join(CONFIG_XML)).await?;
        self.reporter.done()?;

        self.reporter.step("Generating `package.json`.")?;
        manifest::reconcile_files(
            &web.join(PACKAGE_JSON),
            &shell.join(PACKAGE_JSON),
            &web.join(PACKAGE_JSON),
        )
        .await?;
        self.reporter.done()?;

        self.reporter
            .step("Removing `yarn.lock` (Cordova currently supports `npm` only).")?;
        let yarn_lock = web.join(YARN_LOCK);
        if yarn_lock.exists() {
            fs::remove_file(&yarn_lock)
                .await
                .with_context(|| format!("Failed to remove {}", yarn_lock.display()))?;
        }
        self.reporter.done()?;

        Ok(())
    }

    /// Install dependencies, replace the React entry points, register platforms
    async fn prepare(&self) -> Result<()> {
        let web = self.web_app();

        self.reporter
            .step("Installing dependencies and generating `package-lock.json`.")?;
        self.config.install_dependencies().run_in(&web).await?;
        self.reporter.done()?;

        for file in self.templates.manifest().entry_files() {
            self.reporter
                .step(&format!("Replacing React `{}`.", file.destination()))?;
            templates::copy_file(self.templates, file, &web).await?;
            self.reporter.done()?;
        }

        for platform in self.config.platforms() {
            self.reporter
                .step(&format!("Adding Cordova `{}` platform.", platform))?;
            self.config.add_platform(platform).run_in(&web).await?;
            self.reporter.done()?;
        }

        Ok(())
    }

    /// Copy the automation scripts and declare their hooks in `config.xml`
    async fn automate(&self) -> Result<()> {
        let web = self.web_app();
        let manifest = self.templates.manifest();

        self.reporter
            .step(&format!("Creating Cordova `{}`.", SCRIPTS_DIR))?;
        fs::create_dir_all(web.join(SCRIPTS_DIR))
            .await
            .context("Failed to create scripts directory")?;
        self.reporter.done()?;

        for file in manifest.script_files() {
            self.copy_script(file, &web).await?;
            for hook in manifest.hooks_for(file.destination()) {
                self.add_hook(hook, &web).await?;
            }
        }

        for hook in manifest.unbound_hooks() {
            self.add_hook(hook, &web).await?;
        }

        Ok(())
    }

    async fn copy_script(&self, file: &TemplateFile, web: &Path) -> Result<()> {
        self.reporter
            .step(&format!("Generating `{}`.", file.destination()))?;
        templates::copy_file(self.templates, file, web).await?;
        self.reporter.done()
    }

    async fn add_hook(&self, hook: &Hook, web: &Path) -> Result<()> {
        let message = match &hook.platform {
            Some(platform) => format!(
                "Adding {} `{}` hook `{}` to `config.xml`.",
                platform, hook.kind, hook.src
            ),
            None => format!("Adding `{}` hook `{}` to `config.xml`.", hook.kind, hook.src),
        };
        self.reporter.step(&message)?;
        manifest::add_hook_to_file(&web.join(CONFIG_XML), hook).await?;
        self.reporter.done()
    }

    /// Create the destination and move the merged project into it
    async fn finalize(&self, destination: &Path) -> Result<()> {
        self.reporter.step(&format!(
            "Creating `{}` in the current directory.",
            self.app.directory
        ))?;
        // Fails if the directory appeared after validation
        fs::create_dir(destination)
            .await
            .with_context(|| format!("Failed to create {}", destination.display()))?;
        self.reporter.done()?;

        self.reporter.step(&format!(
            "Moving contents of temp folders to `{}`.",
            self.app.directory
        ))?;
        workspace::move_contents(&self.web_app(), destination).await?;
        self.reporter.done()?;

        Ok(())
    }
}

/// Newer Cordova versions only create `platforms`/`plugins` on first use
async fn move_or_create_dir(from: &Path, to: &Path) -> Result<()> {
    if from.exists() {
        workspace::move_path(from, to).await
    } else {
        fs::create_dir_all(to)
            .await
            .with_context(|| format!("Failed to create {}", to.display()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::runtime::{CommandSpec, ToolConfig};
    use crate::templates::BundledTemplates;

    /// Minimal product whose commands are never executed
    #[derive(Clone)]
    pub(crate) struct TestConfig;

    impl ProductConfig for TestConfig {
        fn name(&self) -> &'static str {
            "test"
        }

        fn display_name(&self) -> &'static str {
            "Test"
        }

        fn default_app_id(&self) -> &'static str {
            "io.cordova.hellocordova"
        }

        fn create_shell_app(&self, target: &Path, _app: &AppIdentity) -> CommandSpec {
            CommandSpec::new("true").arg(target.display().to_string())
        }

        fn create_web_app(&self, target: &Path) -> CommandSpec {
            CommandSpec::new("true").arg(target.display().to_string())
        }

        fn install_dependencies(&self) -> CommandSpec {
            CommandSpec::new("true")
        }

        fn add_platform(&self, platform: &str) -> CommandSpec {
            CommandSpec::new("true").arg(platform)
        }

        fn platforms(&self) -> &'static [&'static str] {
            &["browser"]
        }

        fn required_tools(&self) -> Vec<ToolConfig> {
            vec![ToolConfig {
                name: "definitely-not-a-real-tool-42",
                display_name: "Imaginary",
                install_hint: "npm install -g imaginary",
            }]
        }

        fn bundled_templates(&self) -> BundledTemplates {
            BundledTemplates {
                manifest: "name: test\n",
                files: &[],
            }
        }

        fn next_steps(&self, _app: &AppIdentity) -> Vec<String> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_missing_tools_abort_before_scratch_is_created() {
        let base = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let args = CreateArgs {
            directory: Some("demo".to_string()),
            base_dir: Some(base.path().to_path_buf()),
            scratch_root: Some(scratch.path().to_path_buf()),
            ..CreateArgs::default()
        };

        let err = run(&TestConfig, args, &crate::report::PlainReporter, &CleanupHandle::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Imaginary"));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
        assert!(!base.path().join("demo").exists());
    }

    #[tokio::test]
    async fn test_validation_error_is_recoverable_from_anyhow() {
        let base = tempfile::tempdir().unwrap();
        let args = CreateArgs {
            base_dir: Some(base.path().to_path_buf()),
            ..CreateArgs::default()
        };

        let err = run(&TestConfig, args, &crate::report::PlainReporter, &CleanupHandle::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingName)
        );
    }

    #[tokio::test]
    async fn test_move_or_create_dir_creates_missing_target() {
        let root = tempfile::tempdir().unwrap();
        let to = root.path().join("plugins");

        move_or_create_dir(&root.path().join("absent"), &to).await.unwrap();

        assert!(to.is_dir());
    }
}
