//! create-cordova-react-app - Scaffolds a mixed Cordova + create-react-app project

use anyhow::Result;
use clap::Parser;
use scaffolder_core::{
    AppIdentity, BundledTemplates, ClackReporter, CleanupHandle, CommandSpec, CreateArgs,
    PlainReporter, ProductConfig, Reporter, ToolConfig, ValidationError,
};
use std::path::{Path, PathBuf};

const TEMPLATE_MANIFEST: &str = include_str!("../../../templates/cordova-react/template.yaml");

const TEMPLATE_FILES: &[(&str, &[u8])] = &[
    (
        "index.html",
        include_bytes!("../../../templates/cordova-react/index.html"),
    ),
    (
        "index.js",
        include_bytes!("../../../templates/cordova-react/index.js"),
    ),
    (
        "startDevServer.sh",
        include_bytes!("../../../templates/cordova-react/startDevServer.sh"),
    ),
    (
        "updateWWWFiles.js",
        include_bytes!("../../../templates/cordova-react/updateWWWFiles.js"),
    ),
    (
        "addPermissionToCurrentUserToUseKVM.js",
        include_bytes!("../../../templates/cordova-react/addPermissionToCurrentUserToUseKVM.js"),
    ),
];

const DESCRIPTION: &str = "Creates a mix project of cordova application and `create-react-app` app. \
Accepts the first three arguments as `cordova create` command.";

const EXAMPLES: &str = "Examples:
  create-cordova-react-app hi-cordova
  create-cordova-react-app hello-cordova io.cordova.hellocordova HelloCordova";

/// Cordova + React product configuration
#[derive(Clone)]
pub struct CordovaReactConfig;

impl ProductConfig for CordovaReactConfig {
    fn name(&self) -> &'static str {
        "create-cordova-react-app"
    }

    fn display_name(&self) -> &'static str {
        "Cordova + React"
    }

    fn default_app_id(&self) -> &'static str {
        "io.cordova.hellocordova"
    }

    fn create_shell_app(&self, target: &Path, app: &AppIdentity) -> CommandSpec {
        CommandSpec::new("cordova").arg("create").args([
            target.display().to_string(),
            app.id.clone(),
            app.name.clone(),
        ])
    }

    fn create_web_app(&self, target: &Path) -> CommandSpec {
        CommandSpec::new("npx")
            .arg("create-react-app")
            .arg(target.display().to_string())
    }

    fn install_dependencies(&self) -> CommandSpec {
        CommandSpec::new("npm").arg("install")
    }

    fn add_platform(&self, platform: &str) -> CommandSpec {
        CommandSpec::new("cordova").args(["platform", "add", platform])
    }

    fn platforms(&self) -> &'static [&'static str] {
        &["browser", "android"]
    }

    fn required_tools(&self) -> Vec<ToolConfig> {
        vec![
            ToolConfig {
                name: "cordova",
                display_name: "Cordova",
                install_hint: "npm install -g cordova",
            },
            ToolConfig {
                name: "npx",
                display_name: "npx",
                install_hint: "install Node.js from https://nodejs.org",
            },
            ToolConfig {
                name: "npm",
                display_name: "npm",
                install_hint: "install Node.js from https://nodejs.org",
            },
        ]
    }

    fn bundled_templates(&self) -> BundledTemplates {
        BundledTemplates {
            manifest: TEMPLATE_MANIFEST,
            files: TEMPLATE_FILES,
        }
    }

    fn next_steps(&self, _app: &AppIdentity) -> Vec<String> {
        vec![
            "  npm start\n    \
             Runs app in browser. Tries to do the same as `cordova run browser`, but with \
             `create-react-app` features enabled, like hot reloading and source maps.\n"
                .to_string(),
            "  cordova run browser\n    \
             Also runs app in browser (Default Cordova way). As `npm start` was configured \
             manually, it is NOT error-prone. So, every time you feel you have issues with \
             cordova api, to make sure it is really the case, run `cordova run browser`. \
             Maybe it is something wrong with `npm start` internally.\n"
                .to_string(),
            "  cordova run android\n    \
             Runs app in android emulator (or in android device). To select another emulator, \
             specify target option like so: `--target=test`. To see the full list of installed \
             targets, execute `cordova requirements`.\n"
                .to_string(),
            "To add or remove a dependency use:\n  \
             npm install <package-name>\n\n  \
             npm uninstall <package-name>\n"
                .to_string(),
            "To add or remove a cordova plugin use:\n  \
             cordova plugin add <plugin-name>\n\n  \
             cordova plugin remove <plugin-name>\n"
                .to_string(),
            "Do not forget to restart your app after changing dependencies or plugins.".to_string(),
        ]
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-cordova-react-app")]
#[command(about = DESCRIPTION, after_help = EXAMPLES)]
#[command(version)]
pub struct Args {
    /// Directory to create the project in; also the default display name
    pub directory: Option<String>,

    /// Reverse-domain app identifier [default: io.cordova.hellocordova]
    pub identifier: Option<String>,

    /// Display name of the app [default: <DIRECTORY>]
    pub display_name: Option<String>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Skip checking that cordova, npx and npm are installed
    #[arg(long = "skip-checks")]
    pub skip_checks: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            directory: args.directory,
            identifier: args.identifier,
            display_name: args.display_name,
            template_dir: args.template_dir,
            skip_tool_check: args.skip_checks,
            ..CreateArgs::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Remove the scratch workspace on Ctrl+C
    let cleanup = CleanupHandle::new();
    let interrupt_cleanup = cleanup.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_cleanup.cleanup();
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = CordovaReactConfig;

    let result = if console::Term::stdout().is_term() {
        create(&config, args.into(), &ClackReporter, &cleanup).await
    } else {
        create(&config, args.into(), &PlainReporter, &cleanup).await
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

/// Run the pipeline; validation failures are reported and end the process cleanly
async fn create<R: Reporter>(
    config: &CordovaReactConfig,
    args: CreateArgs,
    reporter: &R,
    cleanup: &CleanupHandle,
) -> Result<()> {
    match scaffolder_core::run(config, args, reporter, cleanup).await {
        Ok(_) => Ok(()),
        Err(err) => match err.downcast_ref::<ValidationError>() {
            Some(validation) => reporter.error(&validation.to_string()),
            None => {
                let _ = cleanup.cleanup();
                Err(err)
            }
        },
    }
}
