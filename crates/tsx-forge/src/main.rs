//! TSX Forge CLI - manage React components and export them as projects

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use forge_core::scaffold::{BuildTool, RouterKind, UiLibrary};
use forge_core::{PackageManager, Target, Theme};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "TSX_FORGE_LOG";

#[derive(Parser, Debug)]
#[command(name = "tsx-forge")]
#[command(about = "Manage React components and export them as apps or libraries")]
#[command(version)]
pub struct Args {
    /// Project descriptor listing the components
    #[arg(long, global = true, default_value = "tsx-forge.json")]
    pub project: PathBuf,

    /// Directory holding settings.yaml (defaults to the platform config dir)
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add component files, or every .tsx/.jsx file below a directory
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List components with their 1-based index
    List,
    /// Remove a component from the project (the file stays on disk)
    Remove { index: usize },
    /// Rename a component file and its declarations
    Rename {
        index: usize,
        name: String,
        /// Delete the file under the old name
        #[arg(long = "delete-old")]
        delete_old: bool,
    },
    /// Copy a component under a new name
    Duplicate { index: usize, name: String },
    /// Show the external packages each component imports
    Deps,
    /// Re-indent a component file in place
    Format { index: usize },
    /// Generate a project around the components
    Export(ExportArgs),
    /// Check that Node.js and a package manager are installed
    Doctor {
        #[arg(long = "package-manager", value_enum, default_value = "npm")]
        package_manager: PackageManagerArg,
    },
    /// Show or clear recently used projects
    Recent {
        #[arg(long)]
        clear: bool,
    },
    /// Set the preferred theme
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Kind of project to generate
    #[arg(value_enum)]
    pub target: TargetArg,

    /// Directory to generate into
    #[arg(short, long)]
    pub out: PathBuf,

    /// JSON file with export options (camelCase keys); flags override it
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Package / app name
    #[arg(long)]
    pub name: Option<String>,

    /// Package version (semver)
    #[arg(long = "pkg-version")]
    pub pkg_version: Option<String>,

    /// Emit TypeScript (true) or JavaScript (false)
    #[arg(long)]
    pub typescript: Option<bool>,

    /// Emit Tailwind CSS config (apps)
    #[arg(long)]
    pub tailwind: Option<bool>,

    /// Emit ESLint config (apps)
    #[arg(long)]
    pub eslint: Option<bool>,

    /// Emit Storybook config and stories (library)
    #[arg(long)]
    pub storybook: Option<bool>,

    /// Pin the icon package even if unused (React app)
    #[arg(long = "include-icons")]
    pub include_icons: Option<bool>,

    /// UI kit (React app)
    #[arg(long, value_enum)]
    pub ui: Option<UiArg>,

    /// Router flavour (Next.js app)
    #[arg(long, value_enum)]
    pub router: Option<RouterArg>,

    /// Bundler (library)
    #[arg(long, value_enum)]
    pub build: Option<BuildArg>,

    /// Next.js release to pin
    #[arg(long = "next-version")]
    pub next_version: Option<String>,

    /// Install dependencies after generating
    #[arg(long)]
    pub install: bool,

    /// Start the dev server after installing (implies --install)
    #[arg(long)]
    pub run: bool,

    /// Open the dev server in the browser (with --run)
    #[arg(long)]
    pub open: bool,

    /// Package manager for --install/--run
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManagerArg>,

    /// Never prompt; unset options use their defaults
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum TargetArg {
    React,
    Next,
    Library,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::React => Target::ReactApp,
            TargetArg::Next => Target::NextApp,
            TargetArg::Library => Target::Library,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum UiArg {
    None,
    Mui,
    Chakra,
}

impl From<UiArg> for UiLibrary {
    fn from(arg: UiArg) -> Self {
        match arg {
            UiArg::None => UiLibrary::None,
            UiArg::Mui => UiLibrary::Mui,
            UiArg::Chakra => UiLibrary::Chakra,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RouterArg {
    App,
    Pages,
}

impl From<RouterArg> for RouterKind {
    fn from(arg: RouterArg) -> Self {
        match arg {
            RouterArg::App => RouterKind::App,
            RouterArg::Pages => RouterKind::Pages,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BuildArg {
    Rollup,
    Webpack,
}

impl From<BuildArg> for BuildTool {
    fn from(arg: BuildArg) -> Self {
        match arg {
            BuildArg::Rollup => BuildTool::Rollup,
            BuildArg::Webpack => BuildTool::Webpack,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PackageManagerArg {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl From<PackageManagerArg> for PackageManager {
    fn from(arg: PackageManagerArg) -> Self {
        match arg {
            PackageManagerArg::Npm => PackageManager::Npm,
            PackageManagerArg::Pnpm => PackageManager::Pnpm,
            PackageManagerArg::Yarn => PackageManager::Yarn,
            PackageManagerArg::Bun => PackageManager::Bun,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let result = commands::dispatch(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
