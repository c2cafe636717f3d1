//! Charm-style export option prompts using cliclack

use crate::progress::{ProgressSink, Severity};
use crate::runtime::PackageManager;
use crate::scaffold::{BuildTool, ExportOptions, RouterKind, Target, UiLibrary};
use semver::Version;
use std::io;

/// Progress sink that prints through `cliclack::log`
pub struct CliclackSink;

impl ProgressSink for CliclackSink {
    fn report(&self, severity: Severity, line: &str) {
        let result = match severity {
            Severity::Info => cliclack::log::info(line),
            Severity::Success => cliclack::log::success(line),
            Severity::Warning => cliclack::log::warning(line),
            Severity::Error => cliclack::log::error(line),
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "could not write progress line");
        }
    }
}

/// Opening banner of an interactive session
pub fn intro(title: &str) -> io::Result<()> {
    cliclack::intro(title)
}

/// Ask for every option the caller left unset
///
/// Options already present in `given` are kept as-is and not prompted.
pub fn prompt_export_options(target: Target, given: ExportOptions) -> io::Result<ExportOptions> {
    let defaults = target.defaults();
    let mut options = given;

    if options.name.is_none() {
        let name: String = cliclack::input("Project name")
            .placeholder(&defaults.name)
            .default_input(&defaults.name)
            .validate(|input: &String| {
                if input.trim().is_empty() || input.contains(char::is_whitespace) {
                    Err("Name must be non-empty and contain no spaces")
                } else {
                    Ok(())
                }
            })
            .interact()?;
        options.name = Some(name);
    }

    if options.version.is_none() {
        let version: String = cliclack::input("Version")
            .default_input(&defaults.version)
            .validate(|input: &String| {
                Version::parse(input)
                    .map(|_| ())
                    .map_err(|_| "Use a semantic version such as 0.1.0")
            })
            .interact()?;
        options.version = Some(version);
    }

    if options.typescript.is_none() {
        options.typescript = Some(
            cliclack::confirm("Use TypeScript?")
                .initial_value(defaults.typescript)
                .interact()?,
        );
    }

    match target {
        Target::ReactApp => {
            prompt_styling(&mut options, defaults.tailwind, defaults.eslint)?;
            if options.ui_library.is_none() {
                options.ui_library = Some(
                    cliclack::select("UI library")
                        .item(UiLibrary::None, "None", "")
                        .item(UiLibrary::Mui, "Material UI", "")
                        .item(UiLibrary::Chakra, "Chakra UI", "")
                        .initial_value(defaults.ui_library)
                        .interact()?,
                );
            }
        }
        Target::NextApp => {
            if options.router.is_none() {
                options.router = Some(
                    cliclack::select("Router")
                        .item(RouterKind::App, "App Router", "app/")
                        .item(RouterKind::Pages, "Pages Router", "pages/")
                        .initial_value(defaults.router)
                        .interact()?,
                );
            }
            prompt_styling(&mut options, defaults.tailwind, defaults.eslint)?;
        }
        Target::Library => {
            if options.build.is_none() {
                options.build = Some(
                    cliclack::select("Bundler")
                        .item(BuildTool::Rollup, "Rollup", "")
                        .item(BuildTool::Webpack, "Webpack", "")
                        .initial_value(defaults.build)
                        .interact()?,
                );
            }
            if options.storybook.is_none() {
                options.storybook = Some(
                    cliclack::confirm("Set up Storybook?")
                        .initial_value(defaults.storybook)
                        .interact()?,
                );
            }
        }
    }

    Ok(options)
}

fn prompt_styling(options: &mut ExportOptions, tailwind: bool, eslint: bool) -> io::Result<()> {
    if options.tailwind.is_none() {
        options.tailwind = Some(
            cliclack::confirm("Use Tailwind CSS?")
                .initial_value(tailwind)
                .interact()?,
        );
    }
    if options.eslint.is_none() {
        options.eslint = Some(
            cliclack::confirm("Use ESLint?")
                .initial_value(eslint)
                .interact()?,
        );
    }
    Ok(())
}

/// Ask which package manager installs and runs the export
pub fn prompt_package_manager(initial: PackageManager) -> io::Result<PackageManager> {
    cliclack::select("Package manager")
        .item(PackageManager::Npm, "npm", "")
        .item(PackageManager::Pnpm, "pnpm", "")
        .item(PackageManager::Yarn, "yarn", "")
        .item(PackageManager::Bun, "bun", "")
        .initial_value(initial)
        .interact()
}
