//! Subcommand handlers

use crate::{Args, Command, ExportArgs};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use forge_core::runtime::{self, check};
use forge_core::{
    generator_for, load_project, save_project, ComponentId, ComponentStore, ConsoleSink,
    ExportOptions, PackageManager, ProgressSink, Settings, Target,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Component store bound to a descriptor file, plus persisted settings
struct Session {
    project: PathBuf,
    config_dir: PathBuf,
    store: ComponentStore,
    settings: Settings,
}

impl Session {
    fn open(project: PathBuf, config_dir: PathBuf) -> Result<Self> {
        let settings = Settings::load(&config_dir)
            .with_context(|| format!("Failed to load settings from {}", config_dir.display()))?;

        let mut store = ComponentStore::new();
        if project.exists() {
            load_project(&project, &mut store, &ConsoleSink)
                .with_context(|| format!("Failed to open project {}", project.display()))?;
        }

        Ok(Self {
            project,
            config_dir,
            store,
            settings,
        })
    }

    /// Write the descriptor and remember it as the most recent project
    fn save(&mut self) -> Result<()> {
        save_project(&self.project, &self.store, &ConsoleSink)
            .with_context(|| format!("Failed to save project {}", self.project.display()))?;
        let recent = fs::canonicalize(&self.project).unwrap_or_else(|_| self.project.clone());
        self.settings.add_recent_project(recent);
        self.save_settings()
    }

    fn save_settings(&self) -> Result<()> {
        self.settings
            .save(&self.config_dir)
            .with_context(|| format!("Failed to save settings to {}", self.config_dir.display()))
    }

    /// Id of the component at a 1-based listing position
    fn id_at(&self, index: usize) -> Result<ComponentId> {
        match index.checked_sub(1).and_then(|i| self.store.by_index(i)) {
            Some(record) => Ok(record.id()),
            None => bail!(
                "No component at index {} (project has {})",
                index,
                self.store.len()
            ),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tsx-forge")
}

pub async fn dispatch(args: Args) -> Result<()> {
    let config_dir = args.config_dir.unwrap_or_else(default_config_dir);
    let mut session = Session::open(args.project, config_dir)?;

    match args.command {
        Command::Add { paths } => add(&mut session, &paths),
        Command::List => {
            list(&session);
            Ok(())
        }
        Command::Remove { index } => remove(&mut session, index),
        Command::Rename {
            index,
            name,
            delete_old,
        } => rename(&mut session, index, &name, delete_old),
        Command::Duplicate { index, name } => duplicate(&mut session, index, &name),
        Command::Deps => deps(&session),
        Command::Format { index } => format_component(&mut session, index),
        Command::Export(export_args) => export(session, export_args).await,
        Command::Doctor { package_manager } => doctor(package_manager.into()),
        Command::Recent { clear } => recent(&mut session, clear),
        Command::Theme { theme } => {
            session.settings.theme = theme.into();
            session.save_settings()?;
            println!("{} Theme set to {}", "✓".green(), session.settings.theme);
            Ok(())
        }
    }
}

fn add(session: &mut Session, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        if path.is_dir() {
            let ids = session
                .store
                .add_dir(path)
                .with_context(|| format!("Failed to add components from {}", path.display()))?;
            println!(
                "{} Added {} component(s) from {}",
                "✓".green(),
                ids.len(),
                path.display()
            );
        } else {
            let record = session
                .store
                .add(path)
                .with_context(|| format!("Failed to add {}", path.display()))?;
            println!("{} Added component: {}", "✓".green(), record.display_name());
        }
    }
    session.save()
}

fn list(session: &Session) {
    if session.store.is_empty() {
        println!("{}", "No components in this project".dimmed());
        return;
    }
    for (i, record) in session.store.iter().enumerate() {
        println!(
            "{:>3}. {} {}",
            i + 1,
            record.display_name().bold(),
            record.path().display().to_string().dimmed()
        );
    }
}

fn remove(session: &mut Session, index: usize) -> Result<()> {
    let id = session.id_at(index)?;
    if let Some(record) = session.store.remove(id) {
        println!("{} Removed component: {}", "✓".green(), record.name());
    }
    session.save()
}

fn rename(session: &mut Session, index: usize, name: &str, delete_old: bool) -> Result<()> {
    let id = session.id_at(index)?;
    let old_path = session
        .store
        .rename(id, name)
        .with_context(|| format!("Failed to rename component {}", index))?;

    match old_path {
        Some(old_path) if delete_old => {
            fs::remove_file(&old_path)
                .with_context(|| format!("Failed to delete {}", old_path.display()))?;
            tracing::debug!(path = %old_path.display(), "deleted previous component file");
        }
        Some(old_path) => println!(
            "{}",
            format!("Previous file kept at {}", old_path.display()).dimmed()
        ),
        None => {}
    }
    if let Some(record) = session.store.get(id) {
        println!("{} Renamed to {}", "✓".green(), record.display_name());
    }
    session.save()
}

fn duplicate(session: &mut Session, index: usize, name: &str) -> Result<()> {
    let id = session.id_at(index)?;
    let copy = session
        .store
        .duplicate(id, name)
        .with_context(|| format!("Failed to duplicate component {}", index))?;
    if let Some(record) = session.store.get(copy) {
        println!("{} Created {}", "✓".green(), record.display_name());
    }
    session.save()
}

fn deps(session: &Session) -> Result<()> {
    let all = session.store.all_dependencies()?;
    let mut union = std::collections::BTreeSet::new();
    for (name, packages) in &all {
        let list = if packages.is_empty() {
            "none".dimmed().to_string()
        } else {
            packages.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        println!("{}: {}", name.bold(), list);
        union.extend(packages.iter().cloned());
    }
    if !union.is_empty() {
        println!();
        println!(
            "{} {}",
            "All packages:".cyan(),
            union.into_iter().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}

fn format_component(session: &mut Session, index: usize) -> Result<()> {
    let id = session.id_at(index)?;
    let Some(record) = session.store.get_mut(id) else {
        bail!("No component at index {}", index);
    };
    record.prettify()?;
    record
        .save()
        .with_context(|| format!("Failed to write {}", record.path().display()))?;
    println!("{} Formatted {}", "✓".green(), record.display_name());
    Ok(())
}

/// Options from `--options`, then individual flags on top
fn export_options(args: &ExportArgs) -> Result<ExportOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            serde_json::from_str::<ExportOptions>(&text)
                .with_context(|| format!("Invalid options file {}", path.display()))?
        }
        None => ExportOptions::default(),
    };

    if args.name.is_some() {
        options.name = args.name.clone();
    }
    if args.pkg_version.is_some() {
        options.version = args.pkg_version.clone();
    }
    if args.next_version.is_some() {
        options.next_version = args.next_version.clone();
    }
    options.typescript = args.typescript.or(options.typescript);
    options.tailwind = args.tailwind.or(options.tailwind);
    options.eslint = args.eslint.or(options.eslint);
    options.storybook = args.storybook.or(options.storybook);
    options.include_icons = args.include_icons.or(options.include_icons);
    options.ui_library = args.ui.map(Into::into).or(options.ui_library);
    options.router = args.router.map(Into::into).or(options.router);
    options.build = args.build.map(Into::into).or(options.build);
    Ok(options)
}

/// Explicit flag first; re-exports into an installed project keep its manager
fn requested_manager(args: &ExportArgs) -> Option<PackageManager> {
    args.package_manager
        .map(PackageManager::from)
        .or_else(|| PackageManager::detect(&args.out))
}

fn interactive(args: &ExportArgs) -> bool {
    cfg!(feature = "tui") && !args.yes && console::Term::stdout().is_term()
}

#[cfg(feature = "tui")]
fn progress_sink(interactive: bool) -> Arc<dyn ProgressSink> {
    if interactive {
        Arc::new(forge_core::tui::CliclackSink)
    } else {
        Arc::new(ConsoleSink)
    }
}

#[cfg(not(feature = "tui"))]
fn progress_sink(_interactive: bool) -> Arc<dyn ProgressSink> {
    Arc::new(ConsoleSink)
}

#[cfg(feature = "tui")]
fn complete_options(
    target: Target,
    options: ExportOptions,
    manager: Option<PackageManager>,
    wants_install: bool,
) -> Result<(ExportOptions, PackageManager)> {
    forge_core::tui::intro(&format!("Export {}", target.display_name()))?;
    let options = forge_core::tui::prompt_export_options(target, options)?;
    let manager = match manager {
        Some(m) => m,
        None if wants_install => forge_core::tui::prompt_package_manager(PackageManager::default())?,
        None => PackageManager::default(),
    };
    Ok((options, manager))
}

async fn export(session: Session, args: ExportArgs) -> Result<()> {
    if session.store.is_empty() {
        bail!("No components to export; add some with `tsx-forge add <path>`");
    }

    let target: Target = args.target.into();
    let interactive = interactive(&args);
    let wants_install = args.install || args.run;
    let options = export_options(&args)?;
    let manager = requested_manager(&args);

    #[cfg(feature = "tui")]
    let (options, manager) = if interactive {
        complete_options(target, options, manager, wants_install)?
    } else {
        (options, manager.unwrap_or_default())
    };
    #[cfg(not(feature = "tui"))]
    let manager = manager.unwrap_or_default();

    let sink = progress_sink(interactive);
    let out = args.out.clone();
    tracing::info!(kind = %target, out = %out.display(), components = session.store.len(), "starting export");
    let store = session.store;
    let pipeline_sink = sink.clone();
    let project_dir = tokio::task::spawn_blocking(move || {
        forge_core::export(
            generator_for(target),
            store.records(),
            &out,
            &options,
            pipeline_sink.as_ref(),
        )
    })
    .await
    .context("Export task panicked")??;

    if !wants_install {
        print_next_steps(&project_dir, target, manager);
        return Ok(());
    }

    check::check_toolchain(manager).context("Cannot install dependencies")?;
    tracing::info!(manager = %manager, dir = %project_dir.display(), "installing dependencies");
    runtime::install_dependencies(&project_dir, manager, sink.as_ref()).await?;

    if !args.run {
        print_next_steps(&project_dir, target, manager);
        return Ok(());
    }

    let tool = runtime::start_dev_server(&project_dir, manager, target, args.open, sink.clone())?;
    tracing::debug!(pid = ?tool.id(), command = %tool.command(), "dev server running");
    println!("{}", "Press Ctrl+C to stop the server".dimmed());
    tool.wait().await?;
    Ok(())
}

fn print_next_steps(project_dir: &Path, target: Target, manager: PackageManager) {
    println!();
    println!("{}", "Next steps:".bold());
    println!("  cd {}", project_dir.display());
    println!("  {}", manager.install_command());
    println!("  {}", manager.dev_server_command(target));
    println!();
}

fn doctor(manager: PackageManager) -> Result<()> {
    let tools = [check::check_node(), check::check_package_manager(manager)];
    for tool in &tools {
        match (&tool.version, tool.available) {
            (Some(version), true) => println!("{} {} {}", "✓".green(), tool.name, version.dimmed()),
            _ => println!("{} {} {}", "✗".red(), tool.name, "not found".red()),
        }
    }
    check::check_toolchain(manager)?;
    println!("{} Ready to install and run exported projects", "✓".green());
    Ok(())
}

fn recent(session: &mut Session, clear: bool) -> Result<()> {
    if clear {
        session.settings.clear_recent_projects();
        session.save_settings()?;
        println!("{} Cleared recent projects", "✓".green());
        return Ok(());
    }
    if session.settings.recent_projects.is_empty() {
        println!("{}", "No recent projects".dimmed());
    }
    for (i, project) in session.settings.recent_projects.iter().enumerate() {
        println!("{:>3}. {}", i + 1, project.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn export_args(extra: &[&str]) -> ExportArgs {
        let mut argv = vec!["tsx-forge", "export", "library", "--out", "dist"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Command::Export(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("options.json");
        fs::write(&file, r#"{"name": "from-file", "build": "webpack", "storybook": false}"#).unwrap();

        let args = export_args(&["--options", file.to_str().unwrap(), "--build", "rollup"]);
        let options = export_options(&args).unwrap();

        assert_eq!(options.name.as_deref(), Some("from-file"));
        assert_eq!(options.build, Some(forge_core::scaffold::BuildTool::Rollup));
        assert_eq!(options.storybook, Some(false));
        assert_eq!(options.typescript, None);
    }

    #[test]
    fn test_manager_flag_wins_over_lockfile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("yarn.lock"), "").unwrap();

        let mut args = export_args(&[]);
        args.out = dir.path().to_path_buf();
        assert_eq!(requested_manager(&args), Some(PackageManager::Yarn));

        args.package_manager = Some(crate::PackageManagerArg::Bun);
        assert_eq!(requested_manager(&args), Some(PackageManager::Bun));

        assert_eq!(requested_manager(&export_args(&[])), None);
    }

    #[test]
    fn test_session_saves_descriptor_and_recent_project() {
        let dir = tempfile::tempdir().unwrap();
        let component = dir.path().join("Foo.tsx");
        fs::write(&component, "export default function Foo() {}").unwrap();
        let project = dir.path().join("tsx-forge.json");
        let config_dir = dir.path().join("config");

        let mut session = Session::open(project.clone(), config_dir.clone()).unwrap();
        add(&mut session, &[component]).unwrap();
        assert!(session.id_at(1).is_ok());
        assert!(session.id_at(0).is_err());
        assert!(session.id_at(2).is_err());

        let reopened = Session::open(project.clone(), config_dir.clone()).unwrap();
        assert_eq!(reopened.store.len(), 1);
        let settings = Settings::load(&config_dir).unwrap();
        assert_eq!(settings.recent_projects.len(), 1);
        assert!(settings.recent_projects[0].ends_with("tsx-forge.json"));
    }

    #[test]
    fn test_rename_to_own_name_keeps_file_with_delete_old() {
        let dir = tempfile::tempdir().unwrap();
        let component = dir.path().join("Foo.tsx");
        fs::write(&component, "export default function Foo() {}").unwrap();
        let project = dir.path().join("tsx-forge.json");

        let mut session = Session::open(project, dir.path().join("config")).unwrap();
        add(&mut session, &[component.clone()]).unwrap();
        rename(&mut session, 1, "Foo", true).unwrap();

        assert!(component.exists());
        assert_eq!(
            fs::read_to_string(&component).unwrap(),
            "export default function Foo() {}"
        );
    }

    #[test]
    fn test_rename_with_delete_old_removes_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let component = dir.path().join("Foo.tsx");
        fs::write(&component, "export default function Foo() {}").unwrap();
        let project = dir.path().join("tsx-forge.json");

        let mut session = Session::open(project, dir.path().join("config")).unwrap();
        add(&mut session, &[component.clone()]).unwrap();
        rename(&mut session, 1, "Bar", true).unwrap();

        assert!(!component.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("Bar.tsx")).unwrap(),
            "export default function Bar() {}"
        );
    }
}
