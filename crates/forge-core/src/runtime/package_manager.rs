//! Package manager commands for exported projects

use super::runner::ToolCommand;
use crate::scaffold::Target;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

/// Lock files that identify the manager a project was installed with
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("bun.lockb", PackageManager::Bun),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "Yarn",
            PackageManager::Bun => "Bun",
        }
    }

    /// Executable name; the Node-based managers are `.cmd` shims on Windows
    pub fn program(&self) -> &'static str {
        match (self, cfg!(windows)) {
            (PackageManager::Npm, true) => "npm.cmd",
            (PackageManager::Npm, false) => "npm",
            (PackageManager::Pnpm, true) => "pnpm.cmd",
            (PackageManager::Pnpm, false) => "pnpm",
            (PackageManager::Yarn, true) => "yarn.cmd",
            (PackageManager::Yarn, false) => "yarn",
            (PackageManager::Bun, _) => "bun",
        }
    }

    pub fn install_hint(&self) -> &'static str {
        match self {
            PackageManager::Npm => "https://nodejs.org",
            PackageManager::Pnpm => "https://pnpm.io/installation",
            PackageManager::Yarn => "https://yarnpkg.com/getting-started/install",
            PackageManager::Bun => "https://bun.sh",
        }
    }

    /// Manager whose lock file is present in `dir`, if any
    pub fn detect(dir: &Path) -> Option<Self> {
        LOCKFILES
            .iter()
            .find(|(file, _)| dir.join(file).exists())
            .map(|(_, manager)| *manager)
    }

    pub fn install_command(&self) -> ToolCommand {
        ToolCommand::new(self.program()).arg("install")
    }

    pub fn run_script_command(&self, script: &str) -> ToolCommand {
        match self {
            PackageManager::Yarn => ToolCommand::new(self.program()).arg(script),
            _ => ToolCommand::new(self.program()).args(["run", script]),
        }
    }

    /// Command that starts the interactive server of an exported project
    pub fn dev_server_command(&self, target: Target) -> ToolCommand {
        self.run_script_command(dev_script(target))
    }
}

/// package.json script that serves the project locally
pub fn dev_script(target: Target) -> &'static str {
    match target {
        Target::ReactApp => "start",
        Target::NextApp => "dev",
        Target::Library => "storybook",
    }
}

/// Address the dev server listens on
pub fn dev_server_url(target: Target) -> &'static str {
    match target {
        Target::ReactApp | Target::NextApp => "http://localhost:3000",
        Target::Library => "http://localhost:6006",
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageManager::Npm => write!(f, "npm"),
            PackageManager::Pnpm => write!(f, "pnpm"),
            PackageManager::Yarn => write!(f, "yarn"),
            PackageManager::Bun => write!(f, "bun"),
        }
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(format!("unknown package manager '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_dev_server_commands_per_target() {
        let npm = PackageManager::Npm;
        assert_eq!(npm.dev_server_command(Target::ReactApp).args, vec!["run", "start"]);
        assert_eq!(npm.dev_server_command(Target::NextApp).args, vec!["run", "dev"]);
        assert_eq!(npm.dev_server_command(Target::Library).args, vec!["run", "storybook"]);
        assert_eq!(PackageManager::Yarn.dev_server_command(Target::NextApp).args, vec!["dev"]);
        assert_eq!(PackageManager::Pnpm.install_command().args, vec!["install"]);
    }

    #[test]
    fn test_detect_from_lockfile() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(PackageManager::detect(dir.path()), None);
        fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(PackageManager::detect(dir.path()), Some(PackageManager::Pnpm));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Yarn".parse::<PackageManager>(), Ok(PackageManager::Yarn));
        assert!("pip".parse::<PackageManager>().is_err());
    }
}
