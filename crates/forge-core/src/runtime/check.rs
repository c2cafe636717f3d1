//! Toolchain detection for Node.js and package managers

use super::package_manager::PackageManager;
use crate::error::{ForgeError, Result};
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

fn probe(name: &'static str, program: &str) -> ToolInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            ToolInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => ToolInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> ToolInfo {
    probe("Node.js", "node")
}

/// Check if the given package manager is available
pub fn check_package_manager(manager: PackageManager) -> ToolInfo {
    probe(manager.display_name(), manager.program())
}

/// Check everything needed to install and run an exported project
///
/// Fails listing every missing tool; otherwise returns what was found.
pub fn check_toolchain(manager: PackageManager) -> Result<Vec<ToolInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    // Bun runs the scripts itself; everything else needs Node.js
    if manager != PackageManager::Bun {
        let node = check_node();
        if node.available {
            results.push(node);
        } else {
            missing.push("Node.js (install from https://nodejs.org)".to_string());
        }
    }

    let pm = check_package_manager(manager);
    if pm.available {
        results.push(pm);
    } else {
        missing.push(format!("{} (install from {})", manager.display_name(), manager.install_hint()));
    }

    if !missing.is_empty() {
        return Err(ForgeError::ExternalTool {
            command: format!("{} --version", manager.program()),
            code: None,
            stderr: format!(
                "Missing required tools:\n{}",
                missing
                    .iter()
                    .map(|m| format!("  - {}", m))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_missing_program() {
        let info = probe("Nothing", "definitely-not-a-real-program-tsx-forge");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert_eq!(info.name, "Nothing");
    }

    #[test]
    fn test_check_toolchain_reports_every_found_tool() {
        match check_toolchain(PackageManager::Npm) {
            Ok(found) => {
                assert!(found.iter().all(|t| t.available));
                assert_eq!(found.len(), 2);
            }
            Err(ForgeError::ExternalTool { stderr, .. }) => {
                assert!(stderr.starts_with("Missing required tools:"));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
