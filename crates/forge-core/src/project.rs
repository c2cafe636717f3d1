//! JSON project descriptor listing the components of a working set

use crate::component::{ComponentId, ComponentStore};
use crate::error::{ForgeError, Result};
use crate::progress::ProgressSink;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Schema version written into new descriptors
pub const DESCRIPTOR_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorEntry {
    pub name: String,
    /// Relative to the descriptor's directory when possible, absolute otherwise
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub version: String,
    #[serde(default)]
    pub components: Vec<DescriptorEntry>,
}

impl Default for ProjectDescriptor {
    fn default() -> Self {
        Self {
            version: DESCRIPTOR_VERSION.to_string(),
            components: Vec::new(),
        }
    }
}

/// Outcome of [`load_project`]
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<ComponentId>,
    pub skipped: Vec<PathBuf>,
}

impl ProjectDescriptor {
    /// Describe the store as it would be saved to `descriptor_path`
    pub fn from_store(store: &ComponentStore, descriptor_path: &Path) -> Self {
        let base = descriptor_dir(descriptor_path);
        let base = fs::canonicalize(&base).unwrap_or(base);
        let components = store
            .iter()
            .map(|c| DescriptorEntry {
                name: c.name().to_string(),
                path: relative_to(c.path(), &base)
                    .unwrap_or_else(|| c.path().to_path_buf())
                    .to_string_lossy()
                    .replace('\\', "/"),
            })
            .collect();
        Self {
            version: DESCRIPTOR_VERSION.to_string(),
            components,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| ForgeError::Descriptor {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self).map_err(|source| ForgeError::Descriptor {
            path: path.to_path_buf(),
            source,
        })?;
        text.push('\n');
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ForgeError::io(parent, e))?;
        }
        fs::write(path, text).map_err(|e| ForgeError::io(path, e))
    }

    /// Absolute location of every entry, resolved against the descriptor's directory
    pub fn resolved_paths(&self, descriptor_path: &Path) -> Vec<PathBuf> {
        let base = descriptor_dir(descriptor_path);
        self.components
            .iter()
            .map(|entry| {
                let path = Path::new(&entry.path);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    base.join(path)
                }
            })
            .collect()
    }
}

/// Add every component of the descriptor at `path` to `store`
///
/// Entries whose file is gone or unreadable are skipped with a warning; only
/// an unreadable or malformed descriptor fails the load.
pub fn load_project(path: &Path, store: &mut ComponentStore, progress: &dyn ProgressSink) -> Result<LoadReport> {
    let descriptor = ProjectDescriptor::read(path)?;
    let mut report = LoadReport::default();

    for component_path in descriptor.resolved_paths(path) {
        if !component_path.exists() {
            tracing::warn!(path = %component_path.display(), "component file not found");
            progress.warning(&format!("Component file not found: {}", component_path.display()));
            report.skipped.push(component_path);
            continue;
        }
        match store.add(&component_path) {
            Ok(record) => report.loaded.push(record.id()),
            Err(e) => {
                tracing::warn!(path = %component_path.display(), error = %e, "skipping component");
                progress.warning(&format!("Error loading component: {}", e));
                report.skipped.push(component_path);
            }
        }
    }

    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    progress.success(&format!("Opened project: {}", name));
    Ok(report)
}

/// Write the store's components to the descriptor at `path`
pub fn save_project(path: &Path, store: &ComponentStore, progress: &dyn ProgressSink) -> Result<()> {
    ProjectDescriptor::from_store(store, path).write(path)?;
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    progress.success(&format!("Saved project: {}", name));
    Ok(())
}

fn descriptor_dir(descriptor_path: &Path) -> PathBuf {
    match descriptor_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `path` expressed relative to `base`; `None` when they share no root
fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() != base.is_absolute() {
        return None;
    }
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    // Different drive or root
    if common == 0 && path.is_absolute() {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    Some(relative)
}
