//! Ordered registry of component records keyed by canonical path

use super::record::{ComponentId, ComponentRecord};
use crate::error::{ForgeError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File suffixes picked up when registering a whole directory
pub const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// Owns every component record; insertion order is listing order
#[derive(Debug, Default)]
pub struct ComponentStore {
    components: Vec<ComponentRecord>,
    next_id: u64,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, or return the record already registered for it
    ///
    /// Content is loaded eagerly; if the file cannot be read the store is
    /// left untouched.
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<&ComponentRecord> {
        let path = path.as_ref();
        let canonical = fs::canonicalize(path).map_err(|e| ForgeError::io(path, e))?;

        if let Some(pos) = self.components.iter().position(|c| c.path == canonical) {
            return Ok(&self.components[pos]);
        }

        let record = ComponentRecord::open(canonical);
        record.content()?;
        let id = self.insert(record);
        tracing::debug!(%id, path = %path.display(), "registered component");
        Ok(&self.components[self.components.len() - 1])
    }

    /// Register every `.tsx`/`.jsx` file below `dir`, sorted by file name per directory
    pub fn add_dir(&mut self, dir: impl AsRef<Path>) -> Result<Vec<ComponentId>> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                ForgeError::io(&path, e.into())
            })?;
            let is_component = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| COMPONENT_EXTENSIONS.contains(&e));
            if is_component {
                files.push(entry.into_path());
            }
        }

        let mut ids = Vec::with_capacity(files.len());
        for file in files {
            ids.push(self.add(&file)?.id());
        }
        Ok(ids)
    }

    fn insert(&mut self, mut record: ComponentRecord) -> ComponentId {
        self.next_id += 1;
        let id = ComponentId(self.next_id);
        record.id = id;
        self.components.push(record);
        id
    }

    /// Remove from the store; the file on disk is not touched
    pub fn remove(&mut self, id: ComponentId) -> Option<ComponentRecord> {
        let pos = self.position(id)?;
        Some(self.components.remove(pos))
    }

    pub fn by_index(&self, index: usize) -> Option<&ComponentRecord> {
        self.components.get(index)
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentRecord> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut ComponentRecord> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn position(&self, id: ComponentId) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.components.iter()
    }

    /// Records in listing order, as the export pipeline consumes them
    pub fn records(&self) -> &[ComponentRecord] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Forget every record; no files are touched
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Dependencies of each component, keyed by component name
    pub fn all_dependencies(&self) -> Result<BTreeMap<String, BTreeSet<String>>> {
        let mut all = BTreeMap::new();
        for component in &self.components {
            all.insert(component.name().to_string(), component.dependencies()?);
        }
        Ok(all)
    }

    /// Rename a component; returns the previous path, which stays on disk
    ///
    /// `None` when the new name resolves to the same file as the old one.
    pub fn rename(&mut self, id: ComponentId, new_name: &str) -> Result<Option<PathBuf>> {
        let record = self
            .get_mut(id)
            .ok_or_else(|| ForgeError::InvalidName(format!("unknown component {}", id)))?;
        record.rename(new_name)
    }

    /// Copy a component under a new name and append the copy
    pub fn duplicate(&mut self, id: ComponentId, new_name: &str) -> Result<ComponentId> {
        let record = self
            .get(id)
            .ok_or_else(|| ForgeError::InvalidName(format!("unknown component {}", id)))?;
        let copy = record.duplicate(new_name)?;
        Ok(self.insert(copy))
    }
}
