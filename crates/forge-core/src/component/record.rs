//! A single component source file and its cached content

use crate::deps;
use crate::error::{ForgeError, Result};
use crate::format;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Store-assigned identity of a component record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComponentId(pub(crate) u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// In-memory representation of one component source file
///
/// Content is read from `path` the first time it is asked for and cached
/// afterwards. Records built with [`ComponentRecord::with_content`] never
/// touch the disk until saved.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub(crate) id: ComponentId,
    pub(crate) path: PathBuf,
    pub(crate) name: String,
    extension: String,
    pub(crate) content: OnceLock<String>,
}

impl ComponentRecord {
    /// A record whose content is loaded lazily from `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: ComponentId::default(),
            name: name_from_path(&path),
            extension: extension_from_path(&path),
            path,
            content: OnceLock::new(),
        }
    }

    /// A record with content already in hand
    pub fn with_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let record = Self::open(path);
        let _ = record.content.set(content.into());
        record
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File suffix including the dot, e.g. `.tsx`
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `Name (File.tsx)`
    pub fn display_name(&self) -> String {
        let file = self
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{} ({})", self.name, file)
    }

    pub fn is_loaded(&self) -> bool {
        self.content.get().is_some()
    }

    /// Full source text, read from disk on first access
    pub fn content(&self) -> Result<&str> {
        if let Some(content) = self.content.get() {
            return Ok(content);
        }
        let text = fs::read_to_string(&self.path).map_err(|e| ForgeError::io(&self.path, e))?;
        Ok(self.content.get_or_init(|| text))
    }

    /// Discard the cached text and read the file again
    pub fn reload(&mut self) -> Result<&str> {
        let text = fs::read_to_string(&self.path).map_err(|e| ForgeError::io(&self.path, e))?;
        self.content = OnceLock::from(text);
        self.content()
    }

    /// Replace the cached text without writing it
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = OnceLock::from(content.into());
    }

    /// Write the cached text back to `path`
    pub fn save(&self) -> Result<()> {
        let content = self.content()?;
        fs::write(&self.path, content).map_err(|e| ForgeError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "saved component");
        Ok(())
    }

    /// Re-indent the cached text with the naive formatter
    pub fn prettify(&mut self) -> Result<()> {
        let formatted = format::prettify(self.content()?);
        self.set_content(formatted);
        Ok(())
    }

    /// External packages imported by this component
    pub fn dependencies(&self) -> Result<BTreeSet<String>> {
        Ok(deps::scan(self.content()?))
    }
}

fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension_from_path(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
