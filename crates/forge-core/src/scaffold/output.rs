//! Writing generated files below the export root

use crate::error::{ForgeError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination directory of one export run, with the files written so far
#[derive(Debug)]
pub struct OutputTree {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl OutputTree {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` below the root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Relative paths of every file written, in write order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Create a directory (and parents); existing directories are fine
    pub fn create_dir(&self, relative: &str) -> Result<()> {
        let dir = self.path(relative);
        fs::create_dir_all(&dir).map_err(|e| ForgeError::io(&dir, e))
    }

    /// Write a text file, creating parent directories as needed
    pub fn write(&mut self, relative: &str, content: &str) -> Result<PathBuf> {
        let target = self.path(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ForgeError::io(parent, e))?;
        }
        fs::write(&target, content).map_err(|e| ForgeError::io(&target, e))?;
        tracing::debug!(path = %target.display(), bytes = content.len(), "wrote file");
        self.written.push(PathBuf::from(relative));
        Ok(target)
    }

    /// Write a value as two-space indented JSON with a trailing newline
    pub fn write_json<T: Serialize>(&mut self, relative: &str, value: &T) -> Result<PathBuf> {
        let mut text = serde_json::to_string_pretty(value).map_err(|e| {
            ForgeError::io(self.path(relative), std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        text.push('\n');
        self.write(relative, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents_and_tracks_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = OutputTree::new(dir.path().to_path_buf());

        let written = out.write("src/components/foo.tsx", "x").unwrap();
        assert_eq!(written, dir.path().join("src/components/foo.tsx"));
        assert_eq!(fs::read_to_string(&written).unwrap(), "x");

        out.write_json("package.json", &serde_json::json!({"name": "demo"}))
            .unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("package.json")).unwrap(),
            "{\n  \"name\": \"demo\"\n}\n"
        );
        assert_eq!(out.written().len(), 2);
    }

    #[test]
    fn test_create_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputTree::new(dir.path().to_path_buf());
        out.create_dir("public").unwrap();
        out.create_dir("public").unwrap();
        assert!(dir.path().join("public").is_dir());
    }
}
