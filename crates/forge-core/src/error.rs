//! Error types shared by every forge-core operation

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Named stages of the export pipeline, used to say where an export failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStep {
    ValidateOptions,
    CreateDirectories,
    ScanDependencies,
    WriteComponents,
    WriteAggregates,
    WriteConfiguration,
}

impl ExportStep {
    pub fn describe(&self) -> &'static str {
        match self {
            ExportStep::ValidateOptions => "validating options",
            ExportStep::CreateDirectories => "creating directories",
            ExportStep::ScanDependencies => "scanning dependencies",
            ExportStep::WriteComponents => "writing components",
            ExportStep::WriteAggregates => "writing index and routing files",
            ExportStep::WriteConfiguration => "writing configuration files",
        }
    }
}

impl fmt::Display for ExportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("A different file already exists at {}", path.display())]
    NameCollision { path: PathBuf },

    #[error("Invalid component name '{0}'")]
    InvalidName(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("`{command}` failed{}: {stderr}", code.map(|c| format!(" with exit code {}", c)).unwrap_or_default())]
    ExternalTool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Invalid project descriptor {}: {source}", path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Export failed while {step}: {source}")]
    Export {
        step: ExportStep,
        #[source]
        source: Box<ForgeError>,
    },
}

impl ForgeError {
    /// Wrap an I/O error with the path it happened at
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        ForgeError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The innermost typed failure, looking through export step wrappers
    pub fn root(&self) -> &ForgeError {
        match self {
            ForgeError::Export { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_export_steps() {
        let err = ForgeError::Export {
            step: ExportStep::WriteComponents,
            source: Box::new(ForgeError::NameCollision {
                path: PathBuf::from("/tmp/foo.tsx"),
            }),
        };

        assert!(matches!(err.root(), ForgeError::NameCollision { .. }));
        assert!(err.to_string().contains("writing components"));
    }

    #[test]
    fn test_external_tool_message_includes_exit_code() {
        let err = ForgeError::ExternalTool {
            command: "npm install".to_string(),
            code: Some(1),
            stderr: "ERESOLVE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`npm install` failed with exit code 1: ERESOLVE"
        );
    }
}
