//! Forge Core - component management and project scaffolding
//!
//! This library keeps a working set of React component files and generates
//! project skeletons around them: a Vite React app, a Next.js app or a
//! publishable component library. It is used by the `tsx-forge` CLI but has
//! no terminal dependency of its own beyond the optional prompts.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Components** - `ComponentRecord`/`ComponentStore`, name transforms,
//!   dependency scanning and the naive formatter
//! - **Layer 2: Scaffolding** - the shared export pipeline and the three `Generator`s
//! - **Layer 3: Surroundings** - project descriptor, settings, package-manager
//!   orchestration and optional cliclack prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts and progress sink
//!
//! # Example Usage
//!
//! ```ignore
//! use forge_core::{ComponentStore, ConsoleSink, ExportOptions, ReactAppGenerator};
//!
//! let mut store = ComponentStore::new();
//! store.add("src/UserCard.tsx")?;
//!
//! let out = forge_core::export(
//!     &ReactAppGenerator,
//!     store.records(),
//!     "dist/gallery".as_ref(),
//!     &ExportOptions::default(),
//!     &ConsoleSink,
//! )?;
//! ```

pub mod component;
pub mod deps;
pub mod error;
pub mod format;
pub mod naming;
pub mod progress;
pub mod project;
pub mod runtime;
pub mod scaffold;
pub mod settings;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use component::{ComponentId, ComponentRecord, ComponentStore};
pub use error::{ExportStep, ForgeError, Result};
pub use progress::{ConsoleSink, ProgressSink, Recorder, Severity};
pub use project::{load_project, save_project, ProjectDescriptor};
pub use runtime::{PackageManager, RunningTool, ToolCommand, ToolRunner};
pub use scaffold::{
    export, ExportOptions, Generator, LibraryGenerator, NextAppGenerator, ReactAppGenerator,
    ResolvedOptions, Target,
};
pub use settings::{Settings, Theme};

/// Generator for `target`
pub fn generator_for(target: Target) -> &'static dyn Generator {
    match target {
        Target::ReactApp => &ReactAppGenerator,
        Target::NextApp => &NextAppGenerator,
        Target::Library => &LibraryGenerator,
    }
}
