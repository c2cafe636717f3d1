//! Component records and the store that owns them
//!
//! - [`ComponentRecord`]: one source file, its derived name and cached content
//! - [`ComponentStore`]: ordered registry, one record per canonical path
//! - rename/duplicate with declaration identifier substitution

pub mod record;
pub mod rename;
pub mod store;

pub use record::{ComponentId, ComponentRecord};
pub use rename::substitute_declarations;
pub use store::ComponentStore;
