//! Generated `package.json` model

use crate::deps::CORE_PACKAGES;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Version written for packages found by the dependency scanner
///
/// A fixed placeholder keeps generated output identical between runs; the
/// package manager resolves it at install time.
pub const DISCOVERED_VERSION: &str = "latest";

pub const REACT_VERSION: &str = "^18.2.0";
pub const ICON_PACKAGE_VERSION: &str = "^0.279.0";

/// Sorted `name -> version` map
pub type DependencyMap = BTreeMap<String, String>;

/// Build a dependency map from `(name, version)` pairs
pub fn pinned(entries: &[(&str, &str)]) -> DependencyMap {
    entries
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect()
}

/// Add every discovered package not already pinned, at [`DISCOVERED_VERSION`]
pub fn merge_discovered(dependencies: &mut DependencyMap, discovered: &BTreeSet<String>) {
    for package in discovered {
        if CORE_PACKAGES.contains(&package.as_str()) {
            continue;
        }
        dependencies
            .entry(package.clone())
            .or_insert_with(|| DISCOVERED_VERSION.to_string());
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    pub scripts: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    pub dependencies: DependencyMap,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: DependencyMap,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub peer_dependencies: DependencyMap,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browserslist: Option<Value>,
}

impl PackageManifest {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    pub fn script(&mut self, name: &str, command: &str) -> &mut Self {
        self.scripts.insert(name.to_string(), command.to_string());
        self
    }
}
