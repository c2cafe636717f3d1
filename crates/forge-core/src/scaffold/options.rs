//! Export options and their per-target defaults

use crate::error::{ForgeError, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of project a generator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    ReactApp,
    NextApp,
    Library,
}

impl Target {
    pub fn display_name(&self) -> &'static str {
        match self {
            Target::ReactApp => "React app",
            Target::NextApp => "Next.js app",
            Target::Library => "component library",
        }
    }

    /// Fully-populated options used wherever the caller left a field unset
    pub fn defaults(&self) -> ResolvedOptions {
        let name = match self {
            Target::ReactApp => "tsx-components-app",
            Target::NextApp => "nextjs-components-app",
            Target::Library => "component-library",
        };
        ResolvedOptions {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            typescript: true,
            build: BuildTool::Rollup,
            router: RouterKind::App,
            storybook: true,
            tailwind: true,
            eslint: true,
            ui_library: UiLibrary::None,
            include_icons: true,
            next_version: "13.4.12".to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Bundler used by the library target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    #[default]
    Rollup,
    Webpack,
}

/// Next.js routing flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    #[default]
    App,
    Pages,
}

/// Optional UI kit added to the React app dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLibrary {
    #[default]
    None,
    Mui,
    Chakra,
}

/// Caller-supplied options; every field may be left out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Package / app identifier
    #[serde(alias = "appName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Semver version of the generated package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// TypeScript (.tsx/.ts) or JavaScript (.jsx/.js) output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typescript: Option<bool>,

    /// Library bundler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildTool>,

    /// Next.js router
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router: Option<RouterKind>,

    /// Emit Storybook config and stories (library)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storybook: Option<bool>,

    /// Emit Tailwind CSS config (apps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tailwind: Option<bool>,

    /// Emit ESLint config (apps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eslint: Option<bool>,

    /// UI kit for the React app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_library: Option<UiLibrary>,

    /// Pin the icon package even when no component references it (React app)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_icons: Option<bool>,

    /// Next.js release the app is pinned to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version: Option<String>,
}

/// Options after defaults are applied; the pipeline only reads these
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub name: String,
    pub version: String,
    pub typescript: bool,
    pub build: BuildTool,
    pub router: RouterKind,
    pub storybook: bool,
    pub tailwind: bool,
    pub eslint: bool,
    pub ui_library: UiLibrary,
    pub include_icons: bool,
    pub next_version: String,
}

impl ResolvedOptions {
    /// `.tsx` or `.jsx`
    pub fn component_ext(&self) -> &'static str {
        if self.typescript {
            ".tsx"
        } else {
            ".jsx"
        }
    }

    /// `.ts` or `.js`
    pub fn script_ext(&self) -> &'static str {
        if self.typescript {
            ".ts"
        } else {
            ".js"
        }
    }
}

impl ExportOptions {
    /// Fill every unset field from the target's defaults and validate
    ///
    /// Works on a copy; `self` is never modified.
    pub fn resolve(&self, target: Target) -> Result<ResolvedOptions> {
        let defaults = target.defaults();
        let resolved = ResolvedOptions {
            name: self.name.clone().unwrap_or(defaults.name),
            version: self.version.clone().unwrap_or(defaults.version),
            typescript: self.typescript.unwrap_or(defaults.typescript),
            build: self.build.unwrap_or(defaults.build),
            router: self.router.unwrap_or(defaults.router),
            storybook: self.storybook.unwrap_or(defaults.storybook),
            tailwind: self.tailwind.unwrap_or(defaults.tailwind),
            eslint: self.eslint.unwrap_or(defaults.eslint),
            ui_library: self.ui_library.unwrap_or(defaults.ui_library),
            include_icons: self.include_icons.unwrap_or(defaults.include_icons),
            next_version: self.next_version.clone().unwrap_or(defaults.next_version),
        };

        validate_package_name(&resolved.name)?;
        validate_version("version", &resolved.version)?;
        validate_version("nextVersion", &resolved.next_version)?;

        Ok(resolved)
    }
}

fn validate_package_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ForgeError::InvalidOptions("name must not be empty".to_string()));
    }
    if name.chars().any(|c| c.is_whitespace() || c == '\\') {
        return Err(ForgeError::InvalidOptions(format!(
            "name '{}' must not contain whitespace or backslashes",
            name
        )));
    }
    if name.starts_with('.') || name.starts_with('_') {
        return Err(ForgeError::InvalidOptions(format!(
            "name '{}' must not start with '.' or '_'",
            name
        )));
    }
    Ok(())
}

fn validate_version(field: &str, version: &str) -> Result<()> {
    Version::parse(version).map(|_| ()).map_err(|e| {
        ForgeError::InvalidOptions(format!("{} '{}' is not a semantic version: {}", field, version, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_applies_target_defaults() {
        let options = ExportOptions::default();

        let react = options.resolve(Target::ReactApp).unwrap();
        assert_eq!(react.name, "tsx-components-app");
        assert_eq!(react.version, "0.1.0");
        assert!(react.typescript);

        let next = options.resolve(Target::NextApp).unwrap();
        assert_eq!(next.name, "nextjs-components-app");
        assert_eq!(next.router, RouterKind::App);
        assert_eq!(next.next_version, "13.4.12");

        let lib = options.resolve(Target::Library).unwrap();
        assert_eq!(lib.name, "component-library");
        assert_eq!(lib.build, BuildTool::Rollup);
        assert!(lib.storybook);
    }

    #[test]
    fn test_resolve_keeps_caller_values_and_does_not_mutate() {
        let options = ExportOptions {
            name: Some("ui-kit".to_string()),
            typescript: Some(false),
            build: Some(BuildTool::Webpack),
            ..Default::default()
        };
        let before = options.clone();

        let resolved = options.resolve(Target::Library).unwrap();
        assert_eq!(resolved.name, "ui-kit");
        assert!(!resolved.typescript);
        assert_eq!(resolved.build, BuildTool::Webpack);
        assert_eq!(resolved.component_ext(), ".jsx");
        assert_eq!(resolved.script_ext(), ".js");
        assert_eq!(options, before);
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let empty_name = ExportOptions {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            empty_name.resolve(Target::ReactApp),
            Err(ForgeError::InvalidOptions(_))
        ));

        let bad_version = ExportOptions {
            version: Some("one".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_version.resolve(Target::Library),
            Err(ForgeError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_options_deserialize_camel_case_and_alias() {
        let options: ExportOptions = serde_json::from_str(
            r#"{"appName": "gallery", "uiLibrary": "mui", "router": "pages", "includeIcons": false}"#,
        )
        .unwrap();
        assert_eq!(options.name.as_deref(), Some("gallery"));
        assert_eq!(options.ui_library, Some(UiLibrary::Mui));
        assert_eq!(options.router, Some(RouterKind::Pages));
        assert_eq!(options.include_icons, Some(false));
        assert_eq!(options.typescript, None);
    }
}
