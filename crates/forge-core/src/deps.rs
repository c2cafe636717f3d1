//! External package discovery from component import statements

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Package that provides the icon components matched by the textual heuristic
pub const ICON_PACKAGE: &str = "lucide-react";

/// Icon components some sources use without importing them locally
pub const ICON_IDENTIFIERS: &[&str] = &[
    "Server", "Database", "Globe", "Users", "Network", "Shield", "Activity",
];

/// Framework core packages, always provided by the generated project
pub const CORE_PACKAGES: &[&str] = &["react", "react-dom"];

// import X from 'm' | import { a, b } from 'm' | import * as ns from 'm'
// | import X, { a } from 'm' | import X, * as ns from 'm' | import type ...
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"import\s+(?:type\s+)?(?:[A-Za-z_$][\w$]*\s*,\s*)?(?:\{[^}]*\}|\*\s+as\s+[A-Za-z_$][\w$]*|[A-Za-z_$][\w$]*)\s+from\s+['"]([^'"]+)['"]"#,
    )
    .expect("import pattern is valid")
});

/// Reduce a module specifier to the package that provides it
///
/// `lodash/debounce` -> `lodash`, `@mui/material/Button` -> `@mui/material`
pub fn package_root(specifier: &str) -> &str {
    let mut parts = specifier.splitn(3, '/');
    let first = parts.next().unwrap_or(specifier);
    if first.starts_with('@') {
        match parts.next() {
            Some(second) => &specifier[..first.len() + 1 + second.len()],
            None => first,
        }
    } else {
        first
    }
}

/// Module specifiers of every recognised import statement, in source order
pub fn import_specifiers(content: &str) -> Vec<&str> {
    IMPORT_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// External package names a component depends on
pub fn scan(content: &str) -> BTreeSet<String> {
    let mut packages = BTreeSet::new();

    for specifier in import_specifiers(content) {
        if specifier.starts_with('.') || CORE_PACKAGES.contains(&specifier) {
            continue;
        }
        let root = package_root(specifier);
        if root.is_empty() || CORE_PACKAGES.contains(&root) {
            continue;
        }
        packages.insert(root.to_string());
    }

    if !packages.contains(ICON_PACKAGE)
        && ICON_IDENTIFIERS.iter().any(|icon| content.contains(icon))
    {
        packages.insert(ICON_PACKAGE.to_string());
    }

    packages
}
