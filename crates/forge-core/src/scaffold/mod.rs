//! Project scaffolding around a list of components
//!
//! Every generator runs the same pipeline:
//!
//! 1. resolve options against the target's defaults
//! 2. create the directory skeleton
//! 3. scan and union component dependencies
//! 4. write one file per component (plus companions)
//! 5. write aggregate files (barrel, routes, gallery)
//! 6. write configuration (manifest, bundler config, README)
//!
//! The pipeline is synchronous. Callers that must stay responsive run it on
//! a worker thread. A failing step aborts the export, leaves whatever was
//! already written on disk, reports an `Error: ...` line and returns
//! [`ForgeError::Export`] naming the step.

pub mod library;
pub mod manifest;
pub mod next;
pub mod options;
pub mod output;
pub mod react;

use crate::component::ComponentRecord;
use crate::deps;
use crate::error::{ExportStep, ForgeError, Result};
use crate::naming::{is_valid_binding, to_camel_case, to_pascal_case};
use crate::progress::ProgressSink;
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub use library::LibraryGenerator;
pub use next::NextAppGenerator;
pub use options::{BuildTool, ExportOptions, ResolvedOptions, RouterKind, Target, UiLibrary};
pub use output::OutputTree;
pub use react::ReactAppGenerator;

/// Per-component facts gathered while writing component files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedComponentInfo {
    /// Name of the source component
    pub original_name: String,
    /// camelCase name used for the file and the barrel export
    pub transformed_name: String,
    /// PascalCase identifier used where the component is rendered as JSX
    pub binding_name: String,
    /// Absolute path of the written component file
    pub output_path: PathBuf,
}

/// State shared by the steps of one export run
pub struct ExportContext<'a> {
    pub options: ResolvedOptions,
    pub dependencies: BTreeSet<String>,
    pub components: Vec<GeneratedComponentInfo>,
    pub out: OutputTree,
    pub progress: &'a dyn ProgressSink,
}

/// One concrete project flavour
pub trait Generator {
    fn target(&self) -> Target;

    /// Directories (relative to the root) created before any file is written
    fn directories(&self, options: &ResolvedOptions) -> Vec<&'static str>;

    /// Directory (relative to the root) that receives component files
    fn components_dir(&self, options: &ResolvedOptions) -> &'static str;

    /// Target-specific rewrite applied after import-path adjustment
    fn prepare_component(&self, content: String, _options: &ResolvedOptions) -> String {
        content
    }

    /// Extra files emitted next to each component (type stubs, stories)
    fn write_companions(&self, _ctx: &mut ExportContext<'_>, _info: &GeneratedComponentInfo) -> Result<()> {
        Ok(())
    }

    /// Barrel, routing and gallery files
    fn write_aggregates(&self, ctx: &mut ExportContext<'_>) -> Result<()>;

    /// Manifest, bundler config, README and friends
    fn write_configuration(&self, ctx: &mut ExportContext<'_>) -> Result<()>;
}

/// Run the full pipeline for `generator` into `target_dir`
///
/// Returns the absolute path of the generated project.
pub fn export<G: Generator + ?Sized>(
    generator: &G,
    components: &[ComponentRecord],
    target_dir: &Path,
    options: &ExportOptions,
    progress: &dyn ProgressSink,
) -> Result<PathBuf> {
    match run_pipeline(generator, components, target_dir, options, progress) {
        Ok(root) => Ok(root),
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            progress.error(&format!("Error: {}", e));
            Err(e)
        }
    }
}

fn at<T>(step: ExportStep, result: Result<T>) -> Result<T> {
    result.map_err(|source| ForgeError::Export {
        step,
        source: Box::new(source),
    })
}

fn run_pipeline<G: Generator + ?Sized>(
    generator: &G,
    components: &[ComponentRecord],
    target_dir: &Path,
    options: &ExportOptions,
    progress: &dyn ProgressSink,
) -> Result<PathBuf> {
    let target = generator.target();
    progress.info(&format!(
        "Exporting {} component(s) as a {}...",
        components.len(),
        target.display_name()
    ));

    // Step 1: Options and output root
    let (options, root) = at(ExportStep::ValidateOptions, validate(target_dir, options, target))?;

    let mut ctx = ExportContext {
        options,
        dependencies: BTreeSet::new(),
        components: Vec::with_capacity(components.len()),
        out: OutputTree::new(root),
        progress,
    };

    // Step 2: Directory skeleton
    at(ExportStep::CreateDirectories, create_directories(generator, &ctx))?;

    // Step 3: Dependencies
    ctx.dependencies = at(ExportStep::ScanDependencies, scan_dependencies(components, progress))?;

    // Step 4: Component files
    at(ExportStep::WriteComponents, write_components(generator, components, &mut ctx))?;

    // Step 5: Aggregate files
    progress.info("Creating index files...");
    at(ExportStep::WriteAggregates, generator.write_aggregates(&mut ctx))?;

    // Step 6: Configuration
    progress.info("Creating configuration files...");
    at(ExportStep::WriteConfiguration, generator.write_configuration(&mut ctx))?;

    let root = ctx.out.root().to_path_buf();
    progress.success(&format!(
        "Exported {} to {} ({} files)",
        target.display_name(),
        root.display(),
        ctx.out.written().len()
    ));
    Ok(root)
}

fn validate(target_dir: &Path, options: &ExportOptions, target: Target) -> Result<(ResolvedOptions, PathBuf)> {
    if target_dir.as_os_str().is_empty() {
        return Err(ForgeError::InvalidOptions(
            "output directory must not be empty".to_string(),
        ));
    }
    let resolved = options.resolve(target)?;
    let root = std::path::absolute(target_dir).map_err(|e| ForgeError::io(target_dir, e))?;
    Ok((resolved, root))
}

fn create_directories<G: Generator + ?Sized>(generator: &G, ctx: &ExportContext<'_>) -> Result<()> {
    ctx.progress.info("Creating project structure...");
    ctx.out.create_dir("")?;
    for dir in generator.directories(&ctx.options) {
        ctx.out.create_dir(dir)?;
    }
    Ok(())
}

fn scan_dependencies(components: &[ComponentRecord], progress: &dyn ProgressSink) -> Result<BTreeSet<String>> {
    progress.info("Scanning components for dependencies...");
    let mut all = BTreeSet::new();
    for component in components {
        all.extend(deps::scan(component.content()?));
    }

    let found = if all.is_empty() {
        "none".to_string()
    } else {
        all.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    progress.info(&format!("Found dependencies: {}", found));
    Ok(all)
}

fn write_components<G: Generator + ?Sized>(
    generator: &G,
    components: &[ComponentRecord],
    ctx: &mut ExportContext<'_>,
) -> Result<()> {
    ctx.progress.info("Copying components...");

    let renames: HashMap<&str, String> = components
        .iter()
        .map(|c| (c.name(), to_camel_case(c.name())))
        .collect();

    let components_dir = generator.components_dir(&ctx.options);
    let extension = ctx.options.component_ext();
    let mut taken: HashSet<String> = HashSet::new();

    for component in components {
        let transformed_name = to_camel_case(component.name());
        let binding_name = to_pascal_case(component.name());
        // Both names end up as JS bindings in the barrel and the JSX entry points
        if !is_valid_binding(&transformed_name) || !is_valid_binding(&binding_name) {
            return Err(ForgeError::InvalidName(component.name().to_string()));
        }

        let relative = format!("{}/{}{}", components_dir, transformed_name, extension);
        if !taken.insert(transformed_name.clone()) {
            return Err(ForgeError::NameCollision {
                path: ctx.out.path(&relative),
            });
        }

        let content = rewrite_relative_imports(component.content()?, &renames);
        let content = generator.prepare_component(content, &ctx.options);
        let output_path = ctx.out.write(&relative, &content)?;

        let info = GeneratedComponentInfo {
            original_name: component.name().to_string(),
            binding_name,
            transformed_name,
            output_path,
        };
        generator.write_companions(ctx, &info)?;
        ctx.progress.info(&format!("Added component: {}", info.original_name));
        ctx.components.push(info);
    }

    Ok(())
}

static RELATIVE_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\bfrom\s+|\bimport\s+)(['"])(\.\.?/[^'"]*)['"]"#).expect("relative import pattern is valid")
});

/// Extensions a relative import may spell out for a component module
const MODULE_EXTENSIONS: &[&str] = &[".tsx", ".jsx", ".ts", ".js"];

/// Point relative imports of sibling components at their renamed files
///
/// `import Bar from '../ui/Bar'` becomes `import Bar from './bar'` when `Bar`
/// is one of the exported components, since every component lands in the
/// same directory. The whole file name must name the component, so
/// `./Bar.css` or `./Bar.module.css` are left untouched.
pub fn rewrite_relative_imports(content: &str, renames: &HashMap<&str, String>) -> String {
    RELATIVE_IMPORT_RE
        .replace_all(content, |caps: &Captures| {
            let specifier = &caps[3];
            let file = specifier.rsplit('/').next().unwrap_or(specifier);
            let stem = MODULE_EXTENSIONS
                .iter()
                .find_map(|ext| file.strip_suffix(ext))
                .unwrap_or(file);
            match renames.get(stem) {
                Some(renamed) => format!("{}{}./{}{}", &caps[1], &caps[2], renamed, &caps[2]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Bulleted component list shared by the README templates
pub(crate) fn component_bullets(components: &[GeneratedComponentInfo]) -> String {
    if components.is_empty() {
        return "- (none)".to_string();
    }
    components
        .iter()
        .map(|c| format!("- {}", c.original_name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Barrel file body: one default re-export per component
pub(crate) fn barrel(components: &[GeneratedComponentInfo], from_dir: &str) -> String {
    let mut out = String::new();
    for c in components {
        out.push_str(&format!(
            "export {{ default as {} }} from '{}/{}';\n",
            c.transformed_name, from_dir, c.transformed_name
        ));
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_relative_imports_of_sibling_components() {
        let mut renames = HashMap::new();
        renames.insert("Bar", "bar".to_string());
        renames.insert("user-card", "userCard".to_string());

        let content = "import Bar from './Bar';\nimport Card from \"../ui/user-card.tsx\";\nimport Other from './Other';\nimport x from 'Bar';";
        let rewritten = rewrite_relative_imports(content, &renames);

        assert_eq!(
            rewritten,
            "import Bar from './bar';\nimport Card from \"./userCard\";\nimport Other from './Other';\nimport x from 'Bar';"
        );
    }

    #[test]
    fn test_rewrite_ignores_assets_named_like_components() {
        let mut renames = HashMap::new();
        renames.insert("Bar", "bar".to_string());

        let content = "import './Bar.css';\nimport styles from './Bar.module.css';\nimport Bar from '../ui/Bar';\n";
        assert_eq!(
            rewrite_relative_imports(content, &renames),
            "import './Bar.css';\nimport styles from './Bar.module.css';\nimport Bar from './bar';\n"
        );
    }

    #[test]
    fn test_barrel_lists_every_component() {
        let infos = vec![GeneratedComponentInfo {
            original_name: "Foo".to_string(),
            transformed_name: "foo".to_string(),
            binding_name: "Foo".to_string(),
            output_path: PathBuf::from("/out/src/components/foo.tsx"),
        }];
        assert_eq!(
            barrel(&infos, "./components"),
            "export { default as foo } from './components/foo';\n"
        );
    }
}
