//! Publishable component library (rollup or webpack, optional Storybook)

use super::manifest::{self, pinned, PackageManifest, REACT_VERSION};
use super::{barrel, component_bullets, BuildTool, ExportContext, GeneratedComponentInfo, Generator, ResolvedOptions, Target};
use crate::error::Result;
use crate::naming::to_pascal_case;

pub struct LibraryGenerator;

const PEER_REACT: &str = "^17.0.0 || ^18.0.0";
const STORYBOOK_VERSION: &str = "^7.0.24";

const ROLLUP_CONFIG: &str = r#"import { createRequire } from 'node:module';
import resolve from '@rollup/plugin-node-resolve';
import commonjs from '@rollup/plugin-commonjs';
import babel from '@rollup/plugin-babel';__TS_IMPORT__
import terser from '@rollup/plugin-terser';
import peerDepsExternal from 'rollup-plugin-peer-deps-external';

const require = createRequire(import.meta.url);
const pkg = require('./package.json');
const extensions = [__EXTENSIONS__];

export default {
  input: 'src/index__SCRIPT_EXT__',
  output: [
    {
      file: pkg.main,
      format: 'cjs',
      sourcemap: true,
    },
    {
      file: pkg.module,
      format: 'esm',
      sourcemap: true,
    },
  ],
  plugins: [
    peerDepsExternal(),
    resolve({ extensions }),
    commonjs(),__TS_PLUGIN__
    babel({
      babelHelpers: 'bundled',
      exclude: 'node_modules/**',
      extensions,
      presets: ['@babel/preset-env', '@babel/preset-react'__TS_PRESET__],
    }),
    terser(),
  ],
  external: Object.keys(pkg.peerDependencies || {}),
};
"#;

const WEBPACK_CONFIG: &str = r#"const path = require('path');

module.exports = {
  mode: 'production',
  entry: './src/index__SCRIPT_EXT__',
  output: {
    path: path.resolve(__dirname, 'dist'),
    filename: 'index.js',
    libraryTarget: 'umd',
    library: '__LIBRARY_NAME__',
    umdNamedDefine: true,
    globalObject: 'this',
  },
  resolve: {
    extensions: [__EXTENSIONS__],
  },
  module: {
    rules: [__TS_RULE__
      {
        test: /\.jsx?$/,
        exclude: /node_modules/,
        use: {
          loader: 'babel-loader',
          options: {
            presets: ['@babel/preset-env', '@babel/preset-react'],
          },
        },
      },
    ],
  },
  externals: {
    react: 'React',
    'react-dom': 'ReactDOM',
  },
};
"#;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "es5",
    "lib": ["dom", "dom.iterable", "esnext"],
    "allowJs": true,
    "skipLibCheck": true,
    "esModuleInterop": true,
    "allowSyntheticDefaultImports": true,
    "strict": true,
    "forceConsistentCasingInFileNames": true,
    "module": "esnext",
    "moduleResolution": "node",
    "resolveJsonModule": true,
    "isolatedModules": true,
    "jsx": "react-jsx",
    "declaration": true,
    "declarationDir": "dist",
    "outDir": "dist"
  },
  "include": ["src"],
  "exclude": ["node_modules", "dist", "**/*.stories.*"]
}
"#;

const STORYBOOK_MAIN: &str = r#"module.exports = {
  stories: ['../stories/**/*.stories.__STORY_EXT__'],
  addons: [
    '@storybook/addon-links',
    '@storybook/addon-essentials',
  ],
  framework: {
    name: '@storybook/react-webpack5',
    options: {},
  },
  docs: {
    autodocs: true,
  },
};
"#;

const STORYBOOK_PREVIEW: &str = r#"export const parameters = {
  actions: { argTypesRegex: '^on[A-Z].*' },
  controls: {
    matchers: {
      color: /(background|color)$/i,
      date: /Date$/,
    },
  },
};
"#;

const GITIGNORE: &str = "node_modules\ndist\nstorybook-static\ncoverage\n.DS_Store\nnpm-debug.log*\n";

impl LibraryGenerator {
    fn type_stub(&self, info: &GeneratedComponentInfo) -> String {
        format!(
            r#"import type {{ CSSProperties, ReactNode }} from 'react';

export interface {name}Props {{
  /** Optional children content */
  children?: ReactNode;
  /** Optional CSS class name */
  className?: string;
  /** Optional inline style */
  style?: CSSProperties;
}}

/**
 * {original} component
 */
declare function {name}(props: {name}Props): JSX.Element;

export default {name};
"#,
            name = info.binding_name,
            original = info.original_name
        )
    }

    fn story(&self, info: &GeneratedComponentInfo) -> String {
        format!(
            r#"import React from 'react';
import {name} from '../src/components/{file}';

export default {{
  title: 'Components/{original}',
  component: {name},
  parameters: {{
    layout: 'centered',
  }},
  tags: ['autodocs'],
}};

export const Default = () => <{name} />;

export const WithCustomProps = () => <{name} className="custom-class" />;
"#,
            name = info.binding_name,
            file = info.transformed_name,
            original = info.original_name
        )
    }

    fn extensions(&self, options: &ResolvedOptions) -> &'static str {
        if options.typescript {
            "'.js', '.jsx', '.ts', '.tsx'"
        } else {
            "'.js', '.jsx'"
        }
    }

    fn bundler_config(&self, options: &ResolvedOptions) -> (&'static str, String) {
        let ts = options.typescript;
        match options.build {
            BuildTool::Rollup => {
                let config = ROLLUP_CONFIG
                    .replace(
                        "__TS_IMPORT__",
                        if ts { "\nimport typescript from '@rollup/plugin-typescript';" } else { "" },
                    )
                    .replace("__EXTENSIONS__", self.extensions(options))
                    .replace("__SCRIPT_EXT__", options.script_ext())
                    .replace(
                        "__TS_PLUGIN__",
                        if ts { "\n    typescript({ tsconfig: './tsconfig.json' })," } else { "" },
                    )
                    .replace("__TS_PRESET__", if ts { ", '@babel/preset-typescript'" } else { "" });
                ("rollup.config.mjs", config)
            }
            BuildTool::Webpack => {
                let ts_rule = "\n      {\n        test: /\\.tsx?$/,\n        use: 'ts-loader',\n        exclude: /node_modules/,\n      },";
                let config = WEBPACK_CONFIG
                    .replace("__SCRIPT_EXT__", options.script_ext())
                    .replace("__LIBRARY_NAME__", &to_pascal_case(&options.name))
                    .replace("__EXTENSIONS__", self.extensions(options))
                    .replace("__TS_RULE__", if ts { ts_rule } else { "" });
                ("webpack.config.js", config)
            }
        }
    }

    fn package_manifest(&self, ctx: &ExportContext<'_>) -> PackageManifest {
        let options = &ctx.options;
        let mut pkg = PackageManifest::new(&options.name, &options.version);
        pkg.description = Some("A library of React components".to_string());
        pkg.main = Some("dist/index.js".to_string());
        pkg.module = Some("dist/index.esm.js".to_string());
        if options.typescript {
            pkg.types = Some("dist/index.d.ts".to_string());
        }
        pkg.files = vec!["dist".to_string()];
        pkg.keywords = ["react", "component", "library", "ui"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        pkg.author = Some(String::new());
        pkg.license = Some("MIT".to_string());

        pkg.script(
            "build",
            match options.build {
                BuildTool::Rollup => "rollup -c",
                BuildTool::Webpack => "webpack --mode production",
            },
        );
        if options.storybook {
            pkg.script("storybook", "storybook dev -p 6006")
                .script("build-storybook", "storybook build");
        }

        let mut dependencies = pinned(&[("react", REACT_VERSION), ("react-dom", REACT_VERSION)]);
        manifest::merge_discovered(&mut dependencies, &ctx.dependencies);
        pkg.dependencies = dependencies;
        pkg.peer_dependencies = pinned(&[("react", PEER_REACT), ("react-dom", PEER_REACT)]);

        let mut dev = pinned(&[
            ("@babel/core", "^7.22.5"),
            ("@babel/preset-env", "^7.22.5"),
            ("@babel/preset-react", "^7.22.5"),
        ]);
        match options.build {
            BuildTool::Rollup => dev.extend(pinned(&[
                ("rollup", "^3.26.0"),
                ("@rollup/plugin-node-resolve", "^15.1.0"),
                ("@rollup/plugin-commonjs", "^25.0.2"),
                ("@rollup/plugin-babel", "^6.0.3"),
                ("@rollup/plugin-terser", "^0.4.3"),
                ("rollup-plugin-peer-deps-external", "^2.2.4"),
            ])),
            BuildTool::Webpack => dev.extend(pinned(&[
                ("webpack", "^5.88.1"),
                ("webpack-cli", "^5.1.4"),
                ("babel-loader", "^9.1.2"),
            ])),
        }
        if options.typescript {
            dev.extend(pinned(&[
                ("typescript", "^5.1.6"),
                ("tslib", "^2.6.1"),
                ("@types/react", "^18.2.15"),
                ("@types/react-dom", "^18.2.7"),
                ("@babel/preset-typescript", "^7.22.5"),
            ]));
            match options.build {
                BuildTool::Rollup => dev.extend(pinned(&[("@rollup/plugin-typescript", "^11.1.2")])),
                BuildTool::Webpack => dev.extend(pinned(&[("ts-loader", "^9.4.4")])),
            }
        }
        if options.storybook {
            dev.extend(pinned(&[
                ("storybook", STORYBOOK_VERSION),
                ("@storybook/react", STORYBOOK_VERSION),
                ("@storybook/react-webpack5", STORYBOOK_VERSION),
                ("@storybook/blocks", STORYBOOK_VERSION),
                ("@storybook/addon-links", STORYBOOK_VERSION),
                ("@storybook/addon-essentials", STORYBOOK_VERSION),
            ]));
        }
        pkg.dev_dependencies = dev;
        pkg
    }

    fn readme(&self, ctx: &ExportContext<'_>) -> String {
        let mut readme = format!(
            r#"# {name}

A library of React components.

## Installation

```
npm install {name}
```

## Components

{components}

## Usage

```jsx
import {{ {first} }} from '{name}';
```

## Development

- `npm run build` - Builds the library into `dist/`
"#,
            name = ctx.options.name,
            components = component_bullets(&ctx.components),
            first = ctx
                .components
                .first()
                .map(|c| c.transformed_name.as_str())
                .unwrap_or("component")
        );
        if ctx.options.storybook {
            readme.push_str("- `npm run storybook` - Starts Storybook on port 6006\n");
            readme.push_str("- `npm run build-storybook` - Builds a static Storybook\n");
        }
        readme
    }
}

impl Generator for LibraryGenerator {
    fn target(&self) -> Target {
        Target::Library
    }

    fn directories(&self, options: &ResolvedOptions) -> Vec<&'static str> {
        let mut dirs = vec!["src", "src/components"];
        if options.storybook {
            dirs.push("stories");
            dirs.push(".storybook");
        }
        dirs
    }

    fn components_dir(&self, _options: &ResolvedOptions) -> &'static str {
        "src/components"
    }

    fn write_companions(&self, ctx: &mut ExportContext<'_>, info: &GeneratedComponentInfo) -> Result<()> {
        if ctx.options.typescript {
            let stub = self.type_stub(info);
            ctx.out.write(&format!("src/components/{}.d.ts", info.transformed_name), &stub)?;
        }
        if ctx.options.storybook {
            let story = self.story(info);
            let ext = ctx.options.component_ext();
            ctx.out.write(&format!("stories/{}.stories{}", info.transformed_name, ext), &story)?;
        }
        Ok(())
    }

    fn write_aggregates(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let index = barrel(&ctx.components, "./components");
        let script_ext = ctx.options.script_ext();
        ctx.out.write(&format!("src/index{}", script_ext), &index)?;
        Ok(())
    }

    fn write_configuration(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let pkg = self.package_manifest(ctx);
        ctx.out.write_json("package.json", &pkg)?;

        let (file, config) = self.bundler_config(&ctx.options);
        ctx.out.write(file, &config)?;

        if ctx.options.typescript {
            ctx.out.write("tsconfig.json", TSCONFIG)?;
        }

        if ctx.options.storybook {
            ctx.progress.info("Setting up Storybook...");
            let story_ext = if ctx.options.typescript { "tsx" } else { "jsx" };
            ctx.out
                .write(".storybook/main.js", &STORYBOOK_MAIN.replace("__STORY_EXT__", story_ext))?;
            ctx.out.write(".storybook/preview.js", STORYBOOK_PREVIEW)?;
        }

        ctx.out.write(".gitignore", GITIGNORE)?;
        let readme = self.readme(ctx);
        ctx.out.write("README.md", &readme)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentRecord;
    use crate::error::{ExportStep, ForgeError};
    use crate::progress::Recorder;
    use crate::scaffold::test_support::snapshot;
    use crate::scaffold::{export, ExportOptions};
    use std::fs;

    fn components() -> Vec<ComponentRecord> {
        vec![
            ComponentRecord::with_content(
                "/src/Button.tsx",
                "import clsx from 'clsx';\nexport default function Button() { return <button />; }",
            ),
            ComponentRecord::with_content(
                "/src/status_badge.tsx",
                "import { Activity } from 'lucide-react';\nexport default () => <Activity />;",
            ),
        ]
    }

    #[test]
    fn test_library_rollup_export() {
        let dir = tempfile::tempdir().unwrap();

        let root = export(&LibraryGenerator, &components(), dir.path(), &ExportOptions::default(), &Recorder::new()).unwrap();

        assert!(root.join("src/components/button.tsx").exists());
        let stub = fs::read_to_string(root.join("src/components/statusBadge.d.ts")).unwrap();
        assert!(stub.contains("export interface StatusBadgeProps"));
        let story = fs::read_to_string(root.join("stories/statusBadge.stories.tsx")).unwrap();
        assert!(story.contains("import StatusBadge from '../src/components/statusBadge';"));

        let index = fs::read_to_string(root.join("src/index.ts")).unwrap();
        assert_eq!(
            index,
            "export { default as button } from './components/button';\nexport { default as statusBadge } from './components/statusBadge';\n"
        );

        let rollup = fs::read_to_string(root.join("rollup.config.mjs")).unwrap();
        assert!(rollup.contains("input: 'src/index.ts'"));
        assert!(rollup.contains("@rollup/plugin-typescript"));
        assert!(root.join(".storybook/main.js").exists());
        assert!(root.join(".storybook/preview.js").exists());

        let pkg: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
        assert_eq!(pkg["scripts"]["build"], "rollup -c");
        assert_eq!(pkg["scripts"]["storybook"], "storybook dev -p 6006");
        assert_eq!(pkg["types"], "dist/index.d.ts");
        assert_eq!(pkg["peerDependencies"]["react"], PEER_REACT);
        assert_eq!(pkg["dependencies"]["clsx"], "latest");
        assert_eq!(pkg["dependencies"]["lucide-react"], "latest");
        assert_eq!(pkg["license"], "MIT");
    }

    #[test]
    fn test_library_webpack_javascript_without_storybook() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            name: Some("acme-ui".to_string()),
            build: Some(BuildTool::Webpack),
            typescript: Some(false),
            storybook: Some(false),
            ..Default::default()
        };

        let root = export(&LibraryGenerator, &components(), dir.path(), &options, &Recorder::new()).unwrap();

        assert!(root.join("src/components/button.jsx").exists());
        assert!(!root.join("src/components/button.d.ts").exists());
        assert!(!root.join("stories").exists());
        assert!(!root.join(".storybook").exists());
        assert!(!root.join("tsconfig.json").exists());
        assert!(!root.join("rollup.config.mjs").exists());

        let webpack = fs::read_to_string(root.join("webpack.config.js")).unwrap();
        assert!(webpack.contains("library: 'AcmeUi'"));
        assert!(webpack.contains("entry: './src/index.js'"));
        assert!(!webpack.contains("ts-loader"));

        let pkg: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
        assert_eq!(pkg["scripts"]["build"], "webpack --mode production");
        assert!(pkg["scripts"].get("storybook").is_none());
        assert!(pkg.get("types").is_none());
    }

    #[test]
    fn test_library_export_is_deterministic() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        export(&LibraryGenerator, &components(), first.path(), &ExportOptions::default(), &Recorder::new()).unwrap();
        export(&LibraryGenerator, &components(), second.path(), &ExportOptions::default(), &Recorder::new()).unwrap();

        let a = snapshot(first.path());
        assert!(!a.is_empty());
        assert_eq!(a, snapshot(second.path()));
    }

    #[test]
    fn test_library_name_collision_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let components = vec![
            ComponentRecord::with_content("/a/user-card.tsx", "export default () => null;"),
            ComponentRecord::with_content("/b/user_card.tsx", "export default () => null;"),
        ];
        let recorder = Recorder::new();

        let err = export(&LibraryGenerator, &components, dir.path(), &ExportOptions::default(), &recorder).unwrap_err();

        assert!(matches!(
            err,
            ForgeError::Export {
                step: ExportStep::WriteComponents,
                ..
            }
        ));
        assert!(matches!(err.root(), ForgeError::NameCollision { .. }));
        assert!(recorder.messages().last().unwrap().starts_with("Error: "));
        assert!(!dir.path().join("package.json").exists());
    }

    #[test]
    fn test_library_rejects_invalid_version() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            version: Some("v1".to_string()),
            ..Default::default()
        };

        let err = export(&LibraryGenerator, &components(), dir.path(), &options, &Recorder::new()).unwrap_err();
        assert!(matches!(err.root(), ForgeError::InvalidOptions(_)));
    }
}
