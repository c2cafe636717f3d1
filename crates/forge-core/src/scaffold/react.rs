//! Plain React app: Vite dev server and a single-page component gallery

use super::manifest::{self, pinned, PackageManifest, ICON_PACKAGE_VERSION, REACT_VERSION};
use super::{barrel, component_bullets, ExportContext, Generator, ResolvedOptions, Target, UiLibrary};
use crate::deps::ICON_PACKAGE;
use crate::error::Result;
use serde_json::json;

pub struct ReactAppGenerator;

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <meta name="theme-color" content="#000000" />
    <meta name="description" content="__APP_NAME__" />
    <title>__APP_NAME__</title>
  </head>
  <body>
    <noscript>You need to enable JavaScript to run this app.</noscript>
    <div id="root"></div>
    <script type="module" src="/src/main__EXT__"></script>
  </body>
</html>
"##;

const MAIN_ENTRY: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';
import './index.css';

ReactDOM.createRoot(document.getElementById('root')__NON_NULL__).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>,
);
"#;

const VITE_CONFIG: &str = r#"import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
  server: {
    port: 3000,
  },
});
"#;

const TAILWIND_CONFIG: &str = r#"/** @type {import('tailwindcss').Config} */
export default {
  content: [
    "./index.html",
    "./src/**/*.{js,jsx,ts,tsx}",
  ],
  theme: {
    extend: {},
  },
  plugins: [],
}
"#;

const POSTCSS_CONFIG: &str = r#"export default {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
}
"#;

const TAILWIND_DIRECTIVES: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n\n";

const BASE_CSS: &str = r#"body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
    'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
    sans-serif;
  -webkit-font-smoothing: antialiased;
  -moz-osx-font-smoothing: grayscale;
}

code {
  font-family: source-code-pro, Menlo, Monaco, Consolas, 'Courier New',
    monospace;
}
"#;

const ESLINTRC: &str = r#"module.exports = {
  root: true,
  env: { browser: true, es2020: true },
  extends: [
    'eslint:recommended',
    'plugin:react/recommended',
    'plugin:react/jsx-runtime',
    'plugin:react-hooks/recommended',__TS_EXTENDS__
  ],
  ignorePatterns: ['dist', '.eslintrc.cjs'],__TS_PARSER__
  settings: { react: { version: '18.2' } },
};
"#;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "ES2020",
    "useDefineForClassFields": true,
    "lib": ["ES2020", "DOM", "DOM.Iterable"],
    "module": "ESNext",
    "skipLibCheck": true,
    "moduleResolution": "bundler",
    "allowImportingTsExtensions": true,
    "resolveJsonModule": true,
    "isolatedModules": true,
    "noEmit": true,
    "jsx": "react-jsx",
    "strict": false
  },
  "include": ["src"],
  "references": [{ "path": "./tsconfig.node.json" }]
}
"#;

const TSCONFIG_NODE: &str = r#"{
  "compilerOptions": {
    "composite": true,
    "skipLibCheck": true,
    "module": "ESNext",
    "moduleResolution": "bundler",
    "allowSyntheticDefaultImports": true
  },
  "include": ["vite.config.ts"]
}
"#;

const GITIGNORE: &str = "node_modules\ndist\ncoverage\n.DS_Store\n*.local\nnpm-debug.log*\nyarn-debug.log*\nyarn-error.log*\n";

impl ReactAppGenerator {
    fn write_gallery(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        ctx.progress.info("Creating App with component gallery...");
        let ts = ctx.options.typescript;

        let mut app = String::from("import { useState } from 'react';\n");
        if ts {
            app.push_str("import type { ComponentType } from 'react';\n");
        }
        if !ctx.components.is_empty() {
            let names: Vec<&str> = ctx
                .components
                .iter()
                .map(|c| c.transformed_name.as_str())
                .collect();
            app.push_str(&format!("import {{ {} }} from './index';\n", names.join(", ")));
        }
        app.push('\n');

        let map_type = if ts { ": Record<string, ComponentType>" } else { "" };
        app.push_str(&format!("const components{} = {{\n", map_type));
        for c in &ctx.components {
            app.push_str(&format!("  {:?}: {},\n", c.original_name, c.transformed_name));
        }
        app.push_str("};\n\n");

        let first = ctx
            .components
            .first()
            .map(|c| c.original_name.as_str())
            .unwrap_or("");
        app.push_str("function App() {\n");
        app.push_str(&format!("  const [activeComponent, setActiveComponent] = useState({:?});\n", first));
        app.push_str("  const ActiveComponent = components[activeComponent];\n\n");
        app.push_str(
            r#"  return (
    <div className="container mx-auto p-4">
      <h1 className="text-3xl font-bold mb-6 text-center">Component Gallery</h1>

      <div className="mb-6">
        <label className="block mb-2 font-semibold">Select a Component:</label>
        <select
          className="border border-gray-300 rounded px-3 py-2 w-full"
          value={activeComponent}
          onChange={(e) => setActiveComponent(e.target.value)}
        >
"#,
        );
        for c in &ctx.components {
            app.push_str(&format!(
                "          <option key={name:?} value={name:?}>{name}</option>\n",
                name = c.original_name
            ));
        }
        app.push_str(
            r#"        </select>
      </div>

      <div className="border border-gray-300 rounded-lg p-4 bg-white">
        <h2 className="text-xl font-bold mb-4">{activeComponent}</h2>
        <div className="component-container">
          {ActiveComponent && <ActiveComponent />}
        </div>
      </div>
    </div>
  );
}

export default App;
"#,
        );

        let ext = ctx.options.component_ext();
        ctx.out.write(&format!("src/App{}", ext), &app)?;
        Ok(())
    }

    fn package_manifest(&self, ctx: &ExportContext<'_>) -> PackageManifest {
        let options = &ctx.options;
        let mut pkg = PackageManifest::new(&options.name, &options.version);
        pkg.private = Some(true);
        pkg.module_type = Some("module".to_string());

        pkg.script("start", "vite")
            .script("build", if options.typescript { "tsc && vite build" } else { "vite build" })
            .script("test", "vitest run --passWithNoTests")
            .script("preview", "vite preview");
        if options.eslint {
            let exts = if options.typescript { "ts,tsx" } else { "js,jsx" };
            pkg.script("lint", &format!("eslint src --ext {}", exts));
        }

        let mut dependencies = pinned(&[("react", REACT_VERSION), ("react-dom", REACT_VERSION)]);
        match options.ui_library {
            UiLibrary::Mui => dependencies.extend(pinned(&[
                ("@mui/material", "^5.14.5"),
                ("@mui/icons-material", "^5.14.5"),
                ("@emotion/react", "^11.11.1"),
                ("@emotion/styled", "^11.11.0"),
            ])),
            UiLibrary::Chakra => dependencies.extend(pinned(&[
                ("@chakra-ui/react", "^2.8.0"),
                ("@emotion/react", "^11.11.1"),
                ("@emotion/styled", "^11.11.0"),
                ("framer-motion", "^10.16.1"),
            ])),
            UiLibrary::None => {}
        }
        if options.include_icons || ctx.dependencies.contains(ICON_PACKAGE) {
            dependencies.insert(ICON_PACKAGE.to_string(), ICON_PACKAGE_VERSION.to_string());
        }
        manifest::merge_discovered(&mut dependencies, &ctx.dependencies);
        pkg.dependencies = dependencies;

        let mut dev = pinned(&[
            ("vite", "^4.4.5"),
            ("@vitejs/plugin-react", "^4.0.3"),
            ("vitest", "^0.34.1"),
        ]);
        if options.typescript {
            dev.extend(pinned(&[
                ("typescript", "^5.1.6"),
                ("@types/react", "^18.2.15"),
                ("@types/react-dom", "^18.2.7"),
            ]));
        }
        if options.tailwind {
            dev.extend(pinned(&[
                ("tailwindcss", "^3.3.3"),
                ("autoprefixer", "^10.4.14"),
                ("postcss", "^8.4.24"),
            ]));
        }
        if options.eslint {
            dev.extend(pinned(&[
                ("eslint", "^8.45.0"),
                ("eslint-plugin-react", "^7.33.0"),
                ("eslint-plugin-react-hooks", "^4.6.0"),
            ]));
            if options.typescript {
                dev.extend(pinned(&[
                    ("@typescript-eslint/eslint-plugin", "^6.0.0"),
                    ("@typescript-eslint/parser", "^6.0.0"),
                ]));
            }
        }
        pkg.dev_dependencies = dev;

        pkg.browserslist = Some(json!({
            "production": [">0.2%", "not dead", "not op_mini all"],
            "development": [
                "last 1 chrome version",
                "last 1 firefox version",
                "last 1 safari version"
            ]
        }));
        pkg
    }

    fn readme(&self, ctx: &ExportContext<'_>) -> String {
        format!(
            r#"# {name}

A React application that displays a gallery of components.

## Included Components

{components}

## Getting Started

1. Install dependencies:
   ```
   npm install
   ```

2. Start the development server:
   ```
   npm start
   ```

3. Open [http://localhost:3000](http://localhost:3000) to view the application.

## Available Scripts

- `npm start` - Runs the app in development mode
- `npm test` - Runs the test suite
- `npm run build` - Builds the app for production
- `npm run preview` - Serves the production build locally
"#,
            name = ctx.options.name,
            components = component_bullets(&ctx.components)
        )
    }
}

impl Generator for ReactAppGenerator {
    fn target(&self) -> Target {
        Target::ReactApp
    }

    fn directories(&self, _options: &ResolvedOptions) -> Vec<&'static str> {
        vec!["public", "src", "src/components"]
    }

    fn components_dir(&self, _options: &ResolvedOptions) -> &'static str {
        "src/components"
    }

    fn write_aggregates(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let index = barrel(&ctx.components, "./components");
        let script_ext = ctx.options.script_ext();
        ctx.out.write(&format!("src/index{}", script_ext), &index)?;

        self.write_gallery(ctx)?;

        let main = MAIN_ENTRY.replace("__NON_NULL__", if ctx.options.typescript { "!" } else { "" });
        let component_ext = ctx.options.component_ext();
        ctx.out.write(&format!("src/main{}", component_ext), &main)?;
        Ok(())
    }

    fn write_configuration(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let pkg = self.package_manifest(ctx);
        ctx.out.write_json("package.json", &pkg)?;

        let html = INDEX_HTML
            .replace("__APP_NAME__", &ctx.options.name)
            .replace("__EXT__", ctx.options.component_ext());
        ctx.out.write("index.html", &html)?;

        let script_ext = ctx.options.script_ext();
        ctx.out.write(&format!("vite.config{}", script_ext), VITE_CONFIG)?;

        if ctx.options.typescript {
            ctx.out.write("tsconfig.json", TSCONFIG)?;
            ctx.out.write("tsconfig.node.json", TSCONFIG_NODE)?;
        }

        let mut css = String::new();
        if ctx.options.tailwind {
            css.push_str(TAILWIND_DIRECTIVES);
            ctx.out.write("tailwind.config.js", TAILWIND_CONFIG)?;
            ctx.out.write("postcss.config.js", POSTCSS_CONFIG)?;
        }
        css.push_str(BASE_CSS);
        ctx.out.write("src/index.css", &css)?;

        if ctx.options.eslint {
            let (extends, parser) = if ctx.options.typescript {
                (
                    "\n    'plugin:@typescript-eslint/recommended',",
                    "\n  parser: '@typescript-eslint/parser',",
                )
            } else {
                ("", "")
            };
            let eslintrc = ESLINTRC
                .replace("__TS_EXTENDS__", extends)
                .replace("__TS_PARSER__", parser);
            ctx.out.write(".eslintrc.cjs", &eslintrc)?;
        }

        ctx.out.write(".gitignore", GITIGNORE)?;

        let readme = self.readme(ctx);
        ctx.out.write("README.md", &readme)?;
        Ok(())
    }
}
