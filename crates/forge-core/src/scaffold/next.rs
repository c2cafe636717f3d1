//! Next.js app with one route per component and a landing page

use super::manifest::{self, pinned, PackageManifest, REACT_VERSION};
use super::{
    barrel, component_bullets, ExportContext, GeneratedComponentInfo, Generator, ResolvedOptions,
    RouterKind, Target,
};
use crate::error::{ForgeError, Result};
use crate::naming::to_kebab_case;
use std::collections::HashSet;

pub struct NextAppGenerator;

/// Route names Next.js already gives a meaning to
const RESERVED_SLUGS: &[&str] = &["api", "index", "404", "500"];

const USE_CLIENT: &str = "'use client';";

const NEXT_CONFIG: &str = r#"/** @type {import('next').NextConfig} */
const nextConfig = {
  reactStrictMode: true,
};

module.exports = nextConfig;
"#;

const NEXT_ENV: &str = r#"/// <reference types="next" />
/// <reference types="next/image-types/global" />

// NOTE: This file should not be edited
// see https://nextjs.org/docs/basic-features/typescript for more information.
"#;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "es5",
    "lib": ["dom", "dom.iterable", "esnext"],
    "allowJs": true,
    "skipLibCheck": true,
    "strict": false,
    "noEmit": true,
    "esModuleInterop": true,
    "module": "esnext",
    "moduleResolution": "bundler",
    "resolveJsonModule": true,
    "isolatedModules": true,
    "jsx": "preserve",
    "incremental": true,__PLUGINS__
    "paths": {
      "@/*": ["./*"]
    }
  },
  "include": ["next-env.d.ts", "**/*.ts", "**/*.tsx"__NEXT_TYPES__],
  "exclude": ["node_modules"]
}
"#;

const JSCONFIG: &str = r#"{
  "compilerOptions": {
    "paths": {
      "@/*": ["./*"]
    }
  }
}
"#;

const TAILWIND_CONFIG: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: [
    './pages/**/*.{js,ts,jsx,tsx,mdx}',
    './components/**/*.{js,ts,jsx,tsx,mdx}',
    './app/**/*.{js,ts,jsx,tsx,mdx}',
  ],
  theme: {
    extend: {},
  },
  plugins: [],
}
"#;

const POSTCSS_CONFIG: &str = r#"module.exports = {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
}
"#;

const TAILWIND_DIRECTIVES: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n\n";

const BASE_CSS: &str = r#"html,
body {
  padding: 0;
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Roboto, Oxygen,
    Ubuntu, Cantarell, Fira Sans, Droid Sans, Helvetica Neue, sans-serif;
}

* {
  box-sizing: border-box;
}
"#;

const ESLINTRC: &str = "{\n  \"extends\": \"next/core-web-vitals\"\n}\n";

const GITIGNORE: &str = "/node_modules\n/.next/\n/out/\n/build\n/coverage\n.DS_Store\n*.pem\nnpm-debug.log*\nyarn-debug.log*\nyarn-error.log*\n.env*.local\n.vercel\n*.tsbuildinfo\nnext-env.d.ts\n";

const APP_LAYOUT: &str = r#"import './globals.css';
import { Inter } from 'next/font/google';__REACT_NODE_IMPORT__

const inter = Inter({ subsets: ['latin'] });

export const metadata = {
  title: '__APP_NAME__',
  description: 'A gallery of React components',
};

export default function RootLayout({ children }__CHILDREN_TYPE__) {
  return (
    <html lang="en">
      <body className={inter.className}>{children}</body>
    </html>
  );
}
"#;

const PAGES_APP: &str = r#"import '../styles/globals.css';__APP_PROPS_IMPORT__

export default function App({ Component, pageProps }__APP_PROPS_TYPE__) {
  return <Component {...pageProps} />;
}
"#;

/// URL segment for a component route
fn route_slug(info: &GeneratedComponentInfo) -> String {
    to_kebab_case(&info.original_name)
}

impl NextAppGenerator {
    fn check_slugs(&self, ctx: &ExportContext<'_>, routes_dir: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for info in &ctx.components {
            let slug = route_slug(info);
            if RESERVED_SLUGS.contains(&slug.as_str()) || !seen.insert(slug.clone()) {
                return Err(ForgeError::NameCollision {
                    path: ctx.out.path(&format!("{}/{}", routes_dir, slug)),
                });
            }
        }
        Ok(())
    }

    fn component_page(&self, info: &GeneratedComponentInfo, import_from: &str, pages_router: bool) -> String {
        let mut page = format!(
            "import {} from '{}/{}';\nimport Link from 'next/link';\n",
            info.binding_name, import_from, info.transformed_name
        );
        if pages_router {
            page.push_str("import Head from 'next/head';\n");
        }
        page.push('\n');

        let head = if pages_router {
            format!("      <Head>\n        <title>{}</title>\n      </Head>\n\n", info.original_name)
        } else {
            String::new()
        };
        page.push_str(&format!(
            r#"export default function {binding}Page() {{
  return (
    <div className="container mx-auto px-4 py-8">
{head}      <Link href="/" className="text-blue-500 hover:underline mb-4 inline-block">
        ← Back to all components
      </Link>

      <h1 className="text-3xl font-bold mb-6">{name}</h1>

      <div className="border border-gray-300 rounded-lg p-6 bg-white">
        <{binding} />
      </div>
    </div>
  );
}}
"#,
            binding = info.binding_name,
            head = head,
            name = info.original_name
        ));
        page
    }

    fn landing_page(&self, ctx: &ExportContext<'_>, pages_router: bool) -> String {
        let mut page = String::new();
        if pages_router {
            page.push_str("import Head from 'next/head';\n");
        }
        page.push_str("import Link from 'next/link';\n\n");
        page.push_str("export default function Home() {\n  return (\n    <div className=\"container mx-auto px-4 py-8\">\n");
        if pages_router {
            page.push_str(&format!(
                "      <Head>\n        <title>{}</title>\n        <meta name=\"description\" content=\"Gallery of components\" />\n      </Head>\n\n",
                ctx.options.name
            ));
        }
        page.push_str(
            r#"      <h1 className="text-3xl font-bold mb-6">Component Gallery</h1>

      <div className="bg-white p-6 rounded-lg shadow-md">
        <h2 className="text-xl font-semibold mb-4">Available Components</h2>

        <ul className="list-disc pl-6">
"#,
        );
        for info in &ctx.components {
            page.push_str(&format!(
                "          <li key={name:?} className=\"mb-2\">\n            <Link href=\"/{slug}\" className=\"text-blue-500 hover:underline\">\n              {name}\n            </Link>\n          </li>\n",
                name = info.original_name,
                slug = route_slug(info)
            ));
        }
        page.push_str("        </ul>\n      </div>\n    </div>\n  );\n}\n");
        page
    }

    fn write_app_router(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let ext = ctx.options.component_ext();
        let ts = ctx.options.typescript;

        let layout = APP_LAYOUT
            .replace(
                "__REACT_NODE_IMPORT__",
                if ts { "\nimport type { ReactNode } from 'react';" } else { "" },
            )
            .replace("__CHILDREN_TYPE__", if ts { ": { children: ReactNode }" } else { "" })
            .replace("__APP_NAME__", &ctx.options.name);
        ctx.out.write(&format!("app/layout{}", ext), &layout)?;

        let landing = self.landing_page(ctx, false);
        ctx.out.write(&format!("app/page{}", ext), &landing)?;

        let pages: Vec<(String, String)> = ctx
            .components
            .iter()
            .map(|info| {
                (
                    format!("app/{}/page{}", route_slug(info), ext),
                    self.component_page(info, "@/components", false),
                )
            })
            .collect();
        for (path, page) in pages {
            ctx.out.write(&path, &page)?;
        }

        ctx.out.write("app/globals.css", &self.globals_css(&ctx.options))?;
        Ok(())
    }

    fn write_pages_router(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let ext = ctx.options.component_ext();
        let ts = ctx.options.typescript;

        let app = PAGES_APP
            .replace(
                "__APP_PROPS_IMPORT__",
                if ts { "\nimport type { AppProps } from 'next/app';" } else { "" },
            )
            .replace("__APP_PROPS_TYPE__", if ts { ": AppProps" } else { "" });
        ctx.out.write(&format!("pages/_app{}", ext), &app)?;

        let landing = self.landing_page(ctx, true);
        ctx.out.write(&format!("pages/index{}", ext), &landing)?;

        let pages: Vec<(String, String)> = ctx
            .components
            .iter()
            .map(|info| {
                (
                    format!("pages/{}{}", route_slug(info), ext),
                    self.component_page(info, "../components", true),
                )
            })
            .collect();
        for (path, page) in pages {
            ctx.out.write(&path, &page)?;
        }

        ctx.out.write("styles/globals.css", &self.globals_css(&ctx.options))?;
        Ok(())
    }

    fn globals_css(&self, options: &ResolvedOptions) -> String {
        let mut css = String::new();
        if options.tailwind {
            css.push_str(TAILWIND_DIRECTIVES);
        }
        css.push_str(BASE_CSS);
        css
    }

    fn package_manifest(&self, ctx: &ExportContext<'_>) -> PackageManifest {
        let options = &ctx.options;
        let mut pkg = PackageManifest::new(&options.name, &options.version);
        pkg.private = Some(true);
        pkg.script("dev", "next dev")
            .script("build", "next build")
            .script("start", "next start")
            .script("test", "vitest run --passWithNoTests");
        if options.eslint {
            pkg.script("lint", "next lint");
        }

        let mut dependencies = pinned(&[
            ("next", options.next_version.as_str()),
            ("react", REACT_VERSION),
            ("react-dom", REACT_VERSION),
        ]);
        manifest::merge_discovered(&mut dependencies, &ctx.dependencies);
        pkg.dependencies = dependencies;

        let mut dev = pinned(&[("vitest", "^0.34.1")]);
        if options.typescript {
            dev.extend(pinned(&[
                ("typescript", "^5.1.6"),
                ("@types/node", "^20.4.5"),
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
                ("eslint-config-next", options.next_version.as_str()),
            ]));
        }
        pkg.dev_dependencies = dev;
        pkg
    }

    fn readme(&self, ctx: &ExportContext<'_>) -> String {
        let router = match ctx.options.router {
            RouterKind::App => "App Router",
            RouterKind::Pages => "Pages Router",
        };
        format!(
            r#"# {name}

A gallery of React components built with Next.js ({router}).

## Included Components

{components}

## Getting Started

1. Install dependencies:
   ```
   npm install
   ```

2. Start the development server:
   ```
   npm run dev
   ```

3. Open [http://localhost:3000](http://localhost:3000) to view the application.

## Available Scripts

- `npm run dev` - Runs the app in development mode
- `npm run build` - Builds the app for production
- `npm start` - Runs the built app in production mode
- `npm test` - Runs the test suite
- `npm run lint` - Lints the codebase
"#,
            name = ctx.options.name,
            router = router,
            components = component_bullets(&ctx.components)
        )
    }
}

impl Generator for NextAppGenerator {
    fn target(&self) -> Target {
        Target::NextApp
    }

    fn directories(&self, options: &ResolvedOptions) -> Vec<&'static str> {
        match options.router {
            RouterKind::App => vec!["app", "components", "public"],
            RouterKind::Pages => vec!["pages", "components", "public", "styles"],
        }
    }

    fn components_dir(&self, _options: &ResolvedOptions) -> &'static str {
        "components"
    }

    fn prepare_component(&self, content: String, options: &ResolvedOptions) -> String {
        if options.router != RouterKind::App {
            return content;
        }
        let first = content.trim_start();
        if first.starts_with("'use client'") || first.starts_with("\"use client\"") {
            return content;
        }
        format!("{}\n\n{}", USE_CLIENT, content)
    }

    fn write_aggregates(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let routes_dir = match ctx.options.router {
            RouterKind::App => "app",
            RouterKind::Pages => "pages",
        };
        self.check_slugs(ctx, routes_dir)?;

        let index = barrel(&ctx.components, ".");
        let script_ext = ctx.options.script_ext();
        ctx.out.write(&format!("components/index{}", script_ext), &index)?;

        ctx.progress.info("Creating routes...");
        match ctx.options.router {
            RouterKind::App => self.write_app_router(ctx),
            RouterKind::Pages => self.write_pages_router(ctx),
        }
    }

    fn write_configuration(&self, ctx: &mut ExportContext<'_>) -> Result<()> {
        let pkg = self.package_manifest(ctx);
        ctx.out.write_json("package.json", &pkg)?;
        ctx.out.write("next.config.js", NEXT_CONFIG)?;

        if ctx.options.typescript {
            let app_router = ctx.options.router == RouterKind::App;
            let tsconfig = TSCONFIG
                .replace(
                    "__PLUGINS__",
                    if app_router { "\n    \"plugins\": [{ \"name\": \"next\" }]," } else { "" },
                )
                .replace("__NEXT_TYPES__", if app_router { ", \".next/types/**/*.ts\"" } else { "" });
            ctx.out.write("tsconfig.json", &tsconfig)?;
            ctx.out.write("next-env.d.ts", NEXT_ENV)?;
        } else {
            ctx.out.write("jsconfig.json", JSCONFIG)?;
        }

        if ctx.options.tailwind {
            ctx.out.write("tailwind.config.js", TAILWIND_CONFIG)?;
            ctx.out.write("postcss.config.js", POSTCSS_CONFIG)?;
        }
        if ctx.options.eslint {
            ctx.out.write(".eslintrc.json", ESLINTRC)?;
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
    use crate::error::ExportStep;
    use crate::progress::Recorder;
    use crate::scaffold::test_support::snapshot;
    use crate::scaffold::{export, ExportOptions};
    use std::fs;

    fn read_json(path: std::path::PathBuf) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_next_app_router_export() {
        let dir = tempfile::tempdir().unwrap();
        let components = vec![
            ComponentRecord::with_content("/src/UserCard.tsx", "import { Users } from 'lucide-react';\nexport default function UserCard() { return <Users />; }"),
            ComponentRecord::with_content("/src/Chart.tsx", "'use client';\nexport default function Chart() { return null; }"),
        ];

        let root = export(&NextAppGenerator, &components, dir.path(), &ExportOptions::default(), &Recorder::new()).unwrap();

        let card = fs::read_to_string(root.join("components/userCard.tsx")).unwrap();
        assert!(card.starts_with("'use client';\n\nimport { Users }"));
        let chart = fs::read_to_string(root.join("components/chart.tsx")).unwrap();
        assert_eq!(chart.matches("use client").count(), 1);

        let index = fs::read_to_string(root.join("components/index.ts")).unwrap();
        assert!(index.contains("export { default as userCard } from './userCard';"));

        let page = fs::read_to_string(root.join("app/user-card/page.tsx")).unwrap();
        assert!(page.contains("import UserCard from '@/components/userCard';"));
        assert!(page.contains("<UserCard />"));

        let landing = fs::read_to_string(root.join("app/page.tsx")).unwrap();
        assert!(landing.contains("href=\"/user-card\""));
        assert!(landing.contains("href=\"/chart\""));

        assert!(root.join("app/layout.tsx").exists());
        assert!(root.join("app/globals.css").exists());
        assert!(root.join("next-env.d.ts").exists());
        let tsconfig = fs::read_to_string(root.join("tsconfig.json")).unwrap();
        assert!(tsconfig.contains("\"@/*\": [\"./*\"]"));

        let pkg = read_json(root.join("package.json"));
        assert_eq!(pkg["dependencies"]["next"], "13.4.12");
        assert_eq!(pkg["dependencies"]["lucide-react"], "latest");
        assert_eq!(pkg["scripts"]["dev"], "next dev");
        assert!(pkg["scripts"].get("start").is_some());
        assert!(pkg["scripts"].get("build").is_some());
        assert!(pkg["scripts"].get("test").is_some());
    }

    #[test]
    fn test_next_pages_router_javascript_export() {
        let dir = tempfile::tempdir().unwrap();
        let components = vec![ComponentRecord::with_content("/src/Banner.jsx", "export default () => <p>hi</p>;")];
        let options = ExportOptions {
            router: Some(RouterKind::Pages),
            typescript: Some(false),
            tailwind: Some(false),
            next_version: Some("14.0.0".to_string()),
            ..Default::default()
        };

        let root = export(&NextAppGenerator, &components, dir.path(), &options, &Recorder::new()).unwrap();

        let banner = fs::read_to_string(root.join("components/banner.jsx")).unwrap();
        assert!(!banner.contains("use client"));
        assert!(root.join("pages/_app.jsx").exists());
        assert!(root.join("pages/index.jsx").exists());
        let page = fs::read_to_string(root.join("pages/banner.jsx")).unwrap();
        assert!(page.contains("import Banner from '../components/banner';"));
        assert!(root.join("styles/globals.css").exists());
        assert!(root.join("jsconfig.json").exists());
        assert!(!root.join("tsconfig.json").exists());
        assert!(!root.join("tailwind.config.js").exists());
        assert!(!root.join("app").exists());

        let pkg = read_json(root.join("package.json"));
        assert_eq!(pkg["dependencies"]["next"], "14.0.0");
        assert_eq!(pkg["devDependencies"]["eslint-config-next"], "14.0.0");
    }

    #[test]
    fn test_next_reserved_route_is_a_collision() {
        let dir = tempfile::tempdir().unwrap();
        let components = vec![ComponentRecord::with_content("/src/Api.tsx", "export default () => null;")];
        let recorder = Recorder::new();

        let err = export(&NextAppGenerator, &components, dir.path(), &ExportOptions::default(), &recorder).unwrap_err();

        assert!(matches!(
            err,
            ForgeError::Export {
                step: ExportStep::WriteAggregates,
                ..
            }
        ));
        assert!(matches!(err.root(), ForgeError::NameCollision { .. }));
        assert!(recorder.messages().last().unwrap().starts_with("Error: "));
    }

    #[test]
    fn test_next_export_is_deterministic_for_both_routers() {
        let components = vec![
            ComponentRecord::with_content("/src/UserCard.tsx", "import clsx from 'clsx';\nexport default function UserCard() { return null; }"),
            ComponentRecord::with_content("/src/Chart.tsx", "import UserCard from './UserCard';\nexport default () => <UserCard />;"),
        ];

        for router in [RouterKind::App, RouterKind::Pages] {
            let options = ExportOptions {
                router: Some(router),
                ..Default::default()
            };
            let first = tempfile::tempdir().unwrap();
            let second = tempfile::tempdir().unwrap();

            export(&NextAppGenerator, &components, first.path(), &options, &Recorder::new()).unwrap();
            export(&NextAppGenerator, &components, second.path(), &options, &Recorder::new()).unwrap();

            let a = snapshot(first.path());
            assert!(a.contains_key("package.json"), "{router:?}");
            assert_eq!(a, snapshot(second.path()), "{router:?}");
        }
    }
}
