//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use lectern_config::{page_route, ConfigError, ProjectConfig, SiteConfig};
use lectern_markdown::{parse_page, LinkOptions, ParseError, ParsedDoc};
use lectern_theme::{logo_asset, resolve_theme, PageContext, Theme, ThemeError};

use crate::assets::AssetPipeline;
use crate::search::{render_index, SearchEntry};
use crate::sitemap::{render_robots, render_sitemap};

/// Directory under `src_dir` copied verbatim to the output root.
pub const PUBLIC_DIR: &str = "public";

const NOT_FOUND_PAGE: &str = r#"---
title: Page not found
layout: page
---

# Page not found

The page you are looking for does not exist.

[Take me home](/)
"#;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding `lectern.toml`; config paths are relative to it
    pub root: PathBuf,

    /// The loaded project file
    pub project: ProjectConfig,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Live-reload client injected into every page
    pub live_reload: Option<String>,
}

impl BuildConfig {
    /// Build settings taken from the project file.
    pub fn from_project(project: ProjectConfig, root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            output_dir: root.join(&project.build.out_dir),
            minify: project.build.minify,
            live_reload: None,
            project,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of files copied from the public directory
    pub public_files: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: ThemeError,
    },

    #[error("Failed to write {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Refusing to clear output directory {0}: it contains the project")]
    UnsafeOutputDir(PathBuf),

    #[error("Failed to build search index: {0}")]
    SearchIndex(#[from] serde_json::Error),
}

/// A page to be built.
#[derive(Debug)]
struct PageInfo {
    /// Path relative to `src_dir`
    relative_path: PathBuf,

    /// Output path
    output_path: PathBuf,

    /// Public URL
    url: String,

    /// Parsed document
    doc: ParsedDoc,
}

impl PageInfo {
    fn title<'a>(&'a self, site: &'a SiteConfig) -> &'a str {
        self.doc.page_title().unwrap_or(&site.title)
    }
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    site: Arc<SiteConfig>,
    theme: Arc<dyn Theme>,
    links: LinkOptions,
}

impl StaticBuilder {
    /// Validate the project and resolve its theme.
    ///
    /// Fails on configuration errors (missing `src_dir`, logo or layout,
    /// malformed links) and on a layout override that does not compile.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let project = config.project.clone().validated(&config.root)?;
        let theme = resolve_theme(project.theme.as_ref(), &config.root)?;
        let links = LinkOptions::new(project.site.base.clone(), project.build.clean_urls);

        Ok(Self {
            site: Arc::new(project.site),
            theme,
            links,
            config,
        })
    }

    fn src_dir(&self) -> PathBuf {
        self.config.root.join(&self.site.src_dir)
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let output_dir = &self.config.output_dir;

        self.clean_output()?;
        fs::create_dir_all(output_dir).map_err(|e| BuildError::Write(output_dir.clone(), e))?;

        let pages = self.discover_pages()?;
        tracing::debug!("Found {} pages", pages.len());

        let styles = self.generate_assets()?;

        pages
            .par_iter()
            .map(|page| self.build_page(page, &styles))
            .collect::<Result<Vec<()>, BuildError>>()?;

        self.generate_not_found(&styles)?;
        let public_files = self.copy_public()?;

        if self.site.theme_config.search.is_some() {
            self.generate_search_index(&pages)?;
        }
        self.generate_sitemap(&pages)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            public_files,
            duration_ms: duration.as_millis() as u64,
            output_dir: output_dir.clone(),
        })
    }

    /// Remove everything a previous build wrote, so deleted pages disappear.
    fn clean_output(&self) -> Result<(), BuildError> {
        let output_dir = &self.config.output_dir;
        if !output_dir.exists() {
            return Ok(());
        }

        let canonical = |path: &Path| path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let output = canonical(output_dir);
        if canonical(&self.config.root).starts_with(&output)
            || canonical(&self.src_dir()).starts_with(&output)
        {
            return Err(BuildError::UnsafeOutputDir(output_dir.clone()));
        }

        fs::remove_dir_all(output_dir).map_err(|e| BuildError::Write(output_dir.clone(), e))?;
        tracing::debug!("Cleaned {}", output_dir.display());
        Ok(())
    }

    /// Discover and parse all markdown pages under `src_dir`.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let src_dir = self.src_dir();
        if !src_dir.is_dir() {
            return Err(BuildError::SourceNotFound(src_dir));
        }
        let public_dir = src_dir.join(PUBLIC_DIR);

        let mut pages = Vec::new();

        for entry in WalkDir::new(&src_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.path() != public_dir)
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            let content =
                fs::read_to_string(path).map_err(|e| BuildError::Read(path.to_path_buf(), e))?;

            let doc = parse_page(&content, &self.links).map_err(|source| BuildError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

            let relative_path = path.strip_prefix(&src_dir).unwrap_or(path).to_path_buf();

            pages.push(PageInfo {
                output_path: self.output_path(&relative_path),
                url: self.links.page_url(&page_route(&relative_path)),
                relative_path,
                doc,
            });
        }

        pages.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(pages)
    }

    /// `arrays.md` -> `arrays.html`, `guide/index.md` -> `guide/index.html`.
    fn output_path(&self, relative: &Path) -> PathBuf {
        self.config.output_dir.join(relative.with_extension("html"))
    }

    fn page_context(&self, doc: &ParsedDoc, relative: &Path, styles: &[String]) -> PageContext {
        let ctx = PageContext::new(&self.site, &self.links, doc, relative)
            .with_styles(styles.iter().cloned());

        match &self.config.live_reload {
            Some(script) => ctx.with_live_reload(script.clone()),
            None => ctx,
        }
    }

    /// Render and write a single page.
    fn build_page(&self, page: &PageInfo, styles: &[String]) -> Result<(), BuildError> {
        let ctx = self.page_context(&page.doc, &page.relative_path, styles);

        let html = self.theme.render_page(&ctx).map_err(|source| BuildError::Render {
            path: page.relative_path.clone(),
            source,
        })?;

        write_file(&page.output_path, html)?;
        tracing::debug!("Wrote {}", page.output_path.display());

        Ok(())
    }

    fn generate_not_found(&self, styles: &[String]) -> Result<(), BuildError> {
        let relative = Path::new("404.md");
        let doc = parse_page(NOT_FOUND_PAGE, &self.links).map_err(|source| BuildError::Parse {
            path: relative.to_path_buf(),
            source,
        })?;

        let ctx = self.page_context(&doc, relative, styles);
        let html = self.theme.render_page(&ctx).map_err(|source| BuildError::Render {
            path: relative.to_path_buf(),
            source,
        })?;

        write_file(&self.config.output_dir.join("404.html"), html)
    }

    /// Write theme assets, the logo and override stylesheets.
    ///
    /// Returns the URLs of the extra stylesheets to link from every page.
    fn generate_assets(&self) -> Result<Vec<String>, BuildError> {
        let output_dir = &self.config.output_dir;
        let assets_dir = output_dir.join("assets");

        let css = AssetPipeline::process_css(self.theme.stylesheet(), self.config.minify, "style.css");
        write_file(&assets_dir.join("style.css"), css)?;
        write_file(&assets_dir.join("app.js"), AssetPipeline::generate_js())?;

        if let Some(logo) = logo_asset(&self.site) {
            let source = self.config.root.join(&self.site.theme_config.logo);
            let target = output_dir.join(logo);
            fs::copy(&source, &target).map_err(|e| BuildError::Read(source.clone(), e))?;
        }

        let mut styles = Vec::new();
        let overrides = self
            .config
            .project
            .theme
            .as_ref()
            .map(|t| t.styles.as_slice())
            .unwrap_or_default();

        // Numbered under assets/theme/ so overrides never replace style.css or each other
        for (i, style) in overrides.iter().enumerate() {
            let source = self.config.root.join(style);
            let name = style
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "custom.css".to_string());
            let relative = format!("theme/{}-{}", i, name);

            let css = fs::read_to_string(&source).map_err(|e| BuildError::Read(source.clone(), e))?;
            let css = AssetPipeline::process_css(&css, self.config.minify, &name);
            write_file(&assets_dir.join(&relative), css)?;
            tracing::info!("Copied stylesheet from {}", style.display());

            styles.push(self.links.asset_url(&format!("assets/{}", relative)));
        }

        Ok(styles)
    }

    fn copy_public(&self) -> Result<usize, BuildError> {
        let public_dir = self.src_dir().join(PUBLIC_DIR);
        if !public_dir.is_dir() {
            return Ok(0);
        }

        let count = AssetPipeline::copy_dir(&public_dir, &self.config.output_dir)
            .map_err(|e| BuildError::Write(self.config.output_dir.clone(), e))?;
        tracing::debug!("Copied {} public files", count);

        Ok(count)
    }

    fn generate_search_index(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let entries: Vec<SearchEntry> = pages
            .iter()
            .map(|page| SearchEntry::new(&page.doc, page.title(&self.site), page.url.clone()))
            .collect();

        write_file(
            &self.config.output_dir.join("search-index.json"),
            render_index(&entries)?,
        )
    }

    /// Write `sitemap.xml` and `robots.txt`.
    ///
    /// URLs are absolute when `build.site_url` is set, base-relative otherwise.
    fn generate_sitemap(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let prefix = match &self.config.project.build.site_url {
            Some(site_url) => format!("{}/", site_url.trim_end_matches('/')),
            None => self.links.base.clone(),
        };
        let absolute = LinkOptions::new(prefix, self.links.clean_urls);

        let urls: Vec<String> = pages
            .iter()
            .map(|page| absolute.page_url(&page_route(&page.relative_path)))
            .collect();

        write_file(&self.config.output_dir.join("sitemap.xml"), render_sitemap(&urls))?;
        write_file(
            &self.config.output_dir.join("robots.txt"),
            render_robots(&absolute.asset_url("sitemap.xml")),
        )
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::Write(parent.to_path_buf(), e))?;
    }
    fs::write(path, contents).map_err(|e| BuildError::Write(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_config::CONFIG_FILE;
    use tempfile::{tempdir, TempDir};

    const CONFIG: &str = r#"
[site]
title = "Swift vs TypeScript"
description = "Swift and TypeScript compared side by side"
src_dir = "./pages"
base = "/SwiftVsTypeScript/"
appearance = "dark"

[[site.head]]
tag = "meta"
attrs = { property = "og:title", content = "Swift vs TypeScript" }

[[site.head]]
tag = "meta"
attrs = { property = "og:image", content = "https://example.github.io/SwiftVsTypeScript/og.png" }

[[site.head]]
tag = "meta"
attrs = { name = "twitter:card", content = "summary_large_image" }

[site.theme_config]
logo = "logo.svg"

[site.theme_config.search]
provider = "local"

[[site.theme_config.nav]]
text = "Home"
link = "/"

[[site.theme_config.sidebar]]
text = "Cheatsheet"

[[site.theme_config.sidebar.items]]
text = "Arrays"
link = "/arrays"

[[site.theme_config.sidebar.items]]
text = "Objects"
link = "/objects"

[[site.theme_config.social_links]]
icon = "github"
link = "https://github.com/example/SwiftVsTypeScript"

[theme]
layout = "theme/layout.html"
styles = ["theme/custom.css"]

[build]
minify = false
site_url = "https://example.github.io/SwiftVsTypeScript/"
"#;

    const LAYOUT: &str = r#"{% extends "default/layout.html" %}
{% block nav %}<div class="banner">Cheatsheet</div>{{ super() }}{% endblock %}
"#;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn project(config: &str) -> TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();

        write(root, CONFIG_FILE, config);
        write(root, "logo.svg", "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>");
        write(root, "theme/layout.html", LAYOUT);
        write(root, "theme/custom.css", ".banner { color: orange; }\n");
        write(
            root,
            "pages/index.md",
            "---\nlayout: home\n---\n# Swift vs TypeScript\n\nStart with [arrays](./arrays.md).\n",
        );
        write(
            root,
            "pages/arrays.md",
            "# Arrays\n\n## Appending\n\n```swift\nxs.append(4)\n```\n\nSee [objects](/objects).\n",
        );
        write(root, "pages/objects.md", "# Objects\n\nBack to [arrays](/arrays#appending).\n");
        write(root, "pages/public/CNAME", "example.github.io");

        temp
    }

    fn builder(root: &Path) -> StaticBuilder {
        let config = ProjectConfig::load(&root.join(CONFIG_FILE)).unwrap();
        StaticBuilder::new(BuildConfig::from_project(config, root)).unwrap()
    }

    fn read(root: &Path, relative: &str) -> String {
        fs::read_to_string(root.join("dist").join(relative)).unwrap()
    }

    #[tokio::test]
    async fn builds_site_under_base() {
        let temp = project(CONFIG);
        let root = temp.path();

        let result = builder(root).build().await.unwrap();

        assert_eq!(result.pages, 3);
        assert_eq!(result.public_files, 1);
        for page in ["index.html", "arrays.html", "objects.html", "404.html"] {
            assert!(root.join("dist").join(page).is_file(), "missing {}", page);
        }

        for page in ["index.html", "arrays.html", "objects.html"] {
            let html = read(root, page);
            assert!(html.contains("<meta content=\"Swift vs TypeScript\" property=\"og:title\">"));
            assert!(html.contains(
                "<meta content=\"https://example.github.io/SwiftVsTypeScript/og.png\" property=\"og:image\">"
            ));
            assert!(html.contains("<meta content=\"summary_large_image\" name=\"twitter:card\">"));
        }
    }

    #[tokio::test]
    async fn links_carry_base_path() {
        let temp = project(CONFIG);
        let root = temp.path();

        builder(root).build().await.unwrap();

        let arrays = read(root, "arrays.html");
        assert!(arrays.contains("href=\"/SwiftVsTypeScript/\">Home</a>"));
        assert!(arrays.contains(
            "<a class=\"sidebar-link active\" href=\"/SwiftVsTypeScript/arrays\">Arrays</a>"
        ));
        assert!(arrays.contains("<a href=\"/SwiftVsTypeScript/objects\">objects</a>"));
        assert!(arrays.contains("href=\"/SwiftVsTypeScript/assets/style.css\""));

        let objects = read(root, "objects.html");
        assert!(objects.contains("<a href=\"/SwiftVsTypeScript/arrays#appending\">arrays</a>"));

        let index = read(root, "index.html");
        assert!(index.contains("<a href=\"./arrays\">arrays</a>"));
    }

    #[tokio::test]
    async fn applies_layout_override_and_styles() {
        let temp = project(CONFIG);
        let root = temp.path();

        builder(root).build().await.unwrap();

        let arrays = read(root, "arrays.html");
        assert!(arrays.contains("<div class=\"banner\">Cheatsheet</div>"));
        assert!(arrays.contains(
            "<link rel=\"stylesheet\" href=\"/SwiftVsTypeScript/assets/theme/0-custom.css\">"
        ));
        assert_eq!(read(root, "assets/theme/0-custom.css"), ".banner { color: orange; }\n");
        assert!(root.join("dist/assets/logo.svg").is_file());
        assert!(root.join("dist/assets/app.js").is_file());
        assert_eq!(read(root, "CNAME"), "example.github.io");
    }

    #[tokio::test]
    async fn override_styles_keep_default_stylesheet() {
        let temp = project(&CONFIG.replace(
            "styles = [\"theme/custom.css\"]",
            "styles = [\"theme/style.css\", \"extra/style.css\"]",
        ));
        let root = temp.path();
        write(root, "theme/style.css", ".banner { color: red; }\n");
        write(root, "extra/style.css", ".banner { color: blue; }\n");

        builder(root).build().await.unwrap();

        assert!(read(root, "assets/style.css").contains(".navbar"));
        assert_eq!(read(root, "assets/theme/0-style.css"), ".banner { color: red; }\n");
        assert_eq!(read(root, "assets/theme/1-style.css"), ".banner { color: blue; }\n");
        let arrays = read(root, "arrays.html");
        assert!(arrays.contains("href=\"/SwiftVsTypeScript/assets/style.css\""));
        assert!(arrays.contains("href=\"/SwiftVsTypeScript/assets/theme/1-style.css\""));
    }

    #[tokio::test]
    async fn rebuild_drops_removed_pages() {
        let temp = project(CONFIG);
        let root = temp.path();
        builder(root).build().await.unwrap();
        assert!(root.join("dist/objects.html").is_file());

        fs::remove_file(root.join("pages/objects.md")).unwrap();
        let result = builder(root).build().await.unwrap();

        assert_eq!(result.pages, 2);
        assert!(!root.join("dist/objects.html").exists());
        assert!(!read(root, "sitemap.xml").contains("objects"));
    }

    #[tokio::test]
    async fn refuses_to_clear_project_directory() {
        let temp = project(CONFIG);
        let root = temp.path();
        let config = ProjectConfig::load(&root.join(CONFIG_FILE)).unwrap();
        let mut build = BuildConfig::from_project(config, root);
        build.output_dir = root.to_path_buf();

        let result = StaticBuilder::new(build).unwrap().build().await;

        assert!(matches!(result, Err(BuildError::UnsafeOutputDir(_))));
        assert!(root.join("pages/arrays.md").is_file());
    }

    #[tokio::test]
    async fn writes_search_index_and_sitemap() {
        let temp = project(CONFIG);
        let root = temp.path();

        builder(root).build().await.unwrap();

        let index: serde_json::Value = serde_json::from_str(&read(root, "search-index.json")).unwrap();
        let entries = index.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["title"], "Arrays");
        assert_eq!(entries[0]["url"], "/SwiftVsTypeScript/arrays");
        assert_eq!(entries[0]["headings"][0], "Appending");

        let sitemap = read(root, "sitemap.xml");
        assert!(sitemap.contains("<loc>https://example.github.io/SwiftVsTypeScript/</loc>"));
        assert!(sitemap.contains("<loc>https://example.github.io/SwiftVsTypeScript/objects</loc>"));
        assert!(read(root, "robots.txt")
            .contains("Sitemap: https://example.github.io/SwiftVsTypeScript/sitemap.xml"));
    }

    #[tokio::test]
    async fn html_suffix_without_clean_urls() {
        let temp = project(&CONFIG.replace("minify = false", "minify = false\nclean_urls = false"));
        let root = temp.path();

        builder(root).build().await.unwrap();

        let arrays = read(root, "arrays.html");
        assert!(arrays.contains("href=\"/SwiftVsTypeScript/objects.html\""));
        assert!(arrays.contains("href=\"/SwiftVsTypeScript/\">Home</a>"));
    }

    #[tokio::test]
    async fn injects_live_reload_script() {
        let temp = project(CONFIG);
        let root = temp.path();
        let config = ProjectConfig::load(&root.join(CONFIG_FILE)).unwrap();
        let mut build = BuildConfig::from_project(config, root);
        build.live_reload = Some("reconnect()".to_string());

        StaticBuilder::new(build).unwrap().build().await.unwrap();

        assert!(read(root, "objects.html").contains("<script>reconnect()</script>"));
    }

    #[test]
    fn missing_logo_is_fatal() {
        let temp = project(CONFIG);
        let root = temp.path();
        fs::remove_file(root.join("logo.svg")).unwrap();

        let config = ProjectConfig::load(&root.join(CONFIG_FILE)).unwrap();
        let result = StaticBuilder::new(BuildConfig::from_project(config, root));

        match result {
            Err(BuildError::InvalidConfig(ConfigError::Invalid(diag))) => {
                assert!(diag.errors().any(|d| d.field == "site.theme_config.logo"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected missing logo to fail"),
        }
    }

    #[test]
    fn missing_layout_is_fatal() {
        let temp = project(CONFIG);
        let root = temp.path();
        fs::remove_file(root.join("theme/layout.html")).unwrap();

        let config = ProjectConfig::load(&root.join(CONFIG_FILE)).unwrap();
        let result = StaticBuilder::new(BuildConfig::from_project(config, root));

        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }

    #[test]
    fn broken_layout_is_fatal() {
        let temp = project(CONFIG);
        let root = temp.path();
        write(root, "theme/layout.html", "{% block nav %}");

        let config = ProjectConfig::load(&root.join(CONFIG_FILE)).unwrap();
        let result = StaticBuilder::new(BuildConfig::from_project(config, root));

        assert!(matches!(
            result,
            Err(BuildError::Theme(ThemeError::InvalidLayout(_, _)))
        ));
    }

    #[tokio::test]
    async fn reports_bad_frontmatter() {
        let temp = project(CONFIG);
        let root = temp.path();
        write(root, "pages/objects.md", "---\ntitle: [oops\n---\n# Objects\n");

        let result = builder(root).build().await;

        match result {
            Err(BuildError::Parse { path, .. }) => assert!(path.ends_with("objects.md")),
            other => panic!("expected parse error, got {:?}", other.map(|r| r.pages)),
        }
    }
}
