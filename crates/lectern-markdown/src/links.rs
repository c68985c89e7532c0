//! Link rewriting under the deployment base path.
//!
//! | Link | Result (base `/docs/`, clean URLs) |
//! |------|------------------------------------|
//! | `https://swift.org` | unchanged |
//! | `#maps` | unchanged |
//! | `/arrays` | `/docs/arrays` |
//! | `/arrays.md#map` | `/docs/arrays#map` |
//! | `./objects.md` | `./objects` |
//! | `/og.png` | `/docs/og.png` |

use std::sync::LazyLock;

use regex::Regex;

use lectern_config::link::split_fragment;
use lectern_config::LinkKind;

/// Trailing `.md` (or `/index.md`) on a link path.
static MD_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(^|/)index)?\.md$").expect("Invalid markdown suffix regex")
});

/// How internal links are written in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Deployment base path, starting and ending with `/`
    pub base: String,

    /// Omit the `.html` suffix on page links
    pub clean_urls: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
            clean_urls: true,
        }
    }
}

impl LinkOptions {
    pub fn new(base: impl Into<String>, clean_urls: bool) -> Self {
        Self {
            base: base.into(),
            clean_urls,
        }
    }

    /// Public URL of a page route (`/`, `/arrays`, `/guide/`).
    pub fn page_url(&self, route: &str) -> String {
        let route = route.trim_start_matches('/');
        let suffix = if route.is_empty() || route.ends_with('/') || self.clean_urls {
            ""
        } else {
            ".html"
        };
        format!("{}{}{}", self.base, route, suffix)
    }

    /// Public URL of a site-root asset path.
    pub fn asset_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Rewrite a link found in page content.
    pub fn rewrite(&self, link: &str) -> String {
        match LinkKind::parse(link) {
            LinkKind::External(_) | LinkKind::Fragment(_) => link.to_string(),
            LinkKind::SiteRoot(_) => {
                if self.is_prefixed(link) {
                    return link.to_string();
                }
                let (path, fragment) = split_fragment(link);
                let url = if is_page_path(path) {
                    self.page_url(&self.page_route(path))
                } else {
                    self.asset_url(path)
                };
                with_fragment(url, fragment)
            }
            LinkKind::FileRelative(_) => {
                let (path, fragment) = split_fragment(link);
                if !MD_SUFFIX.is_match(path) {
                    return link.to_string();
                }
                let is_index = path == "index.md" || path.ends_with("/index.md");
                let replacement = match (is_index, self.clean_urls) {
                    (true, true) => "${1}",
                    (true, false) => "${1}index.html",
                    (false, true) => "",
                    (false, false) => ".html",
                };
                let url = MD_SUFFIX.replace(path, replacement).to_string();
                let url = if url.is_empty() { "./".to_string() } else { url };
                with_fragment(url, fragment)
            }
        }
    }

    /// Whether a site-root link already starts with the base path.
    fn is_prefixed(&self, link: &str) -> bool {
        if self.base == "/" {
            return false;
        }
        let (path, _) = split_fragment(link);
        path == self.base.trim_end_matches('/') || link.starts_with(&self.base)
    }

    fn page_route(&self, path: &str) -> String {
        let route = MD_SUFFIX.replace(path, "${1}").to_string();
        let route = route.strip_suffix(".html").unwrap_or(&route);
        lectern_config::normalize_route(route)
    }
}

/// Paths without an extension, or ending in `.md`/`.html`, point at pages.
fn is_page_path(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or("");
    !last.contains('.') || last.ends_with(".md") || last.ends_with(".html")
}

fn with_fragment(url: String, fragment: Option<&str>) -> String {
    match fragment {
        Some(frag) => format!("{}#{}", url, frag),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(clean_urls: bool) -> LinkOptions {
        LinkOptions::new("/SwiftVsTypeScript/", clean_urls)
    }

    #[test]
    fn builds_page_urls() {
        let opts = docs(true);
        assert_eq!(opts.page_url("/"), "/SwiftVsTypeScript/");
        assert_eq!(opts.page_url("/arrays"), "/SwiftVsTypeScript/arrays");
        assert_eq!(opts.page_url("/guide/"), "/SwiftVsTypeScript/guide/");

        let opts = docs(false);
        assert_eq!(opts.page_url("/"), "/SwiftVsTypeScript/");
        assert_eq!(opts.page_url("/arrays"), "/SwiftVsTypeScript/arrays.html");
    }

    #[test]
    fn keeps_external_and_fragment_links() {
        let opts = docs(true);
        assert_eq!(opts.rewrite("https://swift.org"), "https://swift.org");
        assert_eq!(opts.rewrite("#maps"), "#maps");
    }

    #[test]
    fn prefixes_site_root_links() {
        let opts = docs(true);
        assert_eq!(opts.rewrite("/arrays"), "/SwiftVsTypeScript/arrays");
        assert_eq!(opts.rewrite("/arrays.md#map"), "/SwiftVsTypeScript/arrays#map");
        assert_eq!(opts.rewrite("/index.md"), "/SwiftVsTypeScript/");
        assert_eq!(opts.rewrite("/og.png"), "/SwiftVsTypeScript/og.png");
        assert_eq!(
            opts.rewrite("/SwiftVsTypeScript/objects"),
            "/SwiftVsTypeScript/objects"
        );
        assert_eq!(opts.rewrite("/SwiftVsTypeScript"), "/SwiftVsTypeScript");
        assert_eq!(opts.rewrite("/SwiftVsTypeScript#top"), "/SwiftVsTypeScript#top");

        let opts = docs(false);
        assert_eq!(opts.rewrite("/objects"), "/SwiftVsTypeScript/objects.html");
    }

    #[test]
    fn rewrites_relative_markdown_links() {
        let opts = docs(true);
        assert_eq!(opts.rewrite("./objects.md"), "./objects");
        assert_eq!(opts.rewrite("objects.md#maps"), "objects#maps");
        assert_eq!(opts.rewrite("./guide/index.md"), "./guide/");
        assert_eq!(opts.rewrite("index.md"), "./");
        assert_eq!(opts.rewrite("./diagram.svg"), "./diagram.svg");

        let opts = docs(false);
        assert_eq!(opts.rewrite("./objects.md"), "./objects.html");
        assert_eq!(opts.rewrite("./guide/index.md"), "./guide/index.html");
    }

    #[test]
    fn root_base_leaves_paths_alone() {
        let opts = LinkOptions::default();
        assert_eq!(opts.rewrite("/arrays"), "/arrays");
        assert_eq!(opts.page_url("/"), "/");
    }
}
