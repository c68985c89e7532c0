//! Link classification and page routes.
//!
//! A page route is the site-root path of a page without the base prefix and
//! without the `.html` suffix: `index.md` is `/`, `arrays.md` is `/arrays`,
//! `guide/index.md` is `/guide/`.

use std::path::{Path, PathBuf};

/// Syntactic classification of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Link with a URL scheme (`https://`, `mailto:`) or protocol-relative
    External(&'a str),
    /// Anchor on the current page, without the leading `#`
    Fragment(&'a str),
    /// Site-root path (`/arrays`)
    SiteRoot(&'a str),
    /// Path relative to the current file (`./objects.md`)
    FileRelative(&'a str),
}

impl<'a> LinkKind<'a> {
    pub fn parse(link: &'a str) -> Self {
        if is_external_link(link) {
            Self::External(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::FileRelative(link)
        }
    }
}

/// Check whether a link carries a URL scheme or is protocol-relative.
pub fn is_external_link(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }

    let Some(colon) = link.find(':') else {
        return false;
    };
    let scheme = &link[..colon];

    !scheme.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Split a link into its path and fragment, dropping any query string.
pub fn split_fragment(link: &str) -> (&str, Option<&str>) {
    let (rest, fragment) = match link.split_once('#') {
        Some((path, frag)) => (path, Some(frag)),
        None => (link, None),
    };
    let path = rest.split_once('?').map(|(p, _)| p).unwrap_or(rest);
    (path, fragment)
}

/// Route of a page from its path relative to the source directory.
pub fn page_route(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    let Some(last) = parts.pop() else {
        return "/".to_string();
    };
    let stem = last
        .strip_suffix(".md")
        .map(str::to_string)
        .unwrap_or(last);

    if stem == "index" {
        if parts.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", parts.join("/"))
        }
    } else {
        parts.push(stem);
        format!("/{}", parts.join("/"))
    }
}

/// Normalize a site-root link to a page route.
///
/// Drops the fragment, query, `.html`/`.md` suffix and trailing `index`.
pub fn normalize_route(link: &str) -> String {
    let (path, _) = split_fragment(link);
    let path = path
        .strip_suffix(".html")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path);

    let path = if path == "/index" || path.is_empty() {
        "/"
    } else if let Some(dir) = path.strip_suffix("/index") {
        return format!("{}/", dir);
    } else {
        path
    };

    path.to_string()
}

/// Resolve a site-root link to the markdown file it points at.
///
/// Returns `None` when no page exists for the link.
pub fn resolve_page(src_dir: &Path, link: &str) -> Option<PathBuf> {
    let route = normalize_route(link);
    let relative = route.trim_start_matches('/');

    let candidates = if relative.is_empty() {
        vec![src_dir.join("index.md")]
    } else if let Some(dir) = relative.strip_suffix('/') {
        vec![src_dir.join(dir).join("index.md")]
    } else {
        vec![
            src_dir.join(format!("{}.md", relative)),
            src_dir.join(relative).join("index.md"),
        ]
    };

    candidates.into_iter().find(|p| p.is_file())
}
