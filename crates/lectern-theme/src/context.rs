//! Data handed to theme templates for a single page.

use std::path::Path;

use serde::Serialize;

use lectern_config::{
    normalize_route, page_route, Appearance, FooterConfig, MetaTag, NavItem, SiteConfig,
};
use lectern_markdown::{LinkOptions, PageLayout, ParsedDoc, TocEntry};

/// Elements that never have a closing tag.
const VOID_TAGS: &[&str] = &["meta", "link", "base"];

/// Deepest heading level listed in the outline.
const OUTLINE_DEPTH: u8 = 3;

/// Everything a theme needs to render one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub site_title: String,
    /// Deployment base path (`/SwiftVsTypeScript/`)
    pub base: String,
    pub appearance: Appearance,
    /// Start in dark mode
    pub dark: bool,
    /// Show the color scheme toggle
    pub appearance_toggle: bool,
    /// Logo URL
    pub logo: Option<String>,
    /// Search index URL, when search is enabled
    pub search_index: Option<String>,

    /// Document title (`Arrays | Swift vs TypeScript`)
    pub title: String,
    pub description: String,
    /// Extra head elements, in configured order
    pub head: Vec<HeadTag>,

    pub layout: PageLayout,
    /// Route of this page (`/arrays`)
    pub route: String,
    /// Rendered page body
    pub content: String,
    /// Outline entries (levels 2 and 3)
    pub toc: Vec<TocEntry>,
    pub outline_title: String,
    pub show_sidebar: bool,
    pub show_outline: bool,

    pub nav: Vec<PageLink>,
    pub sidebar: Vec<SidebarSection>,
    pub social_links: Vec<SocialItem>,
    pub footer: Option<FooterConfig>,
    pub edit_link: Option<PageLink>,
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,

    /// Stylesheet URLs
    pub styles: Vec<String>,
    /// Script URLs
    pub scripts: Vec<String>,
    /// Inline live-reload client, set by the dev server
    pub live_reload: Option<String>,
}

/// A rendered head element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadTag {
    pub tag: String,
    pub attrs: Vec<Attr>,
    /// Written without a closing tag
    pub void: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl From<&MetaTag> for HeadTag {
    fn from(tag: &MetaTag) -> Self {
        let name = tag.tag.to_lowercase();
        Self {
            void: VOID_TAGS.contains(&name.as_str()),
            tag: name,
            attrs: tag
                .attrs
                .iter()
                .map(|(name, value)| Attr {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

/// A link as shown in navigation chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub text: String,
    pub url: String,
    /// Points at the page being rendered
    pub active: bool,
}

/// A sidebar section with resolved links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarSection {
    pub text: String,
    pub collapsed: bool,
    pub items: Vec<PageLink>,
}

/// A social link with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialItem {
    /// Icon identifier (`github`)
    pub icon: String,
    pub label: String,
    pub url: String,
}

/// Output path of the logo, relative to the output root.
pub fn logo_asset(site: &SiteConfig) -> Option<String> {
    let name = site.theme_config.logo.file_name()?.to_string_lossy();
    Some(format!("assets/{}", name))
}

impl PageContext {
    /// Build the context for a page at `source_path` (relative to `src_dir`).
    pub fn new(
        site: &SiteConfig,
        links: &LinkOptions,
        doc: &ParsedDoc,
        source_path: &Path,
    ) -> Self {
        let route = page_route(source_path);
        let theme = &site.theme_config;
        let frontmatter = doc.frontmatter.clone().unwrap_or_default();

        let title = match doc.page_title() {
            Some(t) if t != site.title => format!("{} | {}", t, site.title),
            _ => site.title.clone(),
        };

        let link = |item: &NavItem| PageLink {
            text: item.text.clone(),
            url: links.rewrite(&item.link),
            active: normalize_route(&item.link) == route,
        };

        let sidebar: Vec<SidebarSection> = theme
            .sidebar
            .iter()
            .map(|group| {
                let items: Vec<PageLink> = group.items.iter().map(link).collect();
                SidebarSection {
                    text: group.text.clone(),
                    collapsed: group.collapsed && !items.iter().any(|i| i.active),
                    items,
                }
            })
            .collect();

        let reading_order: Vec<PageLink> = site.sidebar_items().map(link).collect();
        let position = reading_order.iter().position(|l| l.active);
        let prev = position
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| reading_order.get(i))
            .cloned();
        let next = position.and_then(|i| reading_order.get(i + 1)).cloned();

        let is_doc = frontmatter.layout == PageLayout::Doc;
        let edit_link = theme
            .edit_link
            .as_ref()
            .filter(|_| is_doc && frontmatter.edit_link)
            .map(|edit| PageLink {
                text: edit.text.clone(),
                url: edit.url_for(&source_path.to_string_lossy().replace('\\', "/")),
                active: false,
            });

        let nav: Vec<PageLink> = theme.nav.iter().map(link).collect();

        Self {
            site_title: site.title.clone(),
            base: links.base.clone(),
            appearance: site.appearance,
            dark: site.appearance.is_dark(),
            appearance_toggle: site.appearance.allows_toggle(),
            logo: logo_asset(site).map(|path| links.asset_url(&path)),
            search_index: theme
                .search
                .map(|_| links.asset_url("search-index.json")),

            title,
            description: frontmatter
                .description
                .clone()
                .unwrap_or_else(|| site.description.clone()),
            head: site.head.iter().map(HeadTag::from).collect(),

            layout: frontmatter.layout,
            route,
            content: doc.html.clone(),
            toc: doc
                .toc
                .iter()
                .filter(|e| e.level > 1 && e.level <= OUTLINE_DEPTH)
                .cloned()
                .collect(),
            outline_title: theme
                .outline_title
                .clone()
                .unwrap_or_else(|| "On this page".to_string()),
            show_sidebar: is_doc && frontmatter.sidebar && !sidebar.is_empty(),
            show_outline: is_doc && frontmatter.outline,

            nav,
            sidebar,
            social_links: theme
                .social_links
                .iter()
                .map(|s| SocialItem {
                    icon: s.icon.id().to_string(),
                    label: s.icon.label().to_string(),
                    url: s.link.clone(),
                })
                .collect(),
            footer: theme.footer.clone(),
            edit_link,
            prev: if is_doc { prev } else { None },
            next: if is_doc { next } else { None },

            styles: vec![links.asset_url("assets/style.css")],
            scripts: vec![links.asset_url("assets/app.js")],
            live_reload: None,
        }
    }

    /// Append stylesheets after the theme's own.
    pub fn with_styles(mut self, urls: impl IntoIterator<Item = String>) -> Self {
        self.styles.extend(urls);
        self
    }

    pub fn with_live_reload(mut self, script: impl Into<String>) -> Self {
        self.live_reload = Some(script.into());
        self
    }
}
