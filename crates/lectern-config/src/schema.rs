//! Site configuration schema.
//!
//! One schema covers both the minimal and the extended form of a site: the
//! social-preview `head` tags, `search` and `footer` are optional, everything
//! else is required.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The site configuration consumed by the generator.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, used in `<title>` and the nav bar
    pub title: String,

    /// Default page description
    pub description: String,

    /// Extra elements for every page's `<head>`, rendered in order
    #[serde(default)]
    pub head: Vec<MetaTag>,

    /// Directory holding the markdown pages, relative to the project root
    pub src_dir: PathBuf,

    /// URL path prefix the site is deployed under (e.g. `/repo/`)
    #[serde(default = "default_base")]
    pub base: String,

    /// Color scheme
    #[serde(default)]
    pub appearance: Appearance,

    /// Navigation chrome and theme data
    pub theme_config: ThemeConfig,
}

fn default_base() -> String {
    "/".to_string()
}

/// A single element rendered into the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    /// Element name (`meta`, `link`, `script`, ...)
    pub tag: String,

    /// Element attributes
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

/// Color scheme of the rendered site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Appearance {
    /// Follow the reader's system preference, with a toggle
    #[default]
    Auto,
    /// Light by default, with a toggle
    Light,
    /// Dark by default, with a toggle
    Dark,
    /// Always dark, no toggle
    ForceDark,
}

impl Appearance {
    /// Whether pages start out in dark mode.
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark | Self::ForceDark)
    }

    /// Whether readers may switch the color scheme.
    pub fn allows_toggle(self) -> bool {
        self != Self::ForceDark
    }
}

/// Theme data: logo, navigation, sidebar, social links and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Logo image, relative to the project root
    pub logo: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,

    /// Top navigation bar
    #[serde(default)]
    pub nav: Vec<NavItem>,

    /// Sidebar sections
    #[serde(default)]
    pub sidebar: Vec<SidebarGroup>,

    #[serde(default)]
    pub social_links: Vec<SocialLink>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterConfig>,

    /// "Edit this page" link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<EditLink>,

    /// Heading above the per-page outline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_title: Option<String>,
}

/// A leaf navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,
    pub link: String,
}

impl NavItem {
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }
}

/// A sidebar section heading with its child links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarGroup {
    pub text: String,

    pub items: Vec<NavItem>,

    /// Render the section collapsed
    #[serde(default)]
    pub collapsed: bool,
}

/// Link to a social platform profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub icon: SocialIcon,
    pub link: String,
}

/// Supported social platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialIcon {
    Github,
    Gitlab,
    X,
    Twitter,
    Discord,
    Mastodon,
    Linkedin,
    Youtube,
    Npm,
    Slack,
    Facebook,
    Instagram,
}

impl SocialIcon {
    /// Identifier as written in the config (`github`).
    pub fn id(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::X => "x",
            Self::Twitter => "twitter",
            Self::Discord => "discord",
            Self::Mastodon => "mastodon",
            Self::Linkedin => "linkedin",
            Self::Youtube => "youtube",
            Self::Npm => "npm",
            Self::Slack => "slack",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
        }
    }

    /// Human readable platform name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Gitlab => "GitLab",
            Self::X => "X",
            Self::Twitter => "Twitter",
            Self::Discord => "Discord",
            Self::Mastodon => "Mastodon",
            Self::Linkedin => "LinkedIn",
            Self::Youtube => "YouTube",
            Self::Npm => "npm",
            Self::Slack => "Slack",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
        }
    }
}

/// Site footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterConfig {
    /// Footer text; inline HTML is rendered as-is
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// Client-side search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub provider: SearchProvider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Index built at generation time and searched in the browser
    #[default]
    Local,
}

/// "Edit this page" link pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLink {
    /// URL containing a `:path` placeholder for the page source path
    pub pattern: String,

    #[serde(default = "default_edit_text")]
    pub text: String,
}

fn default_edit_text() -> String {
    "Edit this page".to_string()
}

impl EditLink {
    /// Placeholder replaced by the page path relative to `src_dir`.
    pub const PLACEHOLDER: &'static str = ":path";

    /// Build the edit URL for a page.
    pub fn url_for(&self, relative_path: &str) -> String {
        self.pattern.replace(Self::PLACEHOLDER, relative_path)
    }
}

impl SiteConfig {
    /// All sidebar entries in reading order.
    pub fn sidebar_items(&self) -> impl Iterator<Item = &NavItem> {
        self.theme_config
            .sidebar
            .iter()
            .flat_map(|group| group.items.iter())
    }
}
