//! Site configuration for lectern.
//!
//! A documentation site is described by a single immutable [`SiteConfig`]:
//! metadata, social-preview head tags, the content directory, the deployment
//! base path, appearance and the theme data (logo, search, nav, sidebar,
//! social links, footer). The project file wraps it together with an optional
//! [`ThemeOverride`] and the [`BuildSettings`].

pub mod diagnostics;
pub mod link;
pub mod project;
pub mod schema;
pub mod validate;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use link::{is_external_link, normalize_route, page_route, resolve_page, LinkKind};
pub use project::{project_root, BuildSettings, ConfigError, ProjectConfig, ThemeOverride, CONFIG_FILE};
pub use schema::{
    Appearance, EditLink, FooterConfig, MetaTag, NavItem, SearchConfig, SearchProvider,
    SidebarGroup, SiteConfig, SocialIcon, SocialLink, ThemeConfig,
};
