//! Trait definitions for themes.

use std::path::PathBuf;

use serde::Serialize;

use crate::context::PageContext;

/// Pre-rendered page fragments handed to the layout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Slots {
    /// Inner HTML of `<head>`
    pub head: String,
    /// Top navigation bar
    pub nav: String,
    /// Sidebar sections
    pub sidebar: String,
    /// Site footer (empty when no footer is configured)
    pub footer: String,
}

/// Errors that can occur while loading or rendering a theme.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Layout template not found: {0}")]
    LayoutNotFound(PathBuf),

    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid layout template {0}: {1}")]
    InvalidLayout(PathBuf, #[source] minijinja::Error),

    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),
}

/// A set of presentation capabilities for rendering pages.
///
/// Each slot renders independently from the same [`PageContext`];
/// [`Theme::render_page`] composes them and hands them to
/// [`Theme::render_layout`].
pub trait Theme: Send + Sync {
    /// Theme identifier (e.g., "default")
    fn name(&self) -> &str;

    fn render_head(&self, page: &PageContext) -> Result<String, ThemeError>;

    fn render_nav(&self, page: &PageContext) -> Result<String, ThemeError>;

    fn render_sidebar(&self, page: &PageContext) -> Result<String, ThemeError>;

    fn render_footer(&self, page: &PageContext) -> Result<String, ThemeError>;

    /// Wrap the rendered slots and page content into a full document.
    fn render_layout(&self, page: &PageContext, slots: &Slots) -> Result<String, ThemeError>;

    /// Source of the layout template, for layouts that extend it.
    fn layout_template(&self) -> &str;

    /// Base stylesheet written to `assets/style.css`.
    fn stylesheet(&self) -> &str;

    /// Render a complete page.
    fn render_page(&self, page: &PageContext) -> Result<String, ThemeError> {
        let slots = Slots {
            head: self.render_head(page)?,
            nav: self.render_nav(page)?,
            sidebar: self.render_sidebar(page)?,
            footer: self.render_footer(page)?,
        };
        self.render_layout(page, &slots)
    }
}

/// Context handed to layout templates: the page plus its rendered slots.
#[derive(Serialize)]
pub(crate) struct LayoutContext<'a> {
    #[serde(flatten)]
    pub page: &'a PageContext,
    pub slots: &'a Slots,
}
