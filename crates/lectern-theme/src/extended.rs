//! A theme whose layout is replaced by a custom template.

use std::fs;
use std::path::Path;

use minijinja::Environment;

use crate::context::PageContext;
use crate::default::{new_environment, LAYOUT_TEMPLATE};
use crate::traits::{LayoutContext, Slots, Theme, ThemeError};

const CUSTOM_LAYOUT: &str = "layout.html";

/// Wraps a theme and substitutes its layout.
///
/// The custom layout may `{% extends "default/layout.html" %}` and override
/// any of its blocks (`head`, `nav`, `sidebar`, `content`, `doc_footer`,
/// `aside`, `footer`). Every other capability is delegated to the inner
/// theme.
pub struct ExtendedTheme {
    inner: Box<dyn Theme>,
    env: Environment<'static>,
    source: String,
}

impl ExtendedTheme {
    /// Wrap `inner` with a layout template given as source.
    pub fn new(
        inner: Box<dyn Theme>,
        layout: impl Into<String>,
        origin: &Path,
    ) -> Result<Self, ThemeError> {
        let source = layout.into();
        let mut env = new_environment();

        env.add_template_owned(LAYOUT_TEMPLATE, inner.layout_template().to_string())?;
        env.add_template_owned(CUSTOM_LAYOUT, source.clone())
            .map_err(|e| ThemeError::InvalidLayout(origin.to_path_buf(), e))?;

        Ok(Self { inner, env, source })
    }

    /// Wrap `inner` with the layout template at `path`.
    pub fn from_file(inner: Box<dyn Theme>, path: &Path) -> Result<Self, ThemeError> {
        if !path.is_file() {
            return Err(ThemeError::LayoutNotFound(path.to_path_buf()));
        }

        let source =
            fs::read_to_string(path).map_err(|e| ThemeError::Io(path.to_path_buf(), e))?;
        tracing::debug!("Loaded layout override from {}", path.display());

        Self::new(inner, source, path)
    }
}

impl Theme for ExtendedTheme {
    fn name(&self) -> &str {
        "custom"
    }

    fn render_head(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.inner.render_head(page)
    }

    fn render_nav(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.inner.render_nav(page)
    }

    fn render_sidebar(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.inner.render_sidebar(page)
    }

    fn render_footer(&self, page: &PageContext) -> Result<String, ThemeError> {
        self.inner.render_footer(page)
    }

    fn render_layout(&self, page: &PageContext, slots: &Slots) -> Result<String, ThemeError> {
        let tmpl = self.env.get_template(CUSTOM_LAYOUT)?;
        Ok(tmpl.render(LayoutContext { page, slots })?)
    }

    fn layout_template(&self) -> &str {
        &self.source
    }

    fn stylesheet(&self) -> &str {
        self.inner.stylesheet()
    }
}
