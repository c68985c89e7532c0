//! Theme selection from the project configuration.

use std::path::Path;
use std::sync::Arc;

use lectern_config::ThemeOverride;

use crate::default::DefaultTheme;
use crate::extended::ExtendedTheme;
use crate::traits::{Theme, ThemeError};

/// Pick the theme for a project.
///
/// Without an override the default theme is used. An override whose layout
/// is missing or does not compile is an error; there is no fallback to the
/// default layout.
pub fn resolve_theme(
    theme: Option<&ThemeOverride>,
    root: &Path,
) -> Result<Arc<dyn Theme>, ThemeError> {
    let base = DefaultTheme::new();

    let Some(theme) = theme else {
        tracing::debug!("Using default theme");
        return Ok(Arc::new(base));
    };

    let extended = ExtendedTheme::from_file(Box::new(base), &root.join(&theme.layout))?;
    tracing::info!("Using layout override {}", theme.layout.display());
    Ok(Arc::new(extended))
}
