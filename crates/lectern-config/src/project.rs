//! The project file (`lectern.toml`): site, theme override and build settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::schema::SiteConfig;

/// Default project file name.
pub const CONFIG_FILE: &str = "lectern.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration:\n{0}")]
    Invalid(Diagnostics),
}

/// Contents of `lectern.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// The site configuration
    pub site: SiteConfig,

    /// Replacement for the default layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeOverride>,

    #[serde(default)]
    pub build: BuildSettings,
}

/// Substitutes the default layout with a custom template.
///
/// Everything other than the layout keeps the default theme's behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOverride {
    /// Layout template, relative to the project root
    pub layout: PathBuf,

    /// Extra stylesheets, relative to the project root
    #[serde(default)]
    pub styles: Vec<PathBuf>,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Output directory, relative to the project root
    pub out_dir: PathBuf,

    /// Minify generated CSS
    pub minify: bool,

    /// Link to pages without the `.html` suffix
    pub clean_urls: bool,

    /// Treat links to missing pages as errors
    pub strict_links: bool,

    /// Public URL of the deployed site, used for the sitemap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dist"),
            minify: true,
            clean_urls: true,
            strict_links: false,
            site_url: None,
        }
    }
}

impl ProjectConfig {
    /// Read and parse a project file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Validate the whole project against the filesystem under `root`.
    pub fn validate(&self, root: &Path) -> Diagnostics {
        let mut diag = self.site.validate(root);

        if let Some(theme) = &self.theme {
            theme.validate(root, &mut diag);
        }

        self.build.validate(&self.site, &mut diag);

        if self.build.strict_links {
            diag.escalate_warnings();
        }

        diag
    }

    /// Validate and fail on errors, logging warnings.
    pub fn validated(self, root: &Path) -> Result<Self, ConfigError> {
        let diag = self.validate(root);
        diag.log_warnings();
        if diag.has_errors() {
            return Err(ConfigError::Invalid(diag));
        }
        Ok(self)
    }
}

impl ThemeOverride {
    pub fn validate(&self, root: &Path, diag: &mut Diagnostics) {
        if !root.join(&self.layout).is_file() {
            diag.error(
                "theme.layout",
                format!("layout template not found: {}", self.layout.display()),
            );
        }

        for (i, style) in self.styles.iter().enumerate() {
            if !root.join(style).is_file() {
                diag.error(
                    format!("theme.styles[{}]", i),
                    format!("stylesheet not found: {}", style.display()),
                );
            }
        }
    }
}

impl BuildSettings {
    fn validate(&self, site: &SiteConfig, diag: &mut Diagnostics) {
        let Some(site_url) = &self.site_url else {
            return;
        };

        match url::Url::parse(site_url) {
            Ok(url) => {
                let path = if url.path().ends_with('/') {
                    url.path().to_string()
                } else {
                    format!("{}/", url.path())
                };
                if path != site.base {
                    diag.error(
                        "build.site_url",
                        format!(
                            "deployment path '{}' does not match base '{}'",
                            path, site.base
                        ),
                    );
                }
            }
            Err(e) => diag.error("build.site_url", format!("invalid URL: {}", e)),
        }
    }
}

/// Directory that relative config paths are resolved against.
pub fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
