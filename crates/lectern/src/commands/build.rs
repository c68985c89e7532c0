//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lectern_config::{project_root, ProjectConfig};
use lectern_static::{BuildConfig, StaticBuilder};

/// Run the build command.
pub async fn run(config_path: &Path, out: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let project = ProjectConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let root = project_root(config_path);

    let mut config = BuildConfig::from_project(project, &root);
    if let Some(out) = out {
        config.output_dir = out;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = StaticBuilder::new(config)?.build().await?;

    tracing::info!(
        "Built {} pages and copied {} public files in {}ms",
        result.pages,
        result.public_files,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
