//! Preview server command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lectern_config::{project_root, ProjectConfig};
use lectern_server::{PreviewConfig, PreviewServer};

/// Run the preview command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let project = ProjectConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let dir = dir.unwrap_or_else(|| project_root(config_path).join(&project.build.out_dir));

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'lectern build' first.",
            dir.display()
        );
    }

    let config = PreviewConfig {
        dir,
        base: project.site.base,
        port,
        open,
        ..Default::default()
    };

    PreviewServer::new(config).start().await?;

    Ok(())
}
