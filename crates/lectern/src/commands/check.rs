//! Validate the configuration without building.

use std::path::Path;

use anyhow::{Context, Result};
use lectern_config::{project_root, ProjectConfig};

/// Run the check command.
pub fn run(config_path: &Path) -> Result<()> {
    let project = ProjectConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let diag = project.validate(&project_root(config_path));

    for item in diag.warnings() {
        tracing::warn!("{}", item);
    }
    for item in diag.errors() {
        tracing::error!("{}", item);
    }

    if diag.has_errors() {
        anyhow::bail!(
            "{} has {} error(s)",
            config_path.display(),
            diag.errors().count()
        );
    }

    tracing::info!("{} is valid", config_path.display());
    Ok(())
}
