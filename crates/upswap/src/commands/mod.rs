//! CLI command implementations

pub mod check;
pub mod install;
pub mod update;
pub mod version;

use anyhow::{Context, Result};
use upswap_core::{HierarchicalConfigLoader, UpdaterConfig};
use upswap_update::{BarProgress, UpdateManager};

use crate::cli::SourceArgs;

/// Load configuration and apply command-line overrides
pub fn load_config(source: &SourceArgs) -> Result<UpdaterConfig> {
    let loader = HierarchicalConfigLoader::new().context("Failed to locate config directory")?;
    let mut config = loader
        .load()
        .with_context(|| format!("Failed to load config from {}", loader.config_dir()))?;
    source.apply(&mut config);
    Ok(config)
}

/// Build the update manager, with a progress bar unless disabled
pub fn build_manager(config: &UpdaterConfig, progress: bool) -> Result<UpdateManager> {
    let manager = UpdateManager::from_config(config).with_context(|| {
        format!(
            "Failed to set up updater for {}/{}",
            config.source.owner, config.source.repo
        )
    })?;

    if progress {
        Ok(manager.with_progress(BarProgress::new(format!(
            "Downloading {}",
            config.command_name()
        ))))
    } else {
        Ok(manager)
    }
}
