//! Check command

use anyhow::{Context, Result};

use crate::cli::SourceArgs;
use crate::output;

pub async fn run(source: &SourceArgs) -> Result<()> {
    let config = super::load_config(source)?;
    let manager = super::build_manager(&config, false)?;
    let current = source.current_version();

    output::info(&format!(
        "Current version: {} ({}/{} on {})",
        current,
        config.source.owner,
        config.source.repo,
        manager.provider().name()
    ));

    let spinner = output::spinner("Checking for updates...");
    let releases = manager.newer_releases(&current).await;
    spinner.finish_and_clear();
    let releases = releases.context("Failed to list releases")?;

    let Some(latest) = releases.first() else {
        output::success("Already on the latest version");
        return Ok(());
    };

    output::header("Newer releases");
    for release in &releases {
        let date = release
            .published_at()
            .map(|d| format!(" - {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!("  {}{}", release.version(), date);
    }
    println!();

    match manager.asset_for(latest) {
        Ok(asset) => {
            output::kv("Platform", &manager.platform().to_string());
            output::kv("Asset", asset.name());
            output::info("Run 'upswap update' to install the latest release");
        }
        Err(e) => output::warning(&format!("{} cannot be installed: {}", latest.version(), e)),
    }

    Ok(())
}
