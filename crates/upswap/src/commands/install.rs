//! Install command

use anyhow::{anyhow, Result};
use upswap_update::UpdateOutcome;

use crate::cli::{InstallArgs, SourceArgs};
use crate::output;

pub async fn run(args: InstallArgs, source: &SourceArgs, quiet: bool) -> Result<()> {
    let config = super::load_config(source)?;
    let manager = super::build_manager(&config, !(args.no_progress || quiet))?;

    output::info(&format!(
        "Installing {} {}",
        config.command_name(),
        args.version
    ));

    match manager.update_to(&args.version).await {
        UpdateOutcome::Updated(version) | UpdateOutcome::AlreadyLatest(version) => {
            output::success(&format!("Installed {} {}", config.command_name(), version));
            Ok(())
        }
        UpdateOutcome::Failed(e) if e.is_not_found() => Err(anyhow!(
            "Release {} does not exist for {}/{}",
            args.version,
            config.source.owner,
            config.source.repo
        )),
        UpdateOutcome::Failed(e) => Err(anyhow!(e).context("Install failed")),
    }
}
