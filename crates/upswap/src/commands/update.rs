//! Update command

use anyhow::{anyhow, Result};
use upswap_update::UpdateOutcome;

use crate::cli::{SourceArgs, UpdateArgs};
use crate::output;

pub async fn run(args: UpdateArgs, source: &SourceArgs, quiet: bool) -> Result<()> {
    let config = super::load_config(source)?;
    let manager = super::build_manager(&config, !(args.no_progress || quiet))?;
    let current = source.current_version();

    match manager.check_and_update(&current).await {
        UpdateOutcome::Updated(version) => {
            output::success(&format!(
                "Updated {} from {} to {}",
                config.command_name(),
                current,
                version
            ));
            Ok(())
        }
        UpdateOutcome::AlreadyLatest(version) => {
            output::success(&format!("Already on the latest version ({})", version));
            Ok(())
        }
        UpdateOutcome::Failed(e) => Err(anyhow!(e).context("Update failed")),
    }
}
