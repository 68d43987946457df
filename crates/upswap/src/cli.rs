//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use upswap_core::{ProviderKind, UpdaterConfig};

/// upswap - update a binary in place from its published releases
#[derive(Parser, Debug)]
#[command(name = "upswap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// List releases newer than the installed version
    Check,

    /// Install the newest release if one is available
    Update(UpdateArgs),

    /// Install a specific release
    Install(InstallArgs),
}

/// Which binary to update and where it is published.
///
/// Each flag overrides the configuration file and environment.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Release host (github, gitee)
    #[arg(long, global = true)]
    pub provider: Option<ProviderKind>,

    /// Repository owner
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Executable name inside release archives [default: repository name]
    #[arg(long, global = true)]
    pub command_name: Option<String>,

    /// Installed version to compare releases against [default: this build's version]
    #[arg(long, global = true)]
    pub current_version: Option<String>,
}

impl SourceArgs {
    /// Apply the flags that were given on top of loaded configuration
    pub fn apply(&self, config: &mut UpdaterConfig) {
        if let Some(provider) = self.provider {
            config.source.provider = provider;
        }
        if let Some(owner) = &self.owner {
            config.source.owner = owner.clone();
        }
        if let Some(repo) = &self.repo {
            config.source.repo = repo.clone();
        }
        if let Some(name) = &self.command_name {
            config.install.command_name = Some(name.clone());
        }
    }

    pub fn current_version(&self) -> String {
        self.current_version
            .clone()
            .unwrap_or_else(|| upswap_update::VERSION.to_string())
    }
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Do not draw a download progress bar
    #[arg(long)]
    pub no_progress: bool,
}

// Install command
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Release version or tag (e.g. 2.8.8 or v2.8.8)
    #[arg(id = "release_version", value_name = "VERSION")]
    pub version: String,

    /// Do not draw a download progress bar
    #[arg(long)]
    pub no_progress: bool,
}
