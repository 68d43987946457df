//! Update orchestration
//!
//! The manager runs one update flow per call, each stage awaited before the
//! next starts:
//! 1. Ask the provider for releases newer than the installed version
//! 2. Match the newest release's asset for this platform
//! 3. Download it
//! 4. Install it over the running executable
//! 5. Remove the downloaded file
//!
//! # Example
//!
//! ```no_run
//! use upswap_core::HierarchicalConfigLoader;
//! use upswap_update::{UpdateManager, UpdateOutcome};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HierarchicalConfigLoader::new()?.load()?;
//! let manager = UpdateManager::from_config(&config)?;
//!
//! match manager.check_and_update("2.8.8").await {
//!     UpdateOutcome::Updated(v) => println!("Updated to {}", v),
//!     UpdateOutcome::AlreadyLatest(v) => println!("{} is the latest version", v),
//!     UpdateOutcome::Failed(e) => eprintln!("Update failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};
use upswap_core::{ArchiveKind, Platform, UpdaterConfig};

use crate::download::{Downloader, NoProgress, ProgressWrap};
use crate::error::{Result, UpdateError};
use crate::install::{InstallTarget, Installer};
use crate::providers::{create_provider, ReleaseProvider};
use crate::releases::{Asset, Release};

/// Result of one update attempt
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Installed the release with this tag
    Updated(String),

    /// Nothing newer than this installed version was published
    AlreadyLatest(String),

    /// The attempt stopped at the contained error
    Failed(UpdateError),
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Version installed or already current; `None` on failure
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Updated(v) | Self::AlreadyLatest(v) => Some(v),
            Self::Failed(_) => None,
        }
    }

    /// Convert `Failed` into an `Err`
    pub fn into_result(self) -> Result<Self> {
        match self {
            Self::Failed(e) => Err(e),
            other => Ok(other),
        }
    }
}

impl From<Result<UpdateOutcome>> for UpdateOutcome {
    fn from(result: Result<UpdateOutcome>) -> Self {
        result.unwrap_or_else(UpdateOutcome::Failed)
    }
}

/// Checks for, downloads, and installs new releases of one binary
pub struct UpdateManager {
    /// Release host
    provider: Box<dyn ReleaseProvider>,

    owner: String,
    repo: String,

    /// Installer carrying the command name and swap strategy
    installer: Installer,

    /// Archive kind to look for among release assets
    archive_kind: ArchiveKind,

    /// Platform whose assets are installed
    platform: Platform,

    /// Install location; resolved from the running executable when unset
    target: Option<InstallTarget>,

    downloader: Downloader,

    progress: Box<dyn ProgressWrap>,
}

impl UpdateManager {
    /// Create a manager with the running platform's defaults
    pub fn new(
        provider: Box<dyn ReleaseProvider>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        installer: Installer,
        downloader: Downloader,
    ) -> Self {
        Self {
            provider,
            owner: owner.into(),
            repo: repo.into(),
            installer,
            archive_kind: ArchiveKind::for_current_platform(),
            platform: Platform::current(),
            target: None,
            downloader,
            progress: Box::new(NoProgress),
        }
    }

    /// Build a manager from loaded configuration
    pub fn from_config(config: &UpdaterConfig) -> Result<Self> {
        if config.source.owner.is_empty() || config.source.repo.is_empty() {
            return Err(upswap_core::Error::invalid_config(
                "source.owner and source.repo must be set",
            )
            .into());
        }

        let provider = create_provider(config)?;
        let installer =
            Installer::new(config.command_name()).with_strategy(config.swap_strategy());
        let downloader = Downloader::new(&config.network)?;

        debug!(
            "update manager for {}/{} on {} (command {}, {}, {:?})",
            config.source.owner,
            config.source.repo,
            provider.name(),
            installer.command_name(),
            config.archive_kind(),
            installer.strategy()
        );

        Ok(Self::new(
            provider,
            &config.source.owner,
            &config.source.repo,
            installer,
            downloader,
        )
        .with_archive_kind(config.archive_kind()))
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_archive_kind(mut self, kind: ArchiveKind) -> Self {
        self.archive_kind = kind;
        self
    }

    /// Install somewhere other than beside the running executable
    pub fn with_install_target(mut self, target: InstallTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Observe downloads with a progress wrapper
    pub fn with_progress(mut self, progress: impl ProgressWrap + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn provider(&self) -> &dyn ReleaseProvider {
        self.provider.as_ref()
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Releases strictly newer than `current`, newest first
    pub async fn newer_releases(&self, current: &str) -> Result<Vec<Release>> {
        self.provider
            .list_releases_newer_than(&self.owner, &self.repo, current)
            .await
    }

    /// Install the newest release if one is newer than `current`
    pub async fn check_and_update(&self, current: &str) -> UpdateOutcome {
        self.try_check_and_update(current).await.into()
    }

    async fn try_check_and_update(&self, current: &str) -> Result<UpdateOutcome> {
        info!(
            "Checking {}/{} for releases newer than {}",
            self.owner, self.repo, current
        );

        let releases = self.newer_releases(current).await?;
        let Some(latest) = releases.first() else {
            info!("Already on the latest version {}", current);
            return Ok(UpdateOutcome::AlreadyLatest(current.to_string()));
        };

        info!("Update available: {} -> {}", current, latest.version());
        self.install_release(latest).await?;
        Ok(UpdateOutcome::Updated(latest.version().to_string()))
    }

    /// Look up one release by version, with or without a leading "v"
    pub async fn fetch_specific_release(&self, version: &str) -> Result<Release> {
        self.provider
            .get_release_by_tag(&self.owner, &self.repo, version)
            .await
    }

    /// Install a specific release regardless of the installed version
    pub async fn update_to(&self, version: &str) -> UpdateOutcome {
        self.try_update_to(version).await.into()
    }

    async fn try_update_to(&self, version: &str) -> Result<UpdateOutcome> {
        info!("Fetching release {} of {}/{}", version, self.owner, self.repo);
        let release = self.fetch_specific_release(version).await?;
        self.install_release(&release).await?;
        Ok(UpdateOutcome::Updated(release.version().to_string()))
    }

    /// Asset of `release` for this manager's platform and archive kind
    pub fn asset_for<'a>(&self, release: &'a Release) -> Result<&'a Asset> {
        let host_platform = Platform::new(
            self.provider.os_token(&self.platform.os),
            self.platform.arch.clone(),
        );
        match release.find_asset(&host_platform, self.archive_kind) {
            Some(asset) => Ok(asset),
            None => Err(UpdateError::NoMatchingAsset {
                os: host_platform.os,
                arch: host_platform.arch,
                kind: self.archive_kind,
            }),
        }
    }

    async fn install_release(&self, release: &Release) -> Result<()> {
        let asset = self.asset_for(release)?;
        let target = match &self.target {
            Some(target) => target.clone(),
            None => InstallTarget::current()?,
        };

        info!("Downloading {} ({} bytes)", asset.name(), asset.size());
        let archive = self
            .downloader
            .download_asset(asset, self.progress.as_ref())
            .await?;

        info!(
            "Installing {} into {}",
            release.version(),
            target.dir().display()
        );
        let installed = self.installer.install(&archive, &target);
        remove_download(&archive);
        installed?;

        info!("Installed {} {}", self.installer.command_name(), release.version());
        Ok(())
    }
}

fn remove_download(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove download {}: {}", path.display(), e);
    }
}
