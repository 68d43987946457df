//! Build and platform facts the updater acts on
//!
//! `upswap version` answers what an update would look for: the asset
//! token for this machine, the archive kind, and how the binary gets
//! swapped, next to the release tag the binary was built from.

use serde::{Deserialize, Serialize};
use upswap_core::{ArchiveKind, Platform, SwapStrategy};
use upswap_update::releases::tag_matches;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VersionInfo {
    /// Version compared against release tags when checking for updates
    pub version: String,

    /// `git describe` output at build time (e.g. "v0.3.0-4-g1a2b3c4")
    pub build_tag: Option<String>,

    /// Rust target triple the binary was compiled for
    pub target: Option<String>,

    /// `<os>_<arch>` token searched for in asset names
    pub platform: String,

    /// Archive kind picked when no `install.archive` is configured
    pub archive: ArchiveKind,

    /// Swap strategy picked when no `install.swap-strategy` is configured
    pub swap_strategy: SwapStrategy,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: upswap_update::VERSION.to_string(),
            build_tag: option_env!("UPSWAP_BUILD_TAG").map(String::from),
            target: option_env!("UPSWAP_BUILD_TARGET").map(String::from),
            platform: Platform::current().asset_token(),
            archive: ArchiveKind::for_current_platform(),
            swap_strategy: SwapStrategy::for_current_platform(),
        }
    }

    /// Whether the binary was built exactly at this version's release tag
    pub fn is_release_build(&self) -> bool {
        self.build_tag
            .as_deref()
            .is_some_and(|tag| tag_matches(tag, &self.version))
    }

    /// One-line summary, e.g. "upswap 0.3.0 linux_amd64" with the build
    /// tag appended for builds between releases
    pub fn display(&self) -> String {
        let mut line = format!("upswap {} {}", self.version, self.platform);
        if let Some(tag) = self.build_tag.as_deref().filter(|_| !self.is_release_build()) {
            line.push_str(&format!(" ({})", tag));
        }
        line
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
