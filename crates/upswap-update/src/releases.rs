//! Release and asset records
//!
//! Providers build these from host API data; they are read-only afterwards.

use chrono::{DateTime, Utc};
use upswap_core::{ArchiveKind, Platform};

use crate::matcher;

/// A published version of the target software
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    version: String,
    notes: String,
    url: String,
    published_at: Option<DateTime<Utc>>,
    assets: Vec<Asset>,
}

impl Release {
    pub fn new(
        version: impl Into<String>,
        notes: impl Into<String>,
        url: impl Into<String>,
        published_at: Option<DateTime<Utc>>,
        assets: Vec<Asset>,
    ) -> Self {
        Self {
            version: version.into(),
            notes: notes.into(),
            url: url.into(),
            published_at,
            assets,
        }
    }

    /// Release tag as reported by the host (e.g. "v2.8.8")
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Markdown release notes
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Release notes URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Assets in host-reported order
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Find this release's asset for a platform and archive kind.
    ///
    /// `platform` must already use the host's naming; see
    /// [`ReleaseProvider::os_token`](crate::providers::ReleaseProvider::os_token).
    pub fn find_asset(&self, platform: &Platform, kind: ArchiveKind) -> Option<&Asset> {
        matcher::find_asset(&self.assets, &platform.os, &platform.arch, kind)
    }

    /// Whether this release's tag names the given installed version
    pub fn is_version(&self, version: &str) -> bool {
        tag_matches(&self.version, version)
    }
}

/// One downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    name: String,
    size: u64,
    url: String,
    downloads: u64,
}

impl Asset {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        url: impl Into<String>,
        downloads: u64,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            url: url.into(),
            downloads,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes as reported by the host (0 when unknown)
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Download URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn downloads(&self) -> u64 {
        self.downloads
    }
}

/// Compare a release tag against an installed version.
///
/// Matches exactly, or when exactly one side carries a leading "v".
pub fn tag_matches(tag: &str, version: &str) -> bool {
    tag == version
        || tag.strip_prefix('v') == Some(version)
        || version.strip_prefix('v') == Some(tag)
}

/// Keep the releases listed before the one tagged `current`.
///
/// Hosts list newest first, so this yields the releases strictly newer than
/// the installed one, newest first. The matching release is excluded. When
/// nothing matches, every release is kept.
pub fn releases_newer_than(releases: Vec<Release>, current: &str) -> Vec<Release> {
    releases
        .into_iter()
        .take_while(|r| !r.is_version(current))
        .collect()
}

/// Tag to request from a host for a version, preferring the "v" form
pub(crate) fn prefixed_tag(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str) -> Release {
        Release::new(tag, "", "", None, Vec::new())
    }

    fn tags(releases: &[Release]) -> Vec<&str> {
        releases.iter().map(|r| r.version()).collect()
    }

    #[test]
    fn test_tag_matches() {
        assert!(tag_matches("v1.9.0", "1.9.0"));
        assert!(tag_matches("1.9.0", "1.9.0"));
        assert!(tag_matches("v1.9.0", "v1.9.0"));
        assert!(tag_matches("1.9.0", "v1.9.0"));
        assert!(!tag_matches("v1.9.0", "1.9"));
        assert!(!tag_matches("vv1.9.0", "1.9.0"));
    }

    #[test]
    fn test_newer_releases_stop_at_current() {
        let releases = vec![release("v2.0.0"), release("v1.9.0"), release("v1.8.0")];
        let newer = releases_newer_than(releases, "1.9.0");
        assert_eq!(tags(&newer), vec!["v2.0.0"]);
    }

    #[test]
    fn test_newer_releases_with_prefixed_current() {
        let releases = vec![release("2.0.0"), release("1.9.0"), release("1.8.0")];
        let newer = releases_newer_than(releases, "v1.9.0");
        assert_eq!(tags(&newer), vec!["2.0.0"]);
    }

    #[test]
    fn test_current_is_newest() {
        let releases = vec![release("v1.9.0"), release("v1.8.0")];
        assert!(releases_newer_than(releases, "1.9.0").is_empty());
    }

    #[test]
    fn test_unknown_current_keeps_everything() {
        let releases = vec![release("v2.0.0"), release("v1.9.0")];
        let newer = releases_newer_than(releases, "0.0.1");
        assert_eq!(tags(&newer), vec!["v2.0.0", "v1.9.0"]);
    }

    #[test]
    fn test_prefixed_tag() {
        assert_eq!(prefixed_tag("0.4.5"), "v0.4.5");
        assert_eq!(prefixed_tag("v0.4.5"), "v0.4.5");
    }
}
