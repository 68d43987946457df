//! Builder patterns for test data construction
//!
//! `ReleaseBuilder` builds domain releases directly; `ReleaseJsonBuilder`
//! builds the JSON a release host would return.

use serde_json::{json, Value};
use upswap_update::{Asset, Release};

use super::constants::*;

/// Builder for constructing Release objects with sensible test defaults
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    tag: String,
    notes: String,
    assets: Vec<Asset>,
}

impl ReleaseBuilder {
    pub fn new() -> Self {
        Self {
            tag: TAG_V2_0_0.to_string(),
            notes: String::new(),
            assets: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    /// Add an asset by file name
    pub fn asset(mut self, name: &str) -> Self {
        self.assets.push(Asset::new(
            name,
            1024,
            format!("https://example.com/download/{}", name),
            0,
        ));
        self
    }

    /// Add tar.gz and zip assets for the common desktop platforms
    pub fn with_standard_assets(mut self) -> Self {
        let version = self.tag.trim_start_matches('v').to_string();
        for (os, arch) in [
            (OS_LINUX, ARCH_AMD64),
            (OS_LINUX, ARCH_ARM64),
            (OS_DARWIN, ARCH_AMD64),
            (OS_DARWIN, ARCH_ARM64),
            (OS_WINDOWS, ARCH_AMD64),
        ] {
            self = self
                .asset(&asset_name(&version, os, arch, "tar.gz"))
                .asset(&asset_name(&version, os, arch, "zip"));
        }
        self.asset("checksums.txt")
    }

    pub fn build(self) -> Release {
        Release::new(self.tag, self.notes, "", None, self.assets)
    }
}

impl Default for ReleaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for host API release payloads.
///
/// Produces the fields both GitHub and Gitee share, plus the ones each
/// backend reads.
#[derive(Debug, Clone)]
pub struct ReleaseJsonBuilder {
    tag: String,
    body: Option<String>,
    assets: Vec<Value>,
}

impl ReleaseJsonBuilder {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            body: None,
            assets: Vec::new(),
        }
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Add an asset downloadable from `url`
    pub fn asset(mut self, name: &str, url: &str, size: u64) -> Self {
        self.assets.push(json!({
            "name": name,
            "size": size,
            "browser_download_url": url,
            "download_count": 3,
        }));
        self
    }

    pub fn build(self) -> Value {
        json!({
            "tag_name": self.tag,
            "name": self.tag,
            "body": self.body,
            "html_url": format!("https://github.com/{}/{}/releases/tag/{}", OWNER, REPO, self.tag),
            "published_at": "2024-03-01T10:00:00Z",
            "created_at": "2024-03-01T18:00:00+08:00",
            "prerelease": false,
            "draft": false,
            "assets": self.assets,
        })
    }
}

/// Bare releases (no assets) for the given tags, in order
pub fn release_list_json(tags: &[&str]) -> Value {
    Value::Array(
        tags.iter()
            .map(|t| ReleaseJsonBuilder::new(t).build())
            .collect(),
    )
}
