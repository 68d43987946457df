//! Gitee releases backend
//!
//! Gitee authenticates through an `access_token` query parameter, and
//! projects published there name macOS assets "macOS" rather than "darwin".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use upswap_core::types::{HostConfig, NetworkConfig};

use super::{api_client, fetch_json, ReleaseProvider};
use crate::error::Result;
use crate::releases::{Asset, Release};

#[derive(Debug, Deserialize)]
struct GiteeRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<GiteeAsset>,
}

/// Gitee omits sizes and counts, and source archives may come without a name
#[derive(Debug, Deserialize)]
struct GiteeAsset {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    browser_download_url: String,
    #[serde(default)]
    download_count: Option<u64>,
}

impl GiteeRelease {
    fn into_release(self, url: String) -> Release {
        let assets = self
            .assets
            .into_iter()
            .filter_map(|a| {
                let name = a.name?;
                Some(Asset::new(
                    name,
                    a.size.unwrap_or(0),
                    a.browser_download_url,
                    a.download_count.unwrap_or(0),
                ))
            })
            .collect();
        Release::new(
            self.tag_name,
            self.body.unwrap_or_default(),
            url,
            self.created_at,
            assets,
        )
    }
}

/// Release provider for gitee.com
pub struct GiteeProvider {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    per_page: u32,
}

impl GiteeProvider {
    pub fn new(host: &HostConfig, network: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: api_client(network)?,
            api_url: host.api_url.trim_end_matches('/').to_string(),
            token: host.token(),
            per_page: host.per_page,
        })
    }

    fn release_url(&self, owner: &str, repo: &str, tag: &str) -> String {
        format!("{}/repos/{}/{}/releases/tags/{}", self.api_url, owner, repo, tag)
    }

    /// GET with the access token, if any, as an encoded query parameter
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        debug!("GET {}", url);
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.query(&[("access_token", token)]),
            None => request,
        }
    }
}

#[async_trait]
impl ReleaseProvider for GiteeProvider {
    fn name(&self) -> &'static str {
        "gitee"
    }

    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, owner, repo);
        let request = self
            .get(&url)
            .query(&[("page", 1), ("per_page", self.per_page)])
            .query(&[("direction", "desc")]);

        let releases: Vec<GiteeRelease> = fetch_json(request, "listing releases", None).await?;

        Ok(releases
            .into_iter()
            .map(|r| {
                let url = self.release_url(owner, repo, &r.tag_name);
                r.into_release(url)
            })
            .collect())
    }

    async fn fetch_release(&self, owner: &str, repo: &str, tag: &str) -> Result<Release> {
        let url = self.release_url(owner, repo, tag);
        let release: GiteeRelease =
            fetch_json(self.get(&url), "fetching release", Some(tag)).await?;
        Ok(release.into_release(url))
    }

    fn os_token(&self, os: &str) -> String {
        match os {
            "darwin" => "macOS".to_string(),
            other => other.to_string(),
        }
    }
}
