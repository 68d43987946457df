//! GitHub releases backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::debug;
use upswap_core::types::{HostConfig, NetworkConfig};

use super::{api_client, fetch_json, ReleaseProvider};
use crate::error::Result;
use crate::releases::{Asset, Release};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Release as returned by the GitHub REST API
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<GitHubAsset>,
}

#[derive(Debug, Deserialize)]
struct GitHubAsset {
    name: String,
    #[serde(default)]
    size: u64,
    browser_download_url: String,
    #[serde(default)]
    download_count: u64,
}

impl From<GitHubRelease> for Release {
    fn from(r: GitHubRelease) -> Self {
        let assets = r
            .assets
            .into_iter()
            .map(|a| Asset::new(a.name, a.size, a.browser_download_url, a.download_count))
            .collect();
        Release::new(
            r.tag_name,
            r.body.unwrap_or_default(),
            r.html_url,
            r.published_at,
            assets,
        )
    }
}

/// Release provider for GitHub and GitHub Enterprise
pub struct GitHubProvider {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    per_page: u32,
}

impl GitHubProvider {
    /// Create a provider; the token is read from `host.token_env` once here
    pub fn new(host: &HostConfig, network: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: api_client(network)?,
            api_url: host.api_url.trim_end_matches('/').to_string(),
            token: host.token(),
            per_page: host.per_page,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        debug!("GET {}", url);
        let request = self.client.get(url).header(ACCEPT, GITHUB_ACCEPT);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }
}

#[async_trait]
impl ReleaseProvider for GitHubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, owner, repo);
        let request = self.get(&url).query(&[("per_page", self.per_page)]);
        let releases: Vec<GitHubRelease> = fetch_json(request, "listing releases", None).await?;
        Ok(releases.into_iter().map(Release::from).collect())
    }

    async fn fetch_release(&self, owner: &str, repo: &str, tag: &str) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url, owner, repo, tag
        );
        let release: GitHubRelease =
            fetch_json(self.get(&url), "fetching release", Some(tag)).await?;
        Ok(release.into())
    }
}
