//! Release host backends
//!
//! Each host implements [`ReleaseProvider`]. Hosts list releases newest
//! first; the version-stop rule and tag tolerance are shared default
//! methods so backends only translate API data.

mod gitee;
mod github;

pub use gitee::GiteeProvider;
pub use github::GitHubProvider;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use upswap_core::types::NetworkConfig;
use upswap_core::{ProviderKind, UpdaterConfig};

use crate::error::{Result, UpdateError};
use crate::releases::{prefixed_tag, releases_newer_than, Release};

/// A hosting backend that publishes releases
#[async_trait]
pub trait ReleaseProvider: Send + Sync {
    /// Host name for logs and messages
    fn name(&self) -> &'static str;

    /// All releases of `owner/repo`, newest first, as the host orders them
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>>;

    /// Release with exactly this tag; [`UpdateError::NotFound`] if absent
    async fn fetch_release(&self, owner: &str, repo: &str, tag: &str) -> Result<Release>;

    /// OS token this host's projects put in asset names
    fn os_token(&self, os: &str) -> String {
        os.to_string()
    }

    /// Releases strictly newer than `current`, newest first.
    ///
    /// Enumeration stops at the first release tagged `current`, with or
    /// without a leading "v".
    async fn list_releases_newer_than(
        &self,
        owner: &str,
        repo: &str,
        current: &str,
    ) -> Result<Vec<Release>> {
        let releases = self.list_releases(owner, repo).await?;
        let total = releases.len();
        let newer = releases_newer_than(releases, current);
        debug!(
            "{}: {} of {} releases newer than {}",
            self.name(),
            newer.len(),
            total,
            current
        );
        Ok(newer)
    }

    /// Release for a version given with or without a leading "v".
    ///
    /// Tries the "v"-prefixed tag first, then the bare one.
    async fn get_release_by_tag(&self, owner: &str, repo: &str, version: &str) -> Result<Release> {
        let prefixed = prefixed_tag(version);
        match self.fetch_release(owner, repo, &prefixed).await {
            Err(e) if e.is_not_found() => {
                let bare = version.strip_prefix('v').unwrap_or(version);
                debug!("{}: tag {} not found, trying {}", self.name(), prefixed, bare);
                self.fetch_release(owner, repo, bare).await
            }
            other => other,
        }
    }
}

/// Create the provider selected in the configuration
pub fn create_provider(config: &UpdaterConfig) -> Result<Box<dyn ReleaseProvider>> {
    match config.source.provider {
        ProviderKind::GitHub => Ok(Box::new(GitHubProvider::new(
            &config.github,
            &config.network,
        )?)),
        ProviderKind::Gitee => Ok(Box::new(GiteeProvider::new(
            &config.gitee,
            &config.network,
        )?)),
    }
}

/// HTTP client for host API calls, bounded by the total API timeout
fn api_client(network: &NetworkConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&network.user_agent)
        .timeout(Duration::from_secs(network.api_timeout_secs))
        .build()
        .map_err(|e| UpdateError::transport("building http client", e))
}

/// Send an API request and decode its JSON body.
///
/// When `tag` is given, a 404 becomes [`UpdateError::NotFound`].
async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    stage: &'static str,
    tag: Option<&str>,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| UpdateError::transport(stage, e))?;

    let status = response.status();
    debug!("{}: response {}", stage, status);

    if status == reqwest::StatusCode::NOT_FOUND {
        if let Some(tag) = tag {
            return Err(UpdateError::NotFound {
                tag: tag.to_string(),
            });
        }
    }
    if !status.is_success() {
        return Err(UpdateError::HttpStatus { stage, status });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| UpdateError::transport(stage, e))?;
    serde_json::from_slice(&body).map_err(|source| UpdateError::Decode { stage, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory host serving a fixed tag list
    struct FixedProvider {
        tags: Vec<&'static str>,
        requested: Mutex<Vec<String>>,
    }

    impl FixedProvider {
        fn new(tags: &[&'static str]) -> Self {
            Self {
                tags: tags.to_vec(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReleaseProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn list_releases(&self, _owner: &str, _repo: &str) -> Result<Vec<Release>> {
            Ok(self
                .tags
                .iter()
                .map(|t| Release::new(*t, "", "", None, Vec::new()))
                .collect())
        }

        async fn fetch_release(&self, _owner: &str, _repo: &str, tag: &str) -> Result<Release> {
            self.requested.lock().unwrap().push(tag.to_string());
            if self.tags.iter().any(|t| *t == tag) {
                Ok(Release::new(tag, "", "", None, Vec::new()))
            } else {
                Err(UpdateError::NotFound {
                    tag: tag.to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_newer_than_stops_at_current() {
        let provider = FixedProvider::new(&["v2.0.0", "v1.9.0", "v1.8.0"]);
        let newer = provider
            .list_releases_newer_than("o", "r", "1.9.0")
            .await
            .unwrap();
        let tags: Vec<_> = newer.iter().map(|r| r.version()).collect();
        assert_eq!(tags, vec!["v2.0.0"]);
    }

    #[tokio::test]
    async fn test_by_tag_prefers_v_prefix() {
        let provider = FixedProvider::new(&["v0.4.5", "0.4.5"]);
        let release = provider.get_release_by_tag("o", "r", "0.4.5").await.unwrap();
        assert_eq!(release.version(), "v0.4.5");
        assert_eq!(*provider.requested.lock().unwrap(), vec!["v0.4.5"]);
    }

    #[tokio::test]
    async fn test_by_tag_falls_back_to_bare() {
        let provider = FixedProvider::new(&["0.4.5"]);
        let release = provider.get_release_by_tag("o", "r", "v0.4.5").await.unwrap();
        assert_eq!(release.version(), "0.4.5");
        assert_eq!(
            *provider.requested.lock().unwrap(),
            vec!["v0.4.5", "0.4.5"]
        );
    }

    #[tokio::test]
    async fn test_by_tag_not_found() {
        let provider = FixedProvider::new(&["v1.0.0"]);
        let err = provider
            .get_release_by_tag("o", "r", "9.9.9")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_default_os_token_is_unchanged() {
        let provider = FixedProvider::new(&[]);
        assert_eq!(provider.os_token("darwin"), "darwin");
    }
}
