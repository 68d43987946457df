//! Configuration types for the updater
//!
//! These types control which release host is queried, how network calls
//! are bounded, and how the downloaded binary is swapped into place.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Complete updater configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdaterConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Which host and repository to update from
    #[serde(default)]
    pub source: SourceConfig,

    /// GitHub API settings
    #[serde(default = "HostConfig::github", deserialize_with = "github_section")]
    pub github: HostConfig,

    /// Gitee API settings
    #[serde(default = "HostConfig::gitee", deserialize_with = "gitee_section")]
    pub gitee: HostConfig,

    /// Binary installation settings
    #[serde(default)]
    pub install: InstallConfig,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            source: SourceConfig::default(),
            github: HostConfig::github(),
            gitee: HostConfig::gitee(),
            install: InstallConfig::default(),
        }
    }
}

impl UpdaterConfig {
    /// Settings for the host selected in `source.provider`
    pub fn host(&self) -> &HostConfig {
        match self.source.provider {
            ProviderKind::GitHub => &self.github,
            ProviderKind::Gitee => &self.gitee,
        }
    }

    /// Name of the executable to replace.
    ///
    /// Falls back to the repository name, with `.exe` appended on Windows.
    pub fn command_name(&self) -> String {
        match &self.install.command_name {
            Some(name) => name.clone(),
            None if cfg!(windows) => format!("{}.exe", self.source.repo),
            None => self.source.repo.clone(),
        }
    }

    /// Archive kind to look for, resolving `auto` for the running platform
    pub fn archive_kind(&self) -> ArchiveKind {
        self.install
            .archive
            .unwrap_or_else(ArchiveKind::for_current_platform)
    }

    /// Swap strategy to use, resolving `auto` for the running platform
    pub fn swap_strategy(&self) -> SwapStrategy {
        self.install
            .swap_strategy
            .unwrap_or_else(SwapStrategy::for_current_platform)
    }
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Total timeout for release host API calls, in seconds
    #[serde(default = "default_api_timeout")]
    pub api_timeout_secs: u64,

    /// Connect timeout for asset downloads, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_timeout_secs: default_api_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_timeout() -> u64 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_user_agent() -> String {
    format!(
        "upswap/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Release source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Hosting backend
    #[serde(default)]
    pub provider: ProviderKind,

    /// Repository owner
    #[serde(default)]
    pub owner: String,

    /// Repository name
    #[serde(default)]
    pub repo: String,
}

/// Supported release hosts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "github")]
    GitHub,
    Gitee,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::GitHub),
            "gitee" => Ok(Self::Gitee),
            other => Err(Error::invalid_config(format!(
                "Unknown provider: {}. Valid providers: github, gitee",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "github"),
            Self::Gitee => write!(f, "gitee"),
        }
    }
}

/// API settings for one release host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostConfig {
    /// Base URL for the host's REST API
    pub api_url: String,

    /// Environment variable holding an optional access token
    pub token_env: String,

    /// Page size when listing releases
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl HostConfig {
    pub fn github() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            per_page: 30,
        }
    }

    pub fn gitee() -> Self {
        Self {
            api_url: "https://gitee.com/api/v5".to_string(),
            token_env: "GITEE_TOKEN".to_string(),
            per_page: 20,
        }
    }

    /// Read the access token from the configured environment variable
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

fn default_per_page() -> u32 {
    30
}

/// Host section as written in a config file; unset fields keep the host's defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct HostOverlay {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    token_env: Option<String>,
    #[serde(default)]
    per_page: Option<u32>,
}

impl HostOverlay {
    fn apply(self, base: HostConfig) -> HostConfig {
        HostConfig {
            api_url: self.api_url.unwrap_or(base.api_url),
            token_env: self.token_env.unwrap_or(base.token_env),
            per_page: self.per_page.unwrap_or(base.per_page),
        }
    }
}

fn github_section<'de, D>(deserializer: D) -> Result<HostConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(HostOverlay::deserialize(deserializer)?.apply(HostConfig::github()))
}

fn gitee_section<'de, D>(deserializer: D) -> Result<HostConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(HostOverlay::deserialize(deserializer)?.apply(HostConfig::gitee()))
}

/// Binary installation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallConfig {
    /// Executable file name inside the archive and the install directory
    #[serde(default)]
    pub command_name: Option<String>,

    /// Archive kind to select; `None` means pick for the running platform
    #[serde(default)]
    pub archive: Option<ArchiveKind>,

    /// Swap strategy; `None` means pick for the running platform
    #[serde(default)]
    pub swap_strategy: Option<SwapStrategy>,
}

/// Archive container a release asset is published as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveKind {
    /// gzip-compressed tarball (`.tar.gz`)
    TarGz,
    /// zip file
    Zip,
}

impl ArchiveKind {
    /// The last file extension an asset of this kind carries
    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGz => ".gz",
            Self::Zip => ".zip",
        }
    }

    /// zip on Windows, tarballs elsewhere
    pub fn for_current_platform() -> Self {
        if cfg!(windows) {
            Self::Zip
        } else {
            Self::TarGz
        }
    }
}

impl FromStr for ArchiveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tar-gz" | "tar.gz" | "tgz" | "gz" => Ok(Self::TarGz),
            "zip" => Ok(Self::Zip),
            other => Err(Error::invalid_config(format!(
                "Unknown archive kind: {}. Valid kinds: auto, tar-gz, zip",
                other
            ))),
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TarGz => write!(f, "tar-gz"),
            Self::Zip => write!(f, "zip"),
        }
    }
}

/// How the new binary is committed over the existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapStrategy {
    /// Rename the staged binary directly over the target
    RenameOver,
    /// Move the target to `<name>.old` first, for platforms that lock
    /// running executables against overwrite
    MoveAside,
}

impl SwapStrategy {
    pub fn for_current_platform() -> Self {
        if cfg!(windows) {
            Self::MoveAside
        } else {
            Self::RenameOver
        }
    }
}

impl fmt::Display for SwapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameOver => write!(f, "rename-over"),
            Self::MoveAside => write!(f, "move-aside"),
        }
    }
}

impl FromStr for SwapStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rename-over" => Ok(Self::RenameOver),
            "move-aside" => Ok(Self::MoveAside),
            other => Err(Error::invalid_config(format!(
                "Unknown swap strategy: {}. Valid strategies: auto, rename-over, move-aside",
                other
            ))),
        }
    }
}
