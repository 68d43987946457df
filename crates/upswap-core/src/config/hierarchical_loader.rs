//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.upswap/config.yaml)
//! 3. Environment variables (UPSWAP_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{InstallConfig, UpdaterConfig};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::str::FromStr;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "updater-defaults.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a new hierarchical config loader rooted at ~/.upswap
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the standard config directory (~/.upswap)
    ///
    /// The directory is not created; a missing directory just means no user file.
    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::HomeDirUnavailable)?;

        Ok(Utf8PathBuf::from(home).join(".upswap"))
    }

    /// Load updater configuration with hierarchical precedence
    pub fn load(&self) -> Result<UpdaterConfig> {
        let mut config = Self::load_embedded_config::<UpdaterConfig>(DEFAULTS_FILE)?;

        let user_config_path = self.config_dir.join(USER_CONFIG_FILE);
        if user_config_path.exists() {
            debug!("Loading user config from {}", user_config_path);
            let file_config = self.load_yaml_file::<UpdaterConfig>(&user_config_path)?;
            config = Self::merge_config(config, file_config);
        }

        Self::apply_env_overrides(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Merge two configs (base is overridden by overlay)
    fn merge_config(base: UpdaterConfig, overlay: UpdaterConfig) -> UpdaterConfig {
        UpdaterConfig {
            network: overlay.network,
            source: overlay.source,
            github: overlay.github,
            gitee: overlay.gitee,
            install: Self::merge_install(base.install, overlay.install),
        }
    }

    /// Unset install fields keep whatever the base chose
    fn merge_install(base: InstallConfig, overlay: InstallConfig) -> InstallConfig {
        InstallConfig {
            command_name: overlay.command_name.or(base.command_name),
            archive: overlay.archive.or(base.archive),
            swap_strategy: overlay.swap_strategy.or(base.swap_strategy),
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: UpdaterConfig) -> Result<UpdaterConfig> {
        if let Ok(val) = env::var("UPSWAP_PROVIDER") {
            config.source.provider = val.parse()?;
        }

        if let Ok(val) = env::var("UPSWAP_OWNER") {
            config.source.owner = val;
        }

        if let Ok(val) = env::var("UPSWAP_REPO") {
            config.source.repo = val;
        }

        if let Ok(val) = env::var("UPSWAP_COMMAND_NAME") {
            config.install.command_name = Some(val);
        }

        if let Ok(val) = env::var("UPSWAP_API_TIMEOUT_SECS") {
            config.network.api_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("UPSWAP_API_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("UPSWAP_CONNECT_TIMEOUT_SECS") {
            config.network.connect_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("UPSWAP_CONNECT_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("UPSWAP_GITHUB_API_URL") {
            config.github.api_url = val;
        }

        if let Ok(val) = env::var("UPSWAP_GITEE_API_URL") {
            config.gitee.api_url = val;
        }

        if let Ok(val) = env::var("UPSWAP_ARCHIVE") {
            config.install.archive = parse_auto(&val)?;
        }

        if let Ok(val) = env::var("UPSWAP_SWAP_STRATEGY") {
            config.install.swap_strategy = parse_auto(&val)?;
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

/// "auto" clears the setting so the platform default applies
fn parse_auto<T>(val: &str) -> Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    if val.eq_ignore_ascii_case("auto") {
        Ok(None)
    } else {
        val.parse().map(Some)
    }
}
