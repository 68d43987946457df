//! Install directory and provider fixtures

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use upswap_core::types::{HostConfig, NetworkConfig};
use upswap_update::{Downloader, GitHubProvider, GiteeProvider, InstallTarget};
use wiremock::MockServer;

use super::constants::*;

/// Host settings pointing at a mock server
pub fn host_config(server: &MockServer, base: HostConfig, token_env: &str) -> HostConfig {
    HostConfig {
        api_url: server.uri(),
        token_env: token_env.to_string(),
        ..base
    }
}

pub fn github_provider(server: &MockServer) -> GitHubProvider {
    let host = host_config(server, HostConfig::github(), UNSET_TOKEN_ENV);
    GitHubProvider::new(&host, &NetworkConfig::default()).unwrap()
}

pub fn gitee_provider(server: &MockServer) -> GiteeProvider {
    let host = host_config(server, HostConfig::gitee(), UNSET_TOKEN_ENV);
    GiteeProvider::new(&host, &NetworkConfig::default()).unwrap()
}

/// Downloader writing its temp files into `dir`
pub fn downloader_in(dir: &Path) -> Downloader {
    Downloader::new(&NetworkConfig::default())
        .unwrap()
        .with_temp_dir(dir)
}

/// Temp install directory holding `<COMMAND>` with `OLD_BINARY` content
pub struct InstallDir {
    pub dir: TempDir,
}

impl InstallDir {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(COMMAND), OLD_BINARY).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn binary(&self) -> PathBuf {
        self.dir.path().join(COMMAND)
    }

    pub fn target(&self) -> InstallTarget {
        InstallTarget::from_executable(&self.binary()).unwrap()
    }

    /// File names in the directory, sorted
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Write an archive into a separate scratch file and return its path
    pub fn write_archive(&self, scratch: &TempDir, bytes: &[u8]) -> PathBuf {
        let path = scratch.path().join("download");
        fs::write(&path, bytes).unwrap();
        path
    }
}

impl Default for InstallDir {
    fn default() -> Self {
        Self::new()
    }
}
