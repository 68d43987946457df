//! Platform detection
//!
//! Release hosts name assets after Go-style OS/architecture tokens
//! (`linux_amd64`, `darwin_arm64`, `windows_386`), so the Rust target
//! constants are mapped onto that vocabulary here.

use std::fmt;

/// OS/architecture pair used to pick a release asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system token (e.g. "linux", "darwin", "windows")
    pub os: String,

    /// Architecture token (e.g. "amd64", "arm64")
    pub arch: String,
}

impl Platform {
    /// Create a platform from explicit tokens. No normalization is applied.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for
    pub fn current() -> Self {
        Self::from_rust_names(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map Rust `std::env::consts` names onto release-asset tokens
    pub fn from_rust_names(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "darwin",
            other => other,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            "powerpc64" => "ppc64",
            "loongarch64" => "loong64",
            other => other,
        };
        Self::new(os, arch)
    }

    /// The `<os>_<arch>` token searched for in asset names
    pub fn asset_token(&self) -> String {
        format!("{}_{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
