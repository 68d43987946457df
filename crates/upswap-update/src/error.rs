//! Error types for the update flow
//!
//! Every failure carries the stage it happened in, so a partially applied
//! install (a `.old` left beside the target, or a staged `.tmp` that never
//! got renamed) can be diagnosed from the message alone.

use std::fmt;
use std::io;

use thiserror::Error;
use upswap_core::ArchiveKind;

/// Result type alias using the update error
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Errors raised while resolving, downloading, or installing a release
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Request to the release host or asset URL failed before a status was received.
    ///
    /// The request URL is stripped from `source`, since Gitee carries the
    /// access token in the query string.
    #[error("{stage}: {source}")]
    Transport {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Host answered with a client or server error status
    #[error("{stage}: {status}")]
    HttpStatus {
        stage: &'static str,
        status: reqwest::StatusCode,
    },

    /// Host response could not be decoded
    #[error("{stage}: invalid response body: {source}")]
    Decode {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The requested release tag does not exist on the host
    #[error("release {tag} not found")]
    NotFound { tag: String },

    /// The release has no asset for the running OS/architecture
    #[error("no binary for your system ({os}_{arch}, {kind})")]
    NoMatchingAsset {
        os: String,
        arch: String,
        kind: ArchiveKind,
    },

    /// Archive could not be unpacked
    #[error("{stage}: {message}")]
    Archive {
        stage: InstallStage,
        message: String,
    },

    /// Filesystem operation failed
    #[error("{stage}: {source}")]
    Filesystem {
        stage: InstallStage,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] upswap_core::Error),
}

impl UpdateError {
    pub(crate) fn transport(stage: &'static str, source: reqwest::Error) -> Self {
        Self::Transport {
            stage,
            source: source.without_url(),
        }
    }

    pub(crate) fn fs(stage: InstallStage, source: io::Error) -> Self {
        Self::Filesystem { stage, source }
    }

    pub(crate) fn archive(stage: InstallStage, message: impl fmt::Display) -> Self {
        Self::Archive {
            stage,
            message: message.to_string(),
        }
    }

    /// Whether this is the distinguished "release not found" case
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The install stage that failed, if the error came from the installer
    pub fn install_stage(&self) -> Option<InstallStage> {
        match self {
            Self::Archive { stage, .. } | Self::Filesystem { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Steps of downloading and installing a binary that can fail on the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    /// Resolving the running executable's own path
    ResolveExecutable,
    /// Creating the download temp file
    CreateTempFile,
    /// Writing the downloaded bytes
    WriteDownload,
    /// Opening the downloaded archive
    OpenArchive,
    /// Unpacking into the scratch directory
    Unpack,
    /// Marking the unpacked binary executable
    Chmod,
    /// Staging the binary as `<name>.tmp`
    Copy,
    /// Moving the current binary to `<name>.old`
    MoveAside,
    /// Renaming `<name>.tmp` over `<name>`
    Rename,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolveExecutable => "resolving executable path",
            Self::CreateTempFile => "creating temp file",
            Self::WriteDownload => "writing download",
            Self::OpenArchive => "opening archive",
            Self::Unpack => "unpacking archive",
            Self::Chmod => "chmod",
            Self::Copy => "copying",
            Self::MoveAside => "windows renaming",
            Self::Rename => "renaming",
        };
        f.write_str(name)
    }
}
