//! Self-update functionality for command-line binaries
//!
//! Provides:
//! - Newer-release listing against GitHub and Gitee release hosts
//! - Platform asset matching by `<os>_<arch>` token and archive extension
//! - Streaming asset download with pluggable progress observation
//! - Archive unpacking (gzip tarballs and zip files)
//! - Atomic replacement of the running executable

pub mod archive;
pub mod download;
pub mod error;
pub mod install;
pub mod manager;
pub mod matcher;
pub mod providers;
pub mod releases;

pub use download::{BarProgress, ByteStream, Downloader, NoProgress, ProgressWrap};
pub use error::{InstallStage, Result, UpdateError};
pub use install::{InstallTarget, Installer};
pub use manager::{UpdateManager, UpdateOutcome};
pub use matcher::find_asset;
pub use providers::{create_provider, GitHubProvider, GiteeProvider, ReleaseProvider};
pub use releases::{Asset, Release};
pub use upswap_core::{ArchiveKind, Platform, SwapStrategy};

/// Current crate version, usable as the installed version of a binary
/// built in this workspace
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
