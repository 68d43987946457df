//! # upswap-core
//!
//! Core library for upswap providing:
//! - Hierarchical configuration (embedded defaults, user file, environment)
//! - Platform detection using the naming release hosts put in asset names
//! - Shared types for archive kinds and binary swap strategies

pub mod config;
pub mod error;
pub mod platform;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use platform::Platform;
pub use types::{ArchiveKind, ProviderKind, SwapStrategy, UpdaterConfig};
