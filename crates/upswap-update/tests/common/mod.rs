//! Common test infrastructure for upswap-update tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Repository names, versions, platform tokens, payloads
//! - `builders`: Fluent builders for releases and host API JSON
//! - `mock_server`: Wiremock setup helpers for release hosts and downloads
//! - `archives`: In-memory tar.gz and zip fixtures
//! - `fixtures`: Install directories and provider construction

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod archives;
pub mod builders;
pub mod constants;
pub mod fixtures;
pub mod mock_server;

pub use archives::*;
pub use builders::*;
pub use constants::*;
pub use fixtures::*;
pub use mock_server::*;
