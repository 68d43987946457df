//! Shared constants for test infrastructure

// Repository
pub const OWNER: &str = "zan8in";
pub const REPO: &str = "afrog";
pub const COMMAND: &str = "afrog";

// Version constants
pub const VERSION_1_8_0: &str = "1.8.0";
pub const VERSION_1_9_0: &str = "1.9.0";
pub const VERSION_2_0_0: &str = "2.0.0";

// Tag constants (with 'v' prefix)
pub const TAG_V1_8_0: &str = "v1.8.0";
pub const TAG_V1_9_0: &str = "v1.9.0";
pub const TAG_V2_0_0: &str = "v2.0.0";

// Host platform tokens
pub const OS_LINUX: &str = "linux";
pub const OS_DARWIN: &str = "darwin";
pub const OS_WINDOWS: &str = "windows";
pub const ARCH_AMD64: &str = "amd64";
pub const ARCH_ARM64: &str = "arm64";

// Binary content for testing
pub const OLD_BINARY: &[u8] = b"#!/bin/sh\necho afrog 1.9.0\n";
pub const NEW_BINARY: &[u8] = b"#!/bin/sh\necho afrog 2.0.0\n";

// Token env var no test ever sets
pub const UNSET_TOKEN_ENV: &str = "UPSWAP_TEST_TOKEN_NEVER_SET";

// Token env var set by #[serial] tests
pub const TEST_TOKEN_ENV: &str = "UPSWAP_TEST_TOKEN";

/// Asset file name in the `<repo>_<version>_<os>_<arch>.<ext>` convention
pub fn asset_name(version: &str, os: &str, arch: &str, ext: &str) -> String {
    format!("{}_{}_{}_{}.{}", REPO, version, os, arch, ext)
}
