//! Platform asset selection

use std::path::Path;

use tracing::debug;
use upswap_core::{ArchiveKind, Platform};

use crate::releases::Asset;

/// Find the first asset whose name contains `<os>_<arch>` and whose final
/// extension is the one `kind` expects.
///
/// Tokens are compared verbatim; callers supply host naming (e.g. "darwin",
/// "amd64").
pub fn find_asset<'a>(
    assets: &'a [Asset],
    os: &str,
    arch: &str,
    kind: ArchiveKind,
) -> Option<&'a Asset> {
    let token = Platform::new(os, arch).asset_token();
    let found = assets
        .iter()
        .find(|a| a.name().contains(&token) && has_extension(a.name(), kind.extension()));

    match found {
        Some(asset) => debug!("Matched asset {} for {} ({})", asset.name(), token, kind),
        None => debug!("No {} asset matches {}", kind, token),
    }
    found
}

/// Compare the text after the last dot, including the dot
fn has_extension(name: &str, expected: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| expected.strip_prefix('.') == Some(e))
}
