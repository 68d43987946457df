//! Records the release tag and target triple the binary is built from

use std::env;
use std::process::Command;

fn main() {
    if let Ok(target) = env::var("TARGET") {
        println!("cargo:rustc-env=UPSWAP_BUILD_TARGET={}", target);
    }

    // Nearest tag, e.g. "v0.3.0" on a release or "v0.3.0-4-g1a2b3c4" after it
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string());

    if let Some(tag) = described.filter(|t| !t.is_empty()) {
        println!("cargo:rustc-env=UPSWAP_BUILD_TAG={}", tag);
    }

    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/tags");
}
