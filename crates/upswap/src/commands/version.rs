//! Version command

use crate::cli::VersionArgs;
use crate::output;
use crate::version::VersionInfo;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.display());
    output::kv("Asset token", &info.platform);
    output::kv("Archive", &info.archive.to_string());
    output::kv("Swap", &info.swap_strategy.to_string());
    if let Some(target) = &info.target {
        output::kv("Target", target);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_json_uses_config_spellings() {
        let json = serde_json::to_value(VersionInfo::current()).unwrap();
        assert_eq!(json["version"], upswap_update::VERSION);
        assert!(json["build-tag"].is_string() || json["build-tag"].is_null());

        let strategy = json["swap-strategy"].as_str().unwrap();
        assert!(strategy.parse::<upswap_core::SwapStrategy>().is_ok());
        let archive = json["archive"].as_str().unwrap();
        assert!(archive.parse::<upswap_core::ArchiveKind>().is_ok());
    }
}
