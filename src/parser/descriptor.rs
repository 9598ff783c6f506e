//! Package descriptor parsing

use crate::models::PackageDescriptor;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse a package descriptor from bytes
pub fn parse_descriptor(content: &[u8]) -> Result<PackageDescriptor> {
    let content_str = std::str::from_utf8(content)
        .context("Invalid UTF-8 in package descriptor")?;

    // json5 is a superset of JSON, so hand-edited files with comments load too
    let descriptor: PackageDescriptor = json5::from_str(content_str)
        .context("Failed to parse package descriptor")?;

    Ok(descriptor)
}

/// Parse a package descriptor from file path
pub fn parse_descriptor_from_file(path: impl AsRef<Path>) -> Result<PackageDescriptor> {
    let path = path.as_ref();
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read package descriptor {}", path.display()))?;
    parse_descriptor(&content)
}

/// Parse a package descriptor from string
pub fn parse_descriptor_from_str(content: &str) -> Result<PackageDescriptor> {
    parse_descriptor(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, Substitution};

    #[test]
    fn test_parse_full_descriptor() {
        let json = r#"{
            "name": "ext",
            "version": "1.2.3",
            "type": "module",
            "extensionManifestConfig": {
                "firefox": {
                    "replaceAll": [{ "from": "CHROME_ONLY", "to": "FIREFOX_ONLY" }]
                }
            }
        }"#;

        let descriptor = parse_descriptor_from_str(json).unwrap();
        assert_eq!(descriptor.name, "ext");
        assert_eq!(descriptor.version, "1.2.3");
        assert_eq!(
            descriptor.substitutions(Platform::Firefox),
            &[Substitution::new("CHROME_ONLY", "FIREFOX_ONLY")]
        );
        assert!(descriptor.substitutions(Platform::Chromium).is_empty());
        assert_eq!(descriptor.extra["type"], "module");
    }

    #[test]
    fn test_parse_without_manifest_config() {
        let json = r#"{ "name": "ext", "version": "2.0.0" }"#;

        let descriptor = parse_descriptor_from_str(json).unwrap();
        assert!(descriptor.substitutions(Platform::Firefox).is_empty());
        assert!(descriptor.substitutions(Platform::Chromium).is_empty());
    }

    #[test]
    fn test_parse_platform_without_replace_all() {
        let json = r#"{
            "name": "ext",
            "version": "2.0.0",
            "extensionManifestConfig": { "chromium": {} }
        }"#;

        let descriptor = parse_descriptor_from_str(json).unwrap();
        assert!(descriptor.substitutions(Platform::Chromium).is_empty());
    }

    #[test]
    fn test_parse_with_comments() {
        let json = r#"{
            // release name
            "name": "ext",
            "version": "0.9.0", /* trailing comma below */
        }"#;

        let descriptor = parse_descriptor_from_str(json).unwrap();
        assert_eq!(descriptor.artifact_file_name(Platform::Firefox), "ext firefox v0.9.0.zip");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_descriptor_from_str("not json").is_err());
    }
}
