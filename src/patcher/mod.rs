//! Literal text patches applied to the active manifest for a release
//!
//! The source manifest carries a placeholder version line which is replaced
//! with the descriptor's version, followed by the platform's configured
//! `{from, to}` pairs. All replacements are literal and global.

use crate::models::{PackageDescriptor, Platform, Substitution};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const VERSION_PLACEHOLDER: &str = r#""version": "0.0.0.1","#;

#[derive(Debug, Clone)]
pub struct ManifestPatcher<'a> {
    version_line: String,
    substitutions: &'a [Substitution],
}

impl<'a> ManifestPatcher<'a> {
    pub fn new(version: &str, substitutions: &'a [Substitution]) -> Self {
        Self {
            version_line: format!(r#""version": "{}","#, version),
            substitutions,
        }
    }

    pub fn for_platform(descriptor: &'a PackageDescriptor, platform: Platform) -> Self {
        Self::new(&descriptor.version, descriptor.substitutions(platform))
    }

    pub fn version_line(&self) -> &str {
        &self.version_line
    }

    pub fn apply(&self, text: &str) -> String {
        let mut text = text.replace(VERSION_PLACEHOLDER, &self.version_line);
        for Substitution { from, to } in self.substitutions {
            if from.is_empty() {
                continue;
            }
            text = text.replace(from.as_str(), to);
        }
        text
    }

    /// Reverse `apply` pair by pair. Only an exact inverse when no `to`
    /// overlaps another rule or text already present in the manifest.
    pub fn undo(&self, text: &str) -> String {
        let mut text = text.to_string();
        for Substitution { from, to } in self.substitutions {
            if from.is_empty() || to.is_empty() {
                continue;
            }
            text = text.replace(to.as_str(), from);
        }
        text.replace(&self.version_line, VERSION_PLACEHOLDER)
    }

    /// Patch the file in place and return its original bytes
    pub fn patch_file(&self, path: &Path) -> Result<Vec<u8>> {
        let original = fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let text = std::str::from_utf8(&original)
            .with_context(|| format!("Invalid UTF-8 in {}", path.display()))?;

        fs::write(path, self.apply(text))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(original)
    }

    /// Reverse the patch in place. When the reversed text differs from
    /// `snapshot` the snapshot is written instead and `false` is returned.
    pub fn unpatch_file(&self, path: &Path, snapshot: &[u8]) -> Result<bool> {
        let patched = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let restored = self.undo(&patched);
        let exact = restored.as_bytes() == snapshot;

        let content: &[u8] = if exact { restored.as_bytes() } else { snapshot };
        fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(exact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::descriptor::parse_descriptor_from_str;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    const MANIFEST: &str = r#"{
  "manifest_version": 3,
  "name": "ext",
  "version": "0.0.0.1",
  "permissions": ["CHROME_ONLY"]
}"#;

    #[test]
    fn test_firefox_patch_round_trip() {
        let descriptor = parse_descriptor_from_str(
            r#"{
                "name": "ext",
                "version": "1.2.3",
                "extensionManifestConfig": {
                    "firefox": { "replaceAll": [{ "from": "CHROME_ONLY", "to": "FIREFOX_ONLY" }] }
                }
            }"#,
        )
        .unwrap();
        let patcher = ManifestPatcher::for_platform(&descriptor, Platform::Firefox);

        let patched = patcher.apply(MANIFEST);
        assert!(patched.contains(r#""version": "1.2.3","#));
        assert!(patched.contains("FIREFOX_ONLY"));
        assert!(!patched.contains("CHROME_ONLY"));

        assert_eq!(patcher.undo(&patched), MANIFEST);
    }

    #[test]
    fn test_chromium_without_rules_only_touches_version() {
        let descriptor = parse_descriptor_from_str(r#"{ "name": "ext", "version": "4.0.0" }"#).unwrap();
        let patcher = ManifestPatcher::for_platform(&descriptor, Platform::Chromium);

        let patched = patcher.apply(MANIFEST);
        assert_eq!(patched, MANIFEST.replace("0.0.0.1", "4.0.0"));
    }

    #[test_case(&[("A", "B"), ("C", "D")], "A C A" ; "independent pairs")]
    #[test_case(&[("foo", "bar")], "foo foo foo" ; "repeated occurrences")]
    #[test_case(&[], "nothing to do" ; "no pairs")]
    fn test_undo_restores_non_overlapping(pairs: &[(&str, &str)], body: &str) {
        let substitutions: Vec<_> = pairs.iter().map(|(f, t)| Substitution::new(*f, *t)).collect();
        let patcher = ManifestPatcher::new("9.9.9", &substitutions);
        let text = format!("{}\n{}", VERSION_PLACEHOLDER, body);

        assert_eq!(patcher.undo(&patcher.apply(&text)), text);
    }

    #[test]
    fn test_later_pairs_see_earlier_results() {
        let substitutions = vec![Substitution::new("a", "b"), Substitution::new("b", "c")];
        let patcher = ManifestPatcher::new("1.0.0", &substitutions);
        assert_eq!(patcher.apply("a"), "c");
    }

    #[test]
    fn test_unpatch_file_falls_back_to_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.json");
        // "X" already appears in the manifest, so undoing Y->X is lossy
        std::fs::write(&path, "X Y").unwrap();

        let substitutions = vec![Substitution::new("Y", "X")];
        let patcher = ManifestPatcher::new("1.0.0", &substitutions);

        let snapshot = patcher.patch_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "X X");

        let exact = patcher.unpatch_file(&path, &snapshot).unwrap();
        assert!(!exact);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "X Y");
    }

    #[test]
    fn test_unpatch_file_exact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let patcher = ManifestPatcher::new("1.2.3", &[]);
        let snapshot = patcher.patch_file(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("1.2.3"));
        assert!(patcher.unpatch_file(&path, &snapshot).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), MANIFEST);
    }
}
