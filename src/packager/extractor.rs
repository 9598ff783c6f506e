//! Reading produced archives back

use crate::models::Platform;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Load every file entry of a zip archive, keyed by entry name
pub fn read_archive_entries(archive_path: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;

    let mut archive = ZipArchive::new(file)
        .context("Failed to read ZIP archive")?;

    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)
            .context("Failed to read file from archive")?;

        if file.is_file() {
            let name = file.name().trim_start_matches("./").to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .context("Failed to read file content")?;
            entries.insert(name, content);
        }
    }

    Ok(entries)
}

/// Top-level manifest files (active or parked variant) packed into the archive
pub fn manifest_entries(archive_path: &Path, active_name: &str) -> Result<Vec<String>> {
    let entries = read_archive_entries(archive_path)?;
    Ok(entries
        .into_keys()
        .filter(|name| is_manifest_entry(name, active_name))
        .collect())
}

fn is_manifest_entry(name: &str, active_name: &str) -> bool {
    name == active_name
        || Platform::ALL
            .iter()
            .any(|platform| name.strip_prefix(active_name) == Some(platform.variant_suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::builder::create_zip_from_directory;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_entries_only_match_top_level_manifests() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("lib")).unwrap();
        fs::write(src.join("manifest.json"), "{}").unwrap();
        fs::write(src.join("manifest.json.map"), "{}").unwrap();
        fs::write(src.join("manifest.json_chrome"), "{}").unwrap();
        fs::write(src.join("lib/manifest.json"), "{}").unwrap();

        let zip_path = temp_dir.path().join("out.zip");
        create_zip_from_directory(&src, &zip_path).unwrap();

        let manifests = manifest_entries(&zip_path, "manifest.json").unwrap();
        assert_eq!(manifests, vec!["manifest.json", "manifest.json_chrome"]);
    }
}
