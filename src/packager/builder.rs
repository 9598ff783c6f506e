//! Built-in zip writer

use crate::error::ArchiveError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

/// Zip every file below `source_dir`. Entries are sorted and carry a fixed
/// timestamp so identical trees produce identical archives.
pub fn create_zip_from_directory(source_dir: &Path, zip_path: &Path) -> Result<(), ArchiveError> {
    let io_err = |source: io::Error| ArchiveError::Io {
        path: zip_path.to_path_buf(),
        source,
    };

    let file = File::create(zip_path).map_err(io_err)?;
    let mut zip = ZipWriter::new(file);

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| io_err(io::Error::from(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative_path = path
            .strip_prefix(source_dir)
            .map_err(|e| io_err(io::Error::new(io::ErrorKind::Other, e)))?;
        let name = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        let content = fs::read(path).map_err(io_err)?;
        zip.write_all(&content).map_err(io_err)?;
    }

    zip.finish()?;
    Ok(())
}
