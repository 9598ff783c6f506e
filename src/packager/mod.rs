//! Release archive creation

pub mod archiver;
pub mod builder;
pub mod extractor;

pub use archiver::{Archiver, ArchiverKind, BuiltinArchiver, SevenZipArchiver, ZipCliArchiver};

use crate::error::ArchiveError;
use crate::utils::remove_if_exists;
use std::path::Path;

/// Archive `source_dir` to `output`, replacing any artifact from a previous
/// run first so command-line tools do not append to it
pub fn package_directory(
    archiver: &dyn Archiver,
    source_dir: &Path,
    output: &Path,
) -> Result<u64, ArchiveError> {
    let io_err = |source: std::io::Error| ArchiveError::Io {
        path: output.to_path_buf(),
        source,
    };

    if remove_if_exists(output).map_err(io_err)? {
        tracing::debug!(path = %output.display(), "removed stale artifact");
    }
    archiver.create(output, source_dir)?;

    let size = std::fs::metadata(output).map_err(io_err)?.len();
    Ok(size)
}
