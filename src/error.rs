//! Typed errors for manifest swapping, archiving and release runs

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Shown whenever archiving fails or the archiver cannot be found
pub const ARCHIVER_HINT: &str =
    "make sure you have 7zip installed if on windows and zip if on linux";

/// The archiver hint for `error`, unless its message already carries it
pub fn archiver_hint(error: &anyhow::Error) -> Option<&'static str> {
    let from_archiver = error
        .chain()
        .any(|cause| cause.downcast_ref::<ArchiveError>().is_some());
    let already_shown = format!("{:#}", error).contains(ARCHIVER_HINT);
    (from_archiver && !already_shown).then_some(ARCHIVER_HINT)
}

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("active manifest not found at {}", path.display())]
    ActiveMissing { path: PathBuf },

    #[error(
        "neither {} nor {} exists, cannot tell which manifest is active",
        chrome.display(),
        firefox.display()
    )]
    NoVariant { chrome: PathBuf, firefox: PathBuf },

    #[error(
        "both {} and {} exist, manifest files are in an inconsistent state",
        chrome.display(),
        firefox.display()
    )]
    BothVariants { chrome: PathBuf, firefox: PathBuf },

    #[error("cannot move {} to {}: source does not exist", from.display(), to.display())]
    SourceMissing { from: PathBuf, to: PathBuf },

    #[error("refusing to move {} to {}: target already exists", from.display(), to.display())]
    TargetExists { from: PathBuf, to: PathBuf },

    #[error("failed to move {} to {}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("`{tool}` was not found, {}", ARCHIVER_HINT)]
    ToolMissing { tool: String },

    #[error("failed to launch `{tool}`")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("`{tool}` exited with {status}")]
    Failed { tool: String, status: ExitStatus },

    #[error("failed to write archive {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("package descriptor has no `{field}`")]
    MissingField { field: &'static str },

    #[error("no source directory found at {}", path.display())]
    SourceDirMissing { path: PathBuf },

    #[error(
        "source directory {} is the project root, inactive manifests are parked there so the source must be a subdirectory",
        path.display()
    )]
    SourceIsRoot { path: PathBuf },

    #[error(
        "found a parked manifest at {} left over from an unfinished run, move it back into the source directory",
        path.display()
    )]
    LeftoverParked { path: PathBuf },

    #[error("archiver `{name}` is not available, {}", ARCHIVER_HINT)]
    ArchiverUnavailable { name: String },

    #[error("release failed ({cause}) and rollback also failed ({rollback}), manifest files need manual correction")]
    RollbackFailed { cause: String, rollback: String },
}
