//! Dual-platform browser extension release packager
//!
//! Swaps the Firefox or Chromium manifest into place, patches the version
//! and per-platform text substitutions, zips the extension source directory
//! into `<name> <platform> v<version>.zip` and restores the manifest files.

pub mod error;
pub mod models;
pub mod parser;
pub mod swapper;
pub mod patcher;
pub mod packager;
pub mod release;
pub mod validator;
pub mod report;
pub mod utils;

pub use models::{ManifestSet, ManifestState, PackageDescriptor, Platform, ReleaseSummary};
pub use packager::ArchiverKind;
pub use release::ReleaseBuilder;
pub use swapper::ManifestSwapper;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use utils::resolve_path;

/// Main entry point: build one release archive per platform
pub fn make_release(options: &ReleaseOptions) -> Result<ReleaseSummary> {
    let paths = options.paths()?;
    let descriptor = parser::descriptor::parse_descriptor_from_file(&paths.descriptor)?;
    let archiver = options.archiver.build();

    // Nothing is renamed until everything that can be checked up front passes
    validator::validate_release_inputs(&descriptor, &paths, options, archiver.as_ref())?;

    let summary = ReleaseBuilder::new(options, &paths, &descriptor, archiver.as_ref()).run();
    summary
}

/// Swap the active manifest once and return the new state
pub fn swap_manifests(options: &ReleaseOptions) -> Result<ManifestState> {
    let paths = options.paths()?;
    let swapper = ManifestSwapper::new(paths.manifest_set(&options.manifest_name));
    Ok(swapper.swap()?)
}

/// Which platform's manifest is currently active
pub fn manifest_status(options: &ReleaseOptions) -> Result<ManifestState> {
    let paths = options.paths()?;
    Ok(paths.manifest_set(&options.manifest_name).detect_state()?)
}

/// Run every preflight check without touching any file
pub fn check_release(options: &ReleaseOptions) -> Result<ManifestState> {
    let paths = options.paths()?;
    let descriptor = parser::descriptor::parse_descriptor_from_file(&paths.descriptor)?;
    let archiver = options.archiver.build();
    validator::validate_release_inputs(&descriptor, &paths, options, archiver.as_ref())
}

#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Project root; other relative paths resolve against it
    pub project_root: PathBuf,
    pub source_dir: PathBuf,
    pub releases_dir: PathBuf,
    pub descriptor: PathBuf,
    /// File name of the active manifest inside the source directory
    pub manifest_name: String,
    pub archiver: ArchiverKind,
    /// Undo completed steps when a release fails
    pub rollback: bool,
    pub quiet: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            source_dir: PathBuf::from("src"),
            releases_dir: PathBuf::from("releases"),
            descriptor: PathBuf::from("package.json"),
            manifest_name: models::DEFAULT_MANIFEST_NAME.to_string(),
            archiver: ArchiverKind::Auto,
            rollback: true,
            quiet: false,
        }
    }
}

impl ReleaseOptions {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: root.into(),
            ..Default::default()
        }
    }

    /// Absolute locations. Archivers run inside the source directory, so
    /// the artifact path must not be relative.
    pub fn paths(&self) -> Result<ReleasePaths> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let root = resolve_path(&cwd, &self.project_root);

        Ok(ReleasePaths {
            source_dir: resolve_path(&root, &self.source_dir),
            releases_dir: resolve_path(&root, &self.releases_dir),
            descriptor: resolve_path(&root, &self.descriptor),
            root,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePaths {
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub releases_dir: PathBuf,
    pub descriptor: PathBuf,
}

impl ReleasePaths {
    pub fn manifest_set(&self, manifest_name: &str) -> ManifestSet {
        ManifestSet::new(&self.source_dir, manifest_name)
    }

    /// Where inactive manifests wait while the source directory is archived
    pub fn parking_dir(&self) -> &Path {
        &self.root
    }

    pub fn artifact_path(&self, descriptor: &PackageDescriptor, platform: Platform) -> PathBuf {
        self.releases_dir.join(descriptor.artifact_file_name(platform))
    }
}
