//! Validation module

pub mod preflight;

use crate::models::{ManifestState, PackageDescriptor};
use crate::packager::Archiver;
use crate::{ReleaseOptions, ReleasePaths};
use anyhow::Result;

pub fn validate_release_inputs(
    descriptor: &PackageDescriptor,
    paths: &ReleasePaths,
    options: &ReleaseOptions,
    archiver: &dyn Archiver,
) -> Result<ManifestState> {
    preflight::validate_preflight(descriptor, paths, &options.manifest_name, archiver)
}
