//! Checks run before the first manifest rename

use crate::error::ReleaseError;
use crate::models::{ManifestState, PackageDescriptor, Platform};
use crate::packager::Archiver;
use crate::ReleasePaths;
use anyhow::Result;

pub fn validate_preflight(
    descriptor: &PackageDescriptor,
    paths: &ReleasePaths,
    manifest_name: &str,
    archiver: &dyn Archiver,
) -> Result<ManifestState> {
    validate_archiver(archiver)?;
    validate_descriptor(descriptor)?;

    if !paths.source_dir.is_dir() {
        return Err(ReleaseError::SourceDirMissing {
            path: paths.source_dir.clone(),
        }
        .into());
    }

    if paths.source_dir == paths.root {
        return Err(ReleaseError::SourceIsRoot {
            path: paths.source_dir.clone(),
        }
        .into());
    }

    let set = paths.manifest_set(manifest_name);
    let state = set.detect_state()?;

    for platform in Platform::ALL {
        let parked = set.parked_path(paths.parking_dir(), platform);
        if parked.exists() {
            return Err(ReleaseError::LeftoverParked { path: parked }.into());
        }
    }

    tracing::debug!(%state, archiver = archiver.name(), "preflight passed");
    Ok(state)
}

fn validate_archiver(archiver: &dyn Archiver) -> Result<(), ReleaseError> {
    if !archiver.is_available() {
        return Err(ReleaseError::ArchiverUnavailable {
            name: archiver.name().to_string(),
        });
    }
    Ok(())
}

fn validate_descriptor(descriptor: &PackageDescriptor) -> Result<(), ReleaseError> {
    if descriptor.name.trim().is_empty() {
        return Err(ReleaseError::MissingField { field: "name" });
    }
    if descriptor.version.trim().is_empty() {
        return Err(ReleaseError::MissingField { field: "version" });
    }
    Ok(())
}
