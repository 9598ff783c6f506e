//! Per-platform release orchestration
//!
//! Firefox is made active first and the chrome variant is parked in the
//! project root so only one manifest ends up in each archive. After each
//! platform the manifests pivot: the active one is parked and the next
//! platform's manifest moves in. At the end every file returns to its
//! starting name. All moves and patches go through a [`Journal`].

pub mod journal;

pub use journal::Journal;

use crate::error::ReleaseError;
use crate::models::{
    ManifestSet, ManifestState, PackageDescriptor, Platform, ReleaseArtifact, ReleaseSummary,
};
use crate::packager::{extractor, package_directory, Archiver};
use crate::patcher::ManifestPatcher;
use crate::swapper::ManifestSwapper;
use crate::utils::ensure_dir;
use crate::{ReleaseOptions, ReleasePaths};
use anyhow::{Context, Result};
use colored::*;
use std::cell::RefCell;
use std::io::{self, Write};

pub struct ReleaseBuilder<'a> {
    options: &'a ReleaseOptions,
    paths: &'a ReleasePaths,
    descriptor: &'a PackageDescriptor,
    archiver: &'a dyn Archiver,
    set: ManifestSet,
    console: RefCell<Box<dyn Write + 'a>>,
}

impl<'a> ReleaseBuilder<'a> {
    pub fn new(
        options: &'a ReleaseOptions,
        paths: &'a ReleasePaths,
        descriptor: &'a PackageDescriptor,
        archiver: &'a dyn Archiver,
    ) -> Self {
        Self {
            options,
            paths,
            descriptor,
            archiver,
            set: paths.manifest_set(&options.manifest_name),
            console: RefCell::new(Box::new(io::stdout())),
        }
    }

    /// Send phase messages somewhere other than stdout
    pub fn with_console(mut self, console: impl Write + 'a) -> Self {
        self.console = RefCell::new(Box::new(console));
        self
    }

    pub fn run(&self) -> Result<ReleaseSummary> {
        ensure_dir(&self.paths.releases_dir).with_context(|| {
            format!("Failed to create {}", self.paths.releases_dir.display())
        })?;

        self.say(format!("\n{}\n", "Making Release".bold()));

        let mut summary = ReleaseSummary::new(&self.descriptor.name, &self.descriptor.version);
        let mut journal = Journal::new();

        let outcome = self.release_all(&mut journal, &mut summary);
        let Err(error) = outcome else {
            self.say(format!("\n{}\n", "Release Finished".green().bold()));
            return Ok(summary);
        };

        self.say(format!(
            "\n{}\n{}\n",
            "Failed to make release!".red().bold(),
            format!("Error: {:#}", error).red()
        ));

        if !self.options.rollback {
            self.say(format!(
                "{}",
                "Rollback disabled, manifest files may need manual correction".yellow()
            ));
            return Err(error);
        }

        tracing::info!(steps = journal.len(), "rolling back");
        match journal.rollback() {
            Ok(()) => {
                self.say(format!("{}", "Manifest files restored".yellow()));
                Err(error)
            }
            Err(rollback_error) => Err(ReleaseError::RollbackFailed {
                cause: format!("{:#}", error),
                rollback: format!("{:#}", rollback_error),
            }
            .into()),
        }
    }

    fn release_all(&self, journal: &mut Journal, summary: &mut ReleaseSummary) -> Result<()> {
        let swapper = ManifestSwapper::new(self.set.clone());
        let first = Platform::ALL[0];

        if swapper.ensure(first)? {
            self.say(format!("Swapped manifests, {} is now active", first));
            journal.record_swap(self.set.clone());
        }
        self.say(format!("Version: {}", self.descriptor.version.cyan()));

        let active = self.set.active_path();
        for platform in Platform::ALL.iter().skip(1) {
            journal.move_file(&self.set.variant_path(*platform), &self.parked(*platform))?;
        }

        let mut current = first;
        loop {
            let artifact = self.release_platform(current, journal, summary)?;
            summary.artifacts.push(artifact);

            let Some(next) = current.next() else { break };
            self.say(format!("Swapping manifests, {} is now active", next));
            journal.move_file(&active, &self.parked(current))?;
            journal.move_file(&self.parked(next), &active)?;
            current = next;
        }

        self.say("Restoring manifest files");
        journal.move_file(&active, &self.set.variant_path(current))?;
        journal.move_file(&self.parked(first), &active)?;

        let state = swapper.state()?;
        debug_assert_eq!(state, ManifestState::for_platform(first));
        journal.commit();
        Ok(())
    }

    fn release_platform(
        &self,
        platform: Platform,
        journal: &mut Journal,
        summary: &mut ReleaseSummary,
    ) -> Result<ReleaseArtifact> {
        self.say(format!("\nMaking release for: {}\n", platform.to_string().bold()));

        let active = self.set.active_path();
        let patcher = ManifestPatcher::for_platform(self.descriptor, platform);

        self.say(format!("Patching manifest for {}", platform));
        let snapshot = patcher.patch_file(&active)?;
        journal.record_patch(&active, snapshot.clone());
        tracing::debug!(%platform, version = patcher.version_line(), "patched manifest");

        let output = self.paths.artifact_path(self.descriptor, platform);
        self.say(format!(
            "Zipping {} with {}",
            self.paths.source_dir.display(),
            self.archiver.name()
        ));
        let size_bytes = package_directory(self.archiver, &self.paths.source_dir, &output)
            .with_context(|| format!("Failed to archive {} release", platform))?;

        self.say("Undoing manifest patches");
        if !patcher.unpatch_file(&active, &snapshot)? {
            summary.add_warning(format!(
                "{} substitutions did not reverse cleanly, restored the original manifest text",
                platform
            ));
        }
        journal.complete_patch(&active);

        match extractor::manifest_entries(&output, self.set.active_name()) {
            Ok(manifests) if manifests.len() != 1 => summary.add_warning(format!(
                "{} archive contains {} manifest files: {}",
                platform,
                manifests.len(),
                manifests.join(", ")
            )),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %format!("{:#}", e), "could not inspect artifact"),
        }

        self.say(format!(
            "\nFinished making release for: {}\nAt: {}\n",
            platform,
            output.display().to_string().green()
        ));

        Ok(ReleaseArtifact {
            platform,
            path: output,
            size_bytes,
        })
    }

    fn parked(&self, platform: Platform) -> std::path::PathBuf {
        self.set.parked_path(self.paths.parking_dir(), platform)
    }

    fn say(&self, message: impl AsRef<str>) {
        if self.options.quiet {
            return;
        }
        let mut console = self.console.borrow_mut();
        if let Err(e) = writeln!(console, "{}", message.as_ref()) {
            tracing::warn!(error = %e, "could not write progress message");
        }
    }
}
