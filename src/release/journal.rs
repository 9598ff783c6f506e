//! Record of completed release steps, replayed backwards on failure

use crate::error::SwapError;
use crate::models::ManifestSet;
use crate::swapper::ManifestSwapper;
use crate::utils::move_file;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Step {
    Swapped(ManifestSet),
    Moved { from: PathBuf, to: PathBuf },
    Patched { path: PathBuf, snapshot: Vec<u8> },
}

#[derive(Debug, Default)]
pub struct Journal {
    steps: Vec<Step>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Move a file and remember how to move it back
    pub fn move_file(&mut self, from: &Path, to: &Path) -> Result<(), SwapError> {
        move_file(from, to)?;
        self.steps.push(Step::Moved {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        Ok(())
    }

    pub fn record_swap(&mut self, set: ManifestSet) {
        self.steps.push(Step::Swapped(set));
    }

    /// `snapshot` is the file's content before patching
    pub fn record_patch(&mut self, path: &Path, snapshot: Vec<u8>) {
        self.steps.push(Step::Patched {
            path: path.to_path_buf(),
            snapshot,
        });
    }

    /// Drop the pending patch for `path` once it has been reversed
    pub fn complete_patch(&mut self, path: &Path) {
        if let Some(index) = self
            .steps
            .iter()
            .rposition(|step| matches!(step, Step::Patched { path: p, .. } if p == path))
        {
            self.steps.remove(index);
        }
    }

    /// Forget every step; the run finished cleanly
    pub fn commit(&mut self) {
        self.steps.clear();
    }

    /// Undo steps newest first. Keeps going after a failed step and returns
    /// the first error seen.
    pub fn rollback(&mut self) -> Result<()> {
        let mut first_error = None;

        while let Some(step) = self.steps.pop() {
            tracing::debug!(?step, "rolling back");
            let result = undo(&step);
            if let Err(e) = result {
                tracing::warn!(error = %format!("{:#}", e), "rollback step failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn undo(step: &Step) -> Result<()> {
    match step {
        Step::Swapped(set) => {
            ManifestSwapper::new(set.clone())
                .swap()
                .context("Failed to swap manifests back")?;
        }
        Step::Moved { from, to } => {
            move_file(to, from)?;
        }
        Step::Patched { path, snapshot } => {
            fs::write(path, snapshot)
                .with_context(|| format!("Failed to restore {}", path.display()))?;
        }
    }
    Ok(())
}
