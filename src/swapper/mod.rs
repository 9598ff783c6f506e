//! Rename-based switching between the Firefox and Chromium manifests
//!
//! The active manifest is whichever platform's variant file is absent. A swap
//! parks the active manifest under its own variant name and moves the other
//! variant into the active slot.

use crate::error::SwapError;
use crate::models::{ManifestSet, ManifestState, Platform};
use crate::utils::move_file;

#[derive(Debug, Clone)]
pub struct ManifestSwapper {
    set: ManifestSet,
}

impl ManifestSwapper {
    pub fn new(set: ManifestSet) -> Self {
        Self { set }
    }

    pub fn manifest_set(&self) -> &ManifestSet {
        &self.set
    }

    /// True when the chrome variant is parked, i.e. Firefox is loaded
    pub fn is_firefox_active(&self) -> bool {
        self.set.variant_path(Platform::Chromium).exists()
    }

    /// True when the firefox variant is parked, i.e. Chromium is loaded
    pub fn is_chrome_active(&self) -> bool {
        self.set.variant_path(Platform::Firefox).exists()
    }

    pub fn state(&self) -> Result<ManifestState, SwapError> {
        self.set.detect_state()
    }

    /// Swap the active manifest for the parked one and return the new state.
    /// The state is checked before any rename so a corrupt file set is left
    /// untouched.
    pub fn swap(&self) -> Result<ManifestState, SwapError> {
        let current = self.state()?;
        let loaded = current.active_platform();
        let parked = loaded.other();

        let active = self.set.active_path();
        move_file(&active, &self.set.variant_path(loaded))?;
        if let Err(e) = move_file(&self.set.variant_path(parked), &active) {
            // put the first rename back so the set stays in `current`
            move_file(&self.set.variant_path(loaded), &active)?;
            return Err(e);
        }

        let next = current.swapped();
        tracing::info!(from = %current, to = %next, "swapped manifests");
        Ok(next)
    }

    /// Make `platform`'s manifest active, swapping only when needed.
    /// Returns whether a swap happened.
    pub fn ensure(&self, platform: Platform) -> Result<bool, SwapError> {
        if self.state()? == ManifestState::for_platform(platform) {
            return Ok(false);
        }
        self.swap()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_MANIFEST_NAME;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const FIREFOX: &str = r#"{ "browser_specific_settings": {} }"#;
    const CHROME: &str = r#"{ "minimum_chrome_version": "100" }"#;

    fn firefox_active(dir: &TempDir) -> ManifestSwapper {
        let set = ManifestSet::new(dir.path(), DEFAULT_MANIFEST_NAME);
        fs::write(set.active_path(), FIREFOX).unwrap();
        fs::write(set.variant_path(Platform::Chromium), CHROME).unwrap();
        ManifestSwapper::new(set)
    }

    #[test]
    fn test_variant_checks() {
        let temp_dir = TempDir::new().unwrap();
        let swapper = firefox_active(&temp_dir);
        assert!(swapper.is_firefox_active());
        assert!(!swapper.is_chrome_active());
    }

    #[test]
    fn test_swap_both_directions() {
        let temp_dir = TempDir::new().unwrap();
        let swapper = firefox_active(&temp_dir);
        let set = swapper.manifest_set().clone();

        assert_eq!(swapper.swap().unwrap(), ManifestState::ChromeActive);
        assert_eq!(fs::read_to_string(set.active_path()).unwrap(), CHROME);
        assert_eq!(fs::read_to_string(set.variant_path(Platform::Firefox)).unwrap(), FIREFOX);
        assert!(!set.variant_path(Platform::Chromium).exists());

        assert_eq!(swapper.swap().unwrap(), ManifestState::FirefoxActive);
        assert_eq!(fs::read_to_string(set.active_path()).unwrap(), FIREFOX);
        assert_eq!(fs::read_to_string(set.variant_path(Platform::Chromium)).unwrap(), CHROME);
    }

    #[test]
    fn test_swap_without_variants_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let set = ManifestSet::new(temp_dir.path(), DEFAULT_MANIFEST_NAME);
        fs::write(set.active_path(), FIREFOX).unwrap();
        let swapper = ManifestSwapper::new(set.clone());

        let err = swapper.swap().unwrap_err();
        assert!(matches!(err, SwapError::NoVariant { .. }));

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read_to_string(set.active_path()).unwrap(), FIREFOX);
    }

    #[test]
    fn test_ensure_is_noop_when_already_active() {
        let temp_dir = TempDir::new().unwrap();
        let swapper = firefox_active(&temp_dir);

        assert!(!swapper.ensure(Platform::Firefox).unwrap());
        assert!(swapper.ensure(Platform::Chromium).unwrap());
        assert_eq!(swapper.state().unwrap(), ManifestState::ChromeActive);
    }
}
