//! The three manifest file identities and the state they encode

use super::Platform;
use crate::error::SwapError;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";

/// Which platform's manifest currently occupies the active slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestState {
    FirefoxActive,
    ChromeActive,
}

impl ManifestState {
    pub fn active_platform(&self) -> Platform {
        match self {
            ManifestState::FirefoxActive => Platform::Firefox,
            ManifestState::ChromeActive => Platform::Chromium,
        }
    }

    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Firefox => ManifestState::FirefoxActive,
            Platform::Chromium => ManifestState::ChromeActive,
        }
    }

    /// The only transition
    pub fn swapped(&self) -> Self {
        Self::for_platform(self.active_platform().other())
    }
}

impl fmt::Display for ManifestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} manifest active", self.active_platform())
    }
}

/// `manifest.json`, `manifest.json_chrome` and `manifest.json_firefox`
/// sharing one directory
#[derive(Debug, Clone)]
pub struct ManifestSet {
    dir: PathBuf,
    active_name: String,
}

impl ManifestSet {
    pub fn new(dir: impl Into<PathBuf>, active_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            active_name: active_name.into(),
        }
    }

    pub fn active_name(&self) -> &str {
        &self.active_name
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(&self.active_name)
    }

    pub fn variant_name(&self, platform: Platform) -> String {
        format!("{}{}", self.active_name, platform.variant_suffix())
    }

    pub fn variant_path(&self, platform: Platform) -> PathBuf {
        self.dir.join(self.variant_name(platform))
    }

    /// Location a variant is parked at while the source directory is archived
    pub fn parked_path(&self, parking_dir: &Path, platform: Platform) -> PathBuf {
        parking_dir.join(self.variant_name(platform))
    }

    /// Derive the state from the files on disk. Anything other than
    /// "active present, exactly one variant present" is corruption.
    pub fn detect_state(&self) -> Result<ManifestState, SwapError> {
        let active = self.active_path();
        let chrome = self.variant_path(Platform::Chromium);
        let firefox = self.variant_path(Platform::Firefox);

        if !active.is_file() {
            return Err(SwapError::ActiveMissing { path: active });
        }

        match (chrome.is_file(), firefox.is_file()) {
            (true, false) => Ok(ManifestState::FirefoxActive),
            (false, true) => Ok(ManifestState::ChromeActive),
            (false, false) => Err(SwapError::NoVariant { chrome, firefox }),
            (true, true) => Err(SwapError::BothVariants { chrome, firefox }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_variant_paths() {
        let set = ManifestSet::new("/ext/src", DEFAULT_MANIFEST_NAME);
        assert_eq!(set.active_path(), PathBuf::from("/ext/src/manifest.json"));
        assert_eq!(
            set.variant_path(Platform::Chromium),
            PathBuf::from("/ext/src/manifest.json_chrome")
        );
        assert_eq!(
            set.parked_path(Path::new("/ext"), Platform::Firefox),
            PathBuf::from("/ext/manifest.json_firefox")
        );
    }

    #[test]
    fn test_detect_state() {
        let temp_dir = TempDir::new().unwrap();
        let set = ManifestSet::new(temp_dir.path(), DEFAULT_MANIFEST_NAME);

        assert!(matches!(set.detect_state(), Err(SwapError::ActiveMissing { .. })));

        fs::write(set.active_path(), "{}").unwrap();
        assert!(matches!(set.detect_state(), Err(SwapError::NoVariant { .. })));

        fs::write(set.variant_path(Platform::Chromium), "{}").unwrap();
        assert_eq!(set.detect_state().unwrap(), ManifestState::FirefoxActive);

        fs::write(set.variant_path(Platform::Firefox), "{}").unwrap();
        assert!(matches!(set.detect_state(), Err(SwapError::BothVariants { .. })));

        fs::remove_file(set.variant_path(Platform::Chromium)).unwrap();
        assert_eq!(set.detect_state().unwrap(), ManifestState::ChromeActive);
    }

    #[test]
    fn test_state_transition() {
        assert_eq!(ManifestState::FirefoxActive.swapped(), ManifestState::ChromeActive);
        assert_eq!(ManifestState::ChromeActive.swapped(), ManifestState::FirefoxActive);
    }
}
