//! Target browser platforms

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Firefox,
    Chromium,
}

impl Platform {
    /// Release order. Firefox first, matching the starting manifest state.
    pub const ALL: [Platform; 2] = [Platform::Firefox, Platform::Chromium];

    /// Identifier used in artifact names and descriptor keys
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Firefox => "firefox",
            Platform::Chromium => "chromium",
        }
    }

    /// Suffix appended to the active manifest name when this platform's
    /// manifest is parked
    pub fn variant_suffix(&self) -> &'static str {
        match self {
            Platform::Firefox => "_firefox",
            Platform::Chromium => "_chrome",
        }
    }

    pub fn other(&self) -> Platform {
        match self {
            Platform::Firefox => Platform::Chromium,
            Platform::Chromium => Platform::Firefox,
        }
    }

    /// Platform released after this one, if any
    pub fn next(&self) -> Option<Platform> {
        let index = Self::ALL.iter().position(|p| p == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_order() {
        assert_eq!(Platform::ALL[0], Platform::Firefox);
        assert_eq!(Platform::Firefox.next(), Some(Platform::Chromium));
        assert_eq!(Platform::Chromium.next(), None);
    }

    #[test]
    fn test_variant_suffixes() {
        assert_eq!(Platform::Firefox.variant_suffix(), "_firefox");
        assert_eq!(Platform::Chromium.variant_suffix(), "_chrome");
        assert_eq!(Platform::Chromium.to_string(), "chromium");
    }
}
