//! Release artifacts produced by a run

use super::Platform;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArtifact {
    pub platform: Platform,
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseSummary {
    pub name: String,
    pub version: String,
    pub artifacts: Vec<ReleaseArtifact>,
    pub warnings: Vec<String>,
}

impl ReleaseSummary {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
