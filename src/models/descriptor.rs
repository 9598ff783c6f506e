//! Package descriptor (`package.json`) data structures

use super::Platform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub extension_manifest_config: HashMap<String, PlatformConfig>,

    /// Remaining package fields, carried but unused
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    #[serde(default)]
    pub replace_all: Vec<Substitution>,
}

/// Literal `from` -> `to` replacement applied to the active manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl PackageDescriptor {
    /// Substitution pairs configured for a platform, empty when absent
    pub fn substitutions(&self, platform: Platform) -> &[Substitution] {
        self.extension_manifest_config
            .get(platform.id())
            .map(|config| config.replace_all.as_slice())
            .unwrap_or(&[])
    }

    /// File name of the release archive for a platform
    pub fn artifact_file_name(&self, platform: Platform) -> String {
        format!("{} {} v{}.zip", self.name, platform, self.version)
    }
}
