//! Core data models for release packaging

pub mod platform;
pub mod descriptor;
pub mod manifest_set;
pub mod artifact;

pub use platform::*;
pub use descriptor::*;
pub use manifest_set::*;
pub use artifact::*;
