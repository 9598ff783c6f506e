//! Parsing for the package descriptor

pub mod descriptor;

pub use descriptor::parse_descriptor;
