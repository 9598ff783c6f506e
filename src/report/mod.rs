//! Report generation

pub mod generator;

use crate::models::ReleaseSummary;
use anyhow::Result;

pub fn generate_report(summary: &ReleaseSummary) -> Result<String> {
    generator::generate_markdown_report(summary)
}
