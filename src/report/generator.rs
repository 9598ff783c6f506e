//! Markdown summary of a release run

use crate::models::ReleaseSummary;
use anyhow::Result;
use std::fmt::Write;

pub fn generate_markdown_report(summary: &ReleaseSummary) -> Result<String> {
    let mut report = String::new();

    writeln!(report, "# Release Report\n")?;

    writeln!(report, "## Summary\n")?;
    writeln!(report, "- **Extension**: {}", summary.name)?;
    writeln!(report, "- **Version**: {}", summary.version)?;
    writeln!(report, "- **Artifacts**: {}\n", summary.artifacts.len())?;

    if !summary.artifacts.is_empty() {
        writeln!(report, "## Artifacts\n")?;
        writeln!(report, "| Platform | File | Size |")?;
        writeln!(report, "|----------|------|------|")?;
        for artifact in &summary.artifacts {
            let file_name = artifact
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| artifact.path.display().to_string());
            writeln!(
                report,
                "| {} | `{}` | {} |",
                artifact.platform,
                file_name,
                format_size(artifact.size_bytes)
            )?;
        }
        writeln!(report)?;
    }

    if !summary.warnings.is_empty() {
        writeln!(report, "## Warnings\n")?;
        for warning in &summary.warnings {
            writeln!(report, "- {}", warning)?;
        }
        writeln!(report)?;
    }

    Ok(report)
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KIB {
        format!("{} B", bytes)
    } else if bytes_f < KIB * KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{:.1} MiB", bytes_f / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, ReleaseArtifact};
    use std::path::PathBuf;

    #[test]
    fn test_report_lists_artifacts_and_warnings() {
        let mut summary = ReleaseSummary::new("ext", "1.2.3");
        summary.artifacts.push(ReleaseArtifact {
            platform: Platform::Firefox,
            path: PathBuf::from("/out/ext firefox v1.2.3.zip"),
            size_bytes: 2048,
        });
        summary.add_warning("chromium substitutions did not reverse cleanly");

        let report = generate_markdown_report(&summary).unwrap();
        assert!(report.contains("- **Version**: 1.2.3"));
        assert!(report.contains("| firefox | `ext firefox v1.2.3.zip` | 2.0 KiB |"));
        assert!(report.contains("## Warnings"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
