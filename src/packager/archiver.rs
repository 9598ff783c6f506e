//! Archivers turning the extension source directory into a zip artifact

use super::builder::create_zip_from_directory;
use crate::error::ArchiveError;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::str::FromStr;

pub trait Archiver {
    fn name(&self) -> &str;

    /// Whether the archiver can run on this host
    fn is_available(&self) -> bool;

    /// Write a zip of `source_dir`'s contents to `output`. `output` must not
    /// exist yet; command-line tools append to existing archives.
    fn create(&self, output: &Path, source_dir: &Path) -> Result<(), ArchiveError>;
}

/// 7-Zip "add to archive", the Windows default
#[derive(Debug, Clone)]
pub struct SevenZipArchiver {
    program: String,
}

impl Default for SevenZipArchiver {
    fn default() -> Self {
        Self { program: "7z".to_string() }
    }
}

impl Archiver for SevenZipArchiver {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        probe(&self.program, &["i"])
    }

    fn create(&self, output: &Path, source_dir: &Path) -> Result<(), ArchiveError> {
        let mut command = Command::new(&self.program);
        command
            .arg("a")
            .arg("-tzip")
            .arg(output)
            .arg("*")
            .current_dir(source_dir);
        run_tool(&self.program, command)
    }
}

/// Info-ZIP `zip`, the default everywhere but Windows
#[derive(Debug, Clone)]
pub struct ZipCliArchiver {
    program: String,
}

impl Default for ZipCliArchiver {
    fn default() -> Self {
        Self { program: "zip".to_string() }
    }
}

impl Archiver for ZipCliArchiver {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        probe(&self.program, &["-v"])
    }

    fn create(&self, output: &Path, source_dir: &Path) -> Result<(), ArchiveError> {
        let mut command = Command::new(&self.program);
        command
            .arg("-r")
            .arg("-X")
            .arg("-q")
            .arg(output)
            .arg(".")
            .current_dir(source_dir);
        run_tool(&self.program, command)
    }
}

/// In-process zip writer; needs no external tool
#[derive(Debug, Clone, Default)]
pub struct BuiltinArchiver;

impl Archiver for BuiltinArchiver {
    fn name(&self) -> &str {
        "builtin"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create(&self, output: &Path, source_dir: &Path) -> Result<(), ArchiveError> {
        create_zip_from_directory(source_dir, output)
    }
}

fn probe(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Run synchronously with inherited stdout/stderr
fn run_tool(program: &str, mut command: Command) -> Result<(), ArchiveError> {
    tracing::debug!(?command, "running archiver");
    let status = command.status().map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArchiveError::ToolMissing { tool: program.to_string() }
        } else {
            ArchiveError::Spawn { tool: program.to_string(), source }
        }
    })?;

    if !status.success() {
        return Err(ArchiveError::Failed { tool: program.to_string(), status });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiverKind {
    /// 7-Zip on Windows, `zip` elsewhere
    #[default]
    Auto,
    SevenZip,
    Zip,
    Builtin,
}

impl ArchiverKind {
    /// Replace `Auto` with the host's choice
    pub fn resolve(self) -> ArchiverKind {
        match self {
            ArchiverKind::Auto if cfg!(windows) => ArchiverKind::SevenZip,
            ArchiverKind::Auto => ArchiverKind::Zip,
            other => other,
        }
    }

    pub fn build(self) -> Box<dyn Archiver> {
        match self.resolve() {
            ArchiverKind::SevenZip => Box::new(SevenZipArchiver::default()),
            ArchiverKind::Builtin => Box::new(BuiltinArchiver),
            ArchiverKind::Zip | ArchiverKind::Auto => Box::new(ZipCliArchiver::default()),
        }
    }
}

impl FromStr for ArchiverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ArchiverKind::Auto),
            "7z" | "7zip" | "7-zip" => Ok(ArchiverKind::SevenZip),
            "zip" => Ok(ArchiverKind::Zip),
            "builtin" => Ok(ArchiverKind::Builtin),
            other => Err(format!(
                "unknown archiver `{}` (expected auto, 7z, zip or builtin)",
                other
            )),
        }
    }
}

impl fmt::Display for ArchiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiverKind::Auto => "auto",
            ArchiverKind::SevenZip => "7z",
            ArchiverKind::Zip => "zip",
            ArchiverKind::Builtin => "builtin",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("auto", ArchiverKind::Auto)]
    #[test_case("7z", ArchiverKind::SevenZip)]
    #[test_case("7-Zip", ArchiverKind::SevenZip)]
    #[test_case("zip", ArchiverKind::Zip)]
    #[test_case("BUILTIN", ArchiverKind::Builtin)]
    fn test_parse_kind(input: &str, expected: ArchiverKind) {
        assert_eq!(input.parse::<ArchiverKind>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert!("tar".parse::<ArchiverKind>().is_err());
    }

    #[test]
    fn test_auto_resolves_by_host() {
        let resolved = ArchiverKind::Auto.resolve();
        if cfg!(windows) {
            assert_eq!(resolved, ArchiverKind::SevenZip);
        } else {
            assert_eq!(resolved, ArchiverKind::Zip);
        }
        assert_eq!(ArchiverKind::Builtin.resolve(), ArchiverKind::Builtin);
    }

    #[test]
    fn test_missing_tool_reported() {
        let archiver = ZipCliArchiver { program: "definitely-not-a-zip-tool".to_string() };
        assert!(!archiver.is_available());

        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = archiver
            .create(&temp_dir.path().join("out.zip"), temp_dir.path())
            .unwrap_err();
        assert!(matches!(err, ArchiveError::ToolMissing { .. }));
    }
}
