//! Dual-platform extension release CLI

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webext_release::error::archiver_hint;
use webext_release::{
    check_release, make_release, manifest_status, swap_manifests, ArchiverKind, ReleaseOptions,
};

#[derive(Parser)]
#[command(name = "webext-release")]
#[command(about = "Package a Firefox/Chromium extension into versioned release archives", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProjectArgs {
    /// Project root containing the descriptor and source directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Extension source directory, relative to the root
    #[arg(long, default_value = "src")]
    src: PathBuf,

    /// Name of the active manifest file
    #[arg(long, default_value = "manifest.json")]
    manifest: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a release archive for every platform
    Build {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output directory for the archives, relative to the root
        #[arg(long, default_value = "releases")]
        releases: PathBuf,

        /// Package descriptor, relative to the root
        #[arg(long, default_value = "package.json")]
        descriptor: PathBuf,

        /// Archiver: auto, 7z, zip or builtin
        #[arg(short, long, default_value_t = ArchiverKind::Auto)]
        archiver: ArchiverKind,

        /// Leave files as they are when a release fails
        #[arg(long)]
        no_rollback: bool,

        /// Write a Markdown release report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Swap the active manifest with the parked one
    Swap {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Show which platform's manifest is active
    Status {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Run the pre-release checks without changing anything
    Check {
        #[command(flatten)]
        project: ProjectArgs,

        #[arg(long, default_value = "package.json")]
        descriptor: PathBuf,

        #[arg(short, long, default_value_t = ArchiverKind::Auto)]
        archiver: ArchiverKind,
    },
}

impl ProjectArgs {
    fn into_options(self) -> ReleaseOptions {
        ReleaseOptions {
            project_root: self.root,
            source_dir: self.src,
            manifest_name: self.manifest,
            ..Default::default()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "webext_release=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(context: &str, error: anyhow::Error) -> ! {
    eprintln!("{}", format!("❌ {}", context).red().bold());
    eprintln!("{}", format!("Error: {:#}", error).red());
    if let Some(hint) = archiver_hint(&error) {
        eprintln!("{}", format!("Hint: {}", hint).yellow());
    }
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            project,
            releases,
            descriptor,
            archiver,
            no_rollback,
            report,
            quiet,
        } => {
            let options = ReleaseOptions {
                releases_dir: releases,
                descriptor,
                archiver,
                rollback: !no_rollback,
                quiet,
                ..project.into_options()
            };

            match make_release(&options) {
                Ok(summary) => {
                    if !quiet {
                        println!("{}", "✅ Release completed successfully!".green().bold());
                        println!();
                        println!("📦 {} v{}", summary.name, summary.version);
                        for artifact in &summary.artifacts {
                            println!("  - {}: {}", artifact.platform, artifact.path.display());
                        }
                    }

                    if !summary.warnings.is_empty() {
                        println!();
                        println!("{}", "⚠️  Warnings:".yellow().bold());
                        for warning in &summary.warnings {
                            println!("  - {}", warning);
                        }
                    }

                    if let Some(report_path) = report {
                        let written = webext_release::report::generate_report(&summary)
                            .and_then(|content| Ok(std::fs::write(&report_path, content)?));
                        match written {
                            Ok(()) => {
                                if !quiet {
                                    println!("  - Report: {}", report_path.display());
                                }
                            }
                            Err(e) => fail("Failed to write report", e),
                        }
                    }
                }
                Err(e) => fail("Release failed!", e),
            }
        }

        Commands::Swap { project } => match swap_manifests(&project.into_options()) {
            Ok(state) => println!("{}", format!("🔄 Swapped, {}", state).green()),
            Err(e) => fail("Swap failed!", e),
        },

        Commands::Status { project } => match manifest_status(&project.into_options()) {
            Ok(state) => println!("{}", state),
            Err(e) => fail("Manifest files are in an unexpected state", e),
        },

        Commands::Check {
            project,
            descriptor,
            archiver,
        } => {
            let options = ReleaseOptions {
                descriptor,
                archiver,
                ..project.into_options()
            };
            match check_release(&options) {
                Ok(state) => println!("{}", format!("✅ Ready to release ({})", state).green()),
                Err(e) => fail("Check failed!", e),
            }
        }
    }
}
