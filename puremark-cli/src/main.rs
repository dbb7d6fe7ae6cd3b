//! Puremark CLI - command-line interface for pure-call annotation

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use puremark_core::config;
use puremark_core::{annotate_path, render_json, render_text, sort_reports, AnnotateOptions};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "puremark")]
#[command(about = "Marks side-effect-free top-level calls with /*#__PURE__*/ annotations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate source files
    Annotate {
        /// Path to source file or directory
        path: PathBuf,

        /// Rewrite files in place
        #[arg(long)]
        write: bool,

        /// Report output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Explicit config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Additional denylisted callee name (repeatable)
        #[arg(long = "deny", value_name = "NAME")]
        deny: Vec<String>,

        /// Glob pattern for files to exclude (repeatable)
        #[arg(long = "exclude", value_name = "GLOB")]
        exclude: Vec<String>,
    },
    /// Report pending annotations without touching files (exit 1 if any)
    Check {
        /// Path to source file or directory
        path: PathBuf,

        /// Report output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Explicit config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Additional denylisted callee name (repeatable)
        #[arg(long = "deny", value_name = "NAME")]
        deny: Vec<String>,

        /// Glob pattern for files to exclude (repeatable)
        #[arg(long = "exclude", value_name = "GLOB")]
        exclude: Vec<String>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate {
            path,
            write,
            format,
            config,
            deny,
            exclude,
        } => {
            let normalized_path = normalize_path(path)?;
            let options = build_options(&normalized_path, config.as_deref(), &deny, &exclude)?;

            if !write && normalized_path.is_dir() {
                anyhow::bail!(
                    "directory targets require --write (or use `puremark check` for a dry run)"
                );
            }

            let outcomes = annotate_path(&normalized_path, &options)?;

            if write {
                for outcome in &outcomes {
                    if let Some(rewritten) = &outcome.rewritten {
                        std::fs::write(&outcome.path, rewritten).with_context(|| {
                            format!("failed to write file: {}", outcome.path.display())
                        })?;
                    }
                }
                render_reports(outcomes, format);
            } else {
                // Single file, no --write: emit the annotated source itself
                match outcomes.into_iter().next() {
                    Some(outcome) => match outcome.rewritten {
                        Some(rewritten) => print!("{}", rewritten),
                        None => {
                            let original = std::fs::read_to_string(&outcome.path)
                                .with_context(|| {
                                    format!("failed to read file: {}", outcome.path.display())
                                })?;
                            print!("{}", original);
                        }
                    },
                    None => anyhow::bail!(
                        "not a supported source file: {}",
                        normalized_path.display()
                    ),
                }
            }
        }
        Commands::Check {
            path,
            format,
            config,
            deny,
            exclude,
        } => {
            let normalized_path = normalize_path(path)?;
            let options = build_options(&normalized_path, config.as_deref(), &deny, &exclude)?;

            let outcomes = annotate_path(&normalized_path, &options)?;
            let pending = outcomes.iter().filter(|o| o.rewritten.is_some()).count();

            render_reports(outcomes, format);

            if pending > 0 {
                eprintln!("{} file(s) need pure markers", pending);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Normalize to an absolute path and validate existence
fn normalize_path(path: PathBuf) -> anyhow::Result<PathBuf> {
    let normalized = if path.is_relative() {
        std::env::current_dir()?.join(&path)
    } else {
        path
    };

    if !normalized.exists() {
        anyhow::bail!("Path does not exist: {}", normalized.display());
    }

    Ok(normalized)
}

/// Build annotation options from config discovery and CLI flags
fn build_options(
    path: &Path,
    config_path: Option<&Path>,
    deny: &[String],
    exclude: &[String],
) -> anyhow::Result<AnnotateOptions> {
    // Config discovery starts from the target's directory
    let project_root = if path.is_file() {
        path.parent()
            .ok_or_else(|| anyhow::anyhow!("invalid file path"))?
            .to_path_buf()
    } else {
        path.to_path_buf()
    };

    let denylist = config::load_and_resolve(&project_root, config_path, deny)
        .context("failed to load configuration")?;

    let exclude_set = config::compile_excludes(exclude)?;

    Ok(AnnotateOptions {
        denylist,
        exclude: exclude_set,
    })
}

/// Render sorted per-file reports in the requested format
fn render_reports(outcomes: Vec<puremark_core::PathOutcome>, format: OutputFormat) {
    let reports = sort_reports(outcomes.into_iter().map(|o| o.report).collect());

    match format {
        OutputFormat::Text => {
            print!("{}", render_text(&reports));
        }
        OutputFormat::Json => {
            println!("{}", render_json(&reports));
        }
    }
}
