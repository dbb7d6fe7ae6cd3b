//! Puremark core library - pure-call annotation for tree-shaking

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Classification is strictly per call site
// - No global mutable state
// - No randomness, clocks, threads, or async
// - Deterministic traversal order must be explicit
// - Identical input yields byte-for-byte identical output

pub mod analysis;
pub mod annotate;
pub mod classify;
pub mod config;
pub mod denylist;
pub mod parser;
pub mod pass;
pub mod report;
pub mod rewrite;

pub use annotate::{MutationOutcome, PURE_COMMENT, PURE_MARKER};
pub use classify::{classify, CallKind, CallSite, LexicalContext, Verdict};
pub use denylist::Denylist;
pub use report::{render_json, render_text, sort_reports, FileAnnotationReport};

use anyhow::{Context, Result};
use globset::GlobSet;
use std::path::{Path, PathBuf};
use swc_common::{sync::Lrc, SourceMap};

/// Options for a path-level annotation run
#[derive(Default)]
pub struct AnnotateOptions {
    pub denylist: Denylist,
    /// Compiled exclude patterns applied during directory walks
    pub exclude: Option<GlobSet>,
}

/// One annotated file with its filesystem location
#[derive(Debug)]
pub struct PathOutcome {
    pub path: PathBuf,
    pub report: FileAnnotationReport,
    /// Rewritten source text, present when at least one marker was attached
    pub rewritten: Option<String>,
}

/// Annotate a file or directory tree
///
/// Collects supported source files in deterministic order, annotates each,
/// and returns per-file outcomes. File contents are not written back; the
/// caller decides what to do with the rewritten text.
pub fn annotate_path(path: &Path, options: &AnnotateOptions) -> Result<Vec<PathOutcome>> {
    let cm: Lrc<SourceMap> = Default::default();
    let mut results = Vec::new();

    // Collect TypeScript and JavaScript files
    let source_files = collect_source_files(path, options.exclude.as_ref())?;

    // Annotate each file
    for file_path in source_files {
        let outcome = analysis::annotate_file(&file_path, &cm, &options.denylist)
            .with_context(|| format!("Failed to annotate file: {}", file_path.display()))?;
        results.push(PathOutcome {
            path: file_path,
            report: outcome.report,
            rewritten: outcome.rewritten,
        });
    }

    Ok(results)
}

/// Check if a file is a supported source file
fn is_supported_source_file(filename: &str) -> bool {
    // TypeScript files (.ts, .mts, .cts) but not declaration files (.d.ts)
    let is_ts = (filename.ends_with(".ts") || filename.ends_with(".mts") || filename.ends_with(".cts"))
        && !filename.ends_with(".d.ts");

    // TSX files (.tsx, .mtsx, .ctsx)
    let is_tsx = filename.ends_with(".tsx") || filename.ends_with(".mtsx") || filename.ends_with(".ctsx");

    // JavaScript files (.js, .mjs, .cjs)
    let is_js = filename.ends_with(".js") || filename.ends_with(".mjs") || filename.ends_with(".cjs");

    // JSX files (.jsx, .mjsx, .cjsx)
    let is_jsx = filename.ends_with(".jsx") || filename.ends_with(".mjsx") || filename.ends_with(".cjsx");

    is_ts || is_tsx || is_js || is_jsx
}

/// Collect all TypeScript, JavaScript, JSX, and TSX files from a path (file or directory)
///
/// Supported extensions:
/// - TypeScript: .ts, .mts, .cts (excludes .d.ts declaration files)
/// - TSX: .tsx, .mtsx, .ctsx
/// - JavaScript: .js, .mjs, .cjs
/// - JSX: .jsx, .mjsx, .cjsx
fn collect_source_files(path: &Path, exclude: Option<&GlobSet>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            if is_supported_source_file(filename) {
                files.push(path.to_path_buf());
            }
        }
    } else if path.is_dir() {
        collect_source_files_recursive(path, exclude, &mut files)?;
    }

    // Sort files for deterministic order
    files.sort();

    Ok(files)
}

/// Recursively collect source files from a directory
fn collect_source_files_recursive(
    dir: &Path,
    exclude: Option<&GlobSet>,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    use std::ffi::OsStr;

    for entry_result in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry: std::fs::DirEntry = entry_result?;
        let path = entry.path();

        if let Some(exclude) = exclude {
            if exclude.is_match(&path) {
                continue;
            }
        }

        if path.is_dir() {
            // Skip node_modules and other common non-source directories
            if let Some(name) = path.file_name().and_then(|n: &OsStr| n.to_str()) {
                if name == "node_modules" || name.starts_with('.') {
                    continue;
                }
            }
            collect_source_files_recursive(&path, exclude, files)?;
        } else if path.is_file() {
            if let Some(filename) = path.file_name().and_then(|n: &OsStr| n.to_str()) {
                if is_supported_source_file(filename) {
                    files.push(path);
                }
            }
        }
    }

    Ok(())
}
