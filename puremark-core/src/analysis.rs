//! Analysis orchestration - ties together parsing, the annotation pass, and
//! source rewriting

use crate::denylist::Denylist;
use crate::parser;
use crate::pass;
use crate::report::FileAnnotationReport;
use crate::rewrite;
use anyhow::{Context, Result};
use std::path::Path;
use swc_common::{sync::Lrc, SourceMap};

/// Result of annotating one file
#[derive(Debug)]
pub struct FileOutcome {
    pub report: FileAnnotationReport,
    /// Rewritten source text, present when at least one marker was attached
    pub rewritten: Option<String>,
}

/// Annotate a single source string
///
/// Parses, runs the classification pass, and splices markers into the
/// original text. The filename selects the parser syntax and labels the
/// report.
pub fn annotate_source(
    src: &str,
    source_map: &Lrc<SourceMap>,
    filename: &str,
    denylist: &Denylist,
) -> Result<FileOutcome> {
    // Parse source file (TypeScript or JavaScript)
    let parsed = parser::parse_source(src, source_map, filename)?;

    // Classify and mark every call-like node
    let outcomes = pass::run_pass(&parsed.module, &parsed.comments, denylist);

    // Splice markers into the original text
    let rewritten = rewrite::splice_markers(src, &parsed.source_file, &outcomes);

    let report = FileAnnotationReport::from_outcomes(filename.to_string(), &outcomes);

    Ok(FileOutcome { report, rewritten })
}

/// Annotate a TypeScript or JavaScript file
pub fn annotate_file(
    path: &Path,
    source_map: &Lrc<SourceMap>,
    denylist: &Denylist,
) -> Result<FileOutcome> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    annotate_source(&src, source_map, &path.to_string_lossy(), denylist)
}
