//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::annotate::MutationOutcome;
use crate::classify::Verdict;
use crate::pass::SiteOutcome;
use serde::{Deserialize, Serialize};

/// Per-file annotation summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct FileAnnotationReport {
    pub file: String,
    /// Call-like nodes visited
    pub call_sites: usize,
    /// Markers attached by this run
    pub annotated: usize,
    /// Eligible nodes that already carried a marker
    pub already_annotated: usize,
    /// Skipped: nested inside a function-like body
    pub not_top_level: usize,
    /// Skipped: one or more arguments
    pub has_arguments: usize,
    /// Skipped: denylisted helper callee
    pub denylisted: usize,
}

impl FileAnnotationReport {
    /// Summarize the outcomes of one file's annotation pass
    pub fn from_outcomes(file: String, outcomes: &[SiteOutcome]) -> Self {
        let mut report = FileAnnotationReport {
            file,
            call_sites: outcomes.len(),
            annotated: 0,
            already_annotated: 0,
            not_top_level: 0,
            has_arguments: 0,
            denylisted: 0,
        };

        for outcome in outcomes {
            match outcome.verdict {
                Verdict::Eligible => match outcome.mutation {
                    MutationOutcome::Applied => report.annotated += 1,
                    MutationOutcome::AlreadyMarked => report.already_annotated += 1,
                    MutationOutcome::Skipped => {}
                },
                Verdict::NotTopLevel => report.not_top_level += 1,
                Verdict::HasArguments => report.has_arguments += 1,
                Verdict::DenylistedCallee => report.denylisted += 1,
            }
        }

        report
    }

    /// True when this run attached at least one marker
    pub fn changed(&self) -> bool {
        self.annotated > 0
    }
}

/// Sort reports deterministically by file path
pub fn sort_reports(mut reports: Vec<FileAnnotationReport>) -> Vec<FileAnnotationReport> {
    reports.sort_by(|a, b| a.file.cmp(&b.file));
    reports
}

/// Render reports as text output
pub fn render_text(reports: &[FileAnnotationReport]) -> String {
    let mut output = String::new();

    // Header
    output.push_str(&format!(
        "{:<40} {:>6} {:>7} {:>9} {:>7} {:>6} {:>7}\n",
        "FILE", "CALLS", "MARKED", "EXISTING", "NESTED", "ARGS", "DENIED"
    ));

    for report in reports {
        output.push_str(&format!(
            "{:<40} {:>6} {:>7} {:>9} {:>7} {:>6} {:>7}\n",
            truncate_or_pad(&report.file, 40),
            report.call_sites,
            report.annotated,
            report.already_annotated,
            report.not_top_level,
            report.has_arguments,
            report.denylisted,
        ));
    }

    let total_marked: usize = reports.iter().map(|r| r.annotated).sum();
    output.push_str(&format!(
        "\n{} file(s), {} marker(s) attached\n",
        reports.len(),
        total_marked
    ));

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[FileAnnotationReport]) -> String {
    // Use serde_json with sorted keys for deterministic output
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.len() > width {
        format!("{}...", &s[..width.saturating_sub(3)])
    } else {
        format!("{:<width$}", s, width = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{CallKind, CallSite};
    use swc_common::DUMMY_SP;

    fn outcome(verdict: Verdict, mutation: MutationOutcome) -> SiteOutcome {
        SiteOutcome {
            site: CallSite {
                kind: CallKind::Call,
                callee: Some("foo".to_string()),
                arg_count: 0,
                span: DUMMY_SP,
            },
            verdict,
            mutation,
        }
    }

    #[test]
    fn test_report_counts_by_verdict() {
        let outcomes = vec![
            outcome(Verdict::Eligible, MutationOutcome::Applied),
            outcome(Verdict::Eligible, MutationOutcome::Applied),
            outcome(Verdict::Eligible, MutationOutcome::AlreadyMarked),
            outcome(Verdict::NotTopLevel, MutationOutcome::Skipped),
            outcome(Verdict::HasArguments, MutationOutcome::Skipped),
            outcome(Verdict::DenylistedCallee, MutationOutcome::Skipped),
        ];

        let report = FileAnnotationReport::from_outcomes("src/a.ts".to_string(), &outcomes);

        assert_eq!(report.call_sites, 6);
        assert_eq!(report.annotated, 2);
        assert_eq!(report.already_annotated, 1);
        assert_eq!(report.not_top_level, 1);
        assert_eq!(report.has_arguments, 1);
        assert_eq!(report.denylisted, 1);
        assert!(report.changed());
    }

    #[test]
    fn test_report_without_markers_is_unchanged() {
        let outcomes = vec![outcome(Verdict::NotTopLevel, MutationOutcome::Skipped)];
        let report = FileAnnotationReport::from_outcomes("src/a.ts".to_string(), &outcomes);
        assert!(!report.changed());
    }

    #[test]
    fn test_sort_reports_by_file() {
        let reports = vec![
            FileAnnotationReport::from_outcomes("src/z.ts".to_string(), &[]),
            FileAnnotationReport::from_outcomes("src/a.ts".to_string(), &[]),
            FileAnnotationReport::from_outcomes("src/m.ts".to_string(), &[]),
        ];

        let sorted = sort_reports(reports);
        let files: Vec<_> = sorted.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["src/a.ts", "src/m.ts", "src/z.ts"]);
    }

    #[test]
    fn test_render_text_includes_totals() {
        let outcomes = vec![outcome(Verdict::Eligible, MutationOutcome::Applied)];
        let reports = vec![FileAnnotationReport::from_outcomes(
            "src/a.ts".to_string(),
            &outcomes,
        )];

        let text = render_text(&reports);
        assert!(text.contains("src/a.ts"));
        assert!(text.contains("1 file(s), 1 marker(s) attached"));
    }

    #[test]
    fn test_render_json_is_deterministic() {
        let reports = vec![FileAnnotationReport::from_outcomes(
            "src/a.ts".to_string(),
            &[],
        )];

        let first = render_json(&reports);
        let second = render_json(&reports);
        assert_eq!(first, second);
        assert!(first.contains("\"file\": \"src/a.ts\""));
    }
}
