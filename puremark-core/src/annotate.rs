//! Pure-marker attachment
//!
//! Global invariants enforced:
//! - At most one marker per source position
//! - Re-running over already-annotated output attaches nothing
//! - Marker text is a byte-exact protocol token, not free text

use crate::classify::Verdict;
use swc_common::{
    comments::{Comment, CommentKind, Comments, SingleThreadedComments},
    BytePos, Span,
};

/// Comment payload emitted as `/*#__PURE__*/`
///
/// Downstream minifiers match this token case-sensitively with no
/// surrounding whitespace.
pub const PURE_MARKER: &str = "#__PURE__";

/// Alternate payload recognized by the same minifiers
const PURE_MARKER_ALT: &str = "@__PURE__";

/// Full inline text of the marker as it appears in source
pub const PURE_COMMENT: &str = "/*#__PURE__*/";

/// Outcome of attempting to annotate one call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Marker attached
    Applied,
    /// Eligible, but the position already carries a marker
    AlreadyMarked,
    /// Verdict was not `Eligible`; node untouched
    Skipped,
}

/// Check whether `pos` already carries a pure marker as a leading comment
pub fn has_pure_marker(comments: &SingleThreadedComments, pos: BytePos) -> bool {
    comments
        .get_leading(pos)
        .map(|list| list.iter().any(is_pure_marker))
        .unwrap_or(false)
}

fn is_pure_marker(comment: &Comment) -> bool {
    if comment.kind != CommentKind::Block {
        return false;
    }
    let text = comment.text.trim();
    text == PURE_MARKER || text == PURE_MARKER_ALT
}

/// Attach a pure marker to the node when the verdict allows it
///
/// The marker is a zero-width leading block comment at the node's low
/// position. Non-eligible verdicts leave the tree untouched.
pub fn annotate(
    span: Span,
    verdict: Verdict,
    comments: &SingleThreadedComments,
) -> MutationOutcome {
    if verdict != Verdict::Eligible {
        return MutationOutcome::Skipped;
    }

    if has_pure_marker(comments, span.lo) {
        return MutationOutcome::AlreadyMarked;
    }

    comments.add_leading(
        span.lo,
        Comment {
            kind: CommentKind::Block,
            span: Span::new(span.lo, span.lo),
            text: PURE_MARKER.into(),
        },
    );

    MutationOutcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_at(lo: u32) -> Span {
        Span::new(BytePos(lo), BytePos(lo + 5))
    }

    #[test]
    fn test_inline_comment_matches_marker_payload() {
        assert_eq!(PURE_COMMENT, format!("/*{}*/", PURE_MARKER));
    }

    #[test]
    fn test_eligible_verdict_attaches_marker() {
        let comments = SingleThreadedComments::default();
        let span = span_at(10);

        let outcome = annotate(span, Verdict::Eligible, &comments);

        assert_eq!(outcome, MutationOutcome::Applied);
        assert!(has_pure_marker(&comments, span.lo));
    }

    #[test]
    fn test_non_eligible_verdicts_leave_node_untouched() {
        let comments = SingleThreadedComments::default();
        let span = span_at(10);

        for verdict in [
            Verdict::NotTopLevel,
            Verdict::HasArguments,
            Verdict::DenylistedCallee,
        ] {
            let outcome = annotate(span, verdict, &comments);
            assert_eq!(outcome, MutationOutcome::Skipped);
        }

        assert!(!has_pure_marker(&comments, span.lo));
    }

    #[test]
    fn test_second_annotation_does_not_duplicate() {
        let comments = SingleThreadedComments::default();
        let span = span_at(10);

        assert_eq!(
            annotate(span, Verdict::Eligible, &comments),
            MutationOutcome::Applied
        );
        assert_eq!(
            annotate(span, Verdict::Eligible, &comments),
            MutationOutcome::AlreadyMarked
        );

        let leading = comments.get_leading(span.lo).unwrap();
        assert_eq!(leading.len(), 1);
    }

    #[test]
    fn test_alternate_marker_form_is_recognized() {
        let comments = SingleThreadedComments::default();
        let span = span_at(10);

        comments.add_leading(
            span.lo,
            Comment {
                kind: CommentKind::Block,
                span: Span::new(span.lo, span.lo),
                text: PURE_MARKER_ALT.into(),
            },
        );

        assert_eq!(
            annotate(span, Verdict::Eligible, &comments),
            MutationOutcome::AlreadyMarked
        );
    }

    #[test]
    fn test_line_comment_is_not_a_marker() {
        let comments = SingleThreadedComments::default();
        let span = span_at(10);

        comments.add_leading(
            span.lo,
            Comment {
                kind: CommentKind::Line,
                span: Span::new(span.lo, span.lo),
                text: PURE_MARKER.into(),
            },
        );

        assert!(!has_pure_marker(&comments, span.lo));
        assert_eq!(
            annotate(span, Verdict::Eligible, &comments),
            MutationOutcome::Applied
        );
    }

    #[test]
    fn test_unrelated_leading_comment_does_not_block_marker() {
        let comments = SingleThreadedComments::default();
        let span = span_at(10);

        comments.add_leading(
            span.lo,
            Comment {
                kind: CommentKind::Block,
                span: Span::new(span.lo, span.lo),
                text: " webpackChunkName: \"lazy\" ".into(),
            },
        );

        assert_eq!(
            annotate(span, Verdict::Eligible, &comments),
            MutationOutcome::Applied
        );
    }
}
