//! Marker splicing into original source text
//!
//! Global invariants enforced:
//! - Only marker insertion; no reformatting, reordering, or whitespace
//!   normalization
//! - Insertions are applied in descending offset order
//! - Identical input yields byte-for-byte identical output

use crate::annotate::{MutationOutcome, PURE_COMMENT};
use crate::pass::SiteOutcome;
use swc_common::SourceFile;

/// Splice pure markers into the original source text
///
/// Inserts `/*#__PURE__*/` immediately before each applied node's byte
/// offset. Offsets are applied back-to-front so earlier insertions do not
/// shift later ones. Returns `None` when no marker was applied.
pub fn splice_markers(
    src: &str,
    source_file: &SourceFile,
    outcomes: &[SiteOutcome],
) -> Option<String> {
    let mut offsets: Vec<usize> = outcomes
        .iter()
        .filter(|o| o.mutation == MutationOutcome::Applied)
        .map(|o| (o.site.span.lo - source_file.start_pos).0 as usize)
        .collect();

    if offsets.is_empty() {
        return None;
    }

    offsets.sort_unstable();
    offsets.dedup();

    let mut out = String::with_capacity(src.len() + offsets.len() * PURE_COMMENT.len());
    out.push_str(src);
    for &offset in offsets.iter().rev() {
        out.insert_str(offset, PURE_COMMENT);
    }

    Some(out)
}
