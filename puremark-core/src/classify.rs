//! Call-site eligibility classification
//!
//! Global invariants enforced:
//! - A verdict is a pure function of (call site, lexical context, denylist)
//! - No mutable state across visits, no ordering dependence on siblings
//! - Rule precedence is fixed: nesting, then arguments, then denylist

use crate::denylist::Denylist;
use serde::{Deserialize, Serialize};
use swc_common::Span;

/// Kind of call-like expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// `foo()`
    Call,
    /// `new Foo()` (or `new Foo` without an argument list)
    Construct,
}

/// One call-like expression, reduced to the facts classification needs
#[derive(Debug, Clone)]
pub struct CallSite {
    pub kind: CallKind,
    /// Statically resolved callee name (`foo`, `Object.create`), or `None`
    /// when the callee is not a simple identifier or dotted member chain.
    pub callee: Option<String>,
    pub arg_count: usize,
    pub span: Span,
}

/// Whether the call site is lexically nested inside a function-like body
///
/// Derived per visit from the traversal's ancestor chain; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalContext {
    /// Executed unconditionally during module evaluation
    TopLevel,
    /// Inside a function, method, constructor, arrow, or accessor body
    Nested,
}

impl LexicalContext {
    /// Build from a function-nesting depth counter (0 = top level)
    pub fn from_depth(depth: usize) -> Self {
        if depth == 0 {
            LexicalContext::TopLevel
        } else {
            LexicalContext::Nested
        }
    }
}

/// Classification verdict for one call-like node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Eligible,
    NotTopLevel,
    HasArguments,
    DenylistedCallee,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Eligible => "eligible",
            Verdict::NotTopLevel => "not-top-level",
            Verdict::HasArguments => "has-arguments",
            Verdict::DenylistedCallee => "denylisted-callee",
        }
    }
}

/// Classify one call-like node
///
/// Rules, first match wins:
/// 1. Nested inside any function-like body -> `NotTopLevel`. Only calls whose
///    execution is unconditionally triggered by module evaluation are
///    candidates; calls inside function bodies are left to other passes.
/// 2. One or more arguments -> `HasArguments`. Argument expressions may carry
///    side effects and no recursive argument analysis is performed.
/// 3. Resolved callee present in the denylist -> `DenylistedCallee`.
/// 4. Otherwise -> `Eligible`.
///
/// Unresolved callees cannot match the denylist and fall through to
/// `Eligible` when rules 1-2 pass.
pub fn classify(site: &CallSite, context: LexicalContext, denylist: &Denylist) -> Verdict {
    if context == LexicalContext::Nested {
        return Verdict::NotTopLevel;
    }

    if site.arg_count > 0 {
        return Verdict::HasArguments;
    }

    if let Some(callee) = &site.callee {
        if denylist.contains(callee) {
            return Verdict::DenylistedCallee;
        }
    }

    Verdict::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::DUMMY_SP;

    fn site(kind: CallKind, callee: Option<&str>, arg_count: usize) -> CallSite {
        CallSite {
            kind,
            callee: callee.map(|s| s.to_string()),
            arg_count,
            span: DUMMY_SP,
        }
    }

    #[test]
    fn test_top_level_zero_arg_call_is_eligible() {
        let s = site(CallKind::Call, Some("foo"), 0);
        let verdict = classify(&s, LexicalContext::TopLevel, &Denylist::default());
        assert_eq!(verdict, Verdict::Eligible);
    }

    #[test]
    fn test_top_level_zero_arg_constructor_is_eligible() {
        let s = site(CallKind::Construct, Some("Date"), 0);
        let verdict = classify(&s, LexicalContext::TopLevel, &Denylist::default());
        assert_eq!(verdict, Verdict::Eligible);
    }

    #[test]
    fn test_nested_call_is_not_top_level() {
        let s = site(CallKind::Call, Some("foo"), 0);
        let verdict = classify(&s, LexicalContext::Nested, &Denylist::default());
        assert_eq!(verdict, Verdict::NotTopLevel);
    }

    #[test]
    fn test_call_with_arguments_is_rejected() {
        let s = site(CallKind::Call, Some("Object.create"), 1);
        let verdict = classify(&s, LexicalContext::TopLevel, &Denylist::default());
        assert_eq!(verdict, Verdict::HasArguments);
    }

    #[test]
    fn test_denylisted_callee_is_rejected() {
        let s = site(CallKind::Call, Some("__extends"), 0);
        let verdict = classify(&s, LexicalContext::TopLevel, &Denylist::default());
        assert_eq!(verdict, Verdict::DenylistedCallee);
    }

    #[test]
    fn test_unresolved_callee_falls_through_to_eligible() {
        let s = site(CallKind::Call, None, 0);
        let verdict = classify(&s, LexicalContext::TopLevel, &Denylist::default());
        assert_eq!(verdict, Verdict::Eligible);
    }

    #[test]
    fn test_nesting_takes_precedence_over_arguments() {
        let s = site(CallKind::Call, Some("foo"), 3);
        let verdict = classify(&s, LexicalContext::Nested, &Denylist::default());
        assert_eq!(verdict, Verdict::NotTopLevel);
    }

    #[test]
    fn test_arguments_take_precedence_over_denylist() {
        // A denylisted helper called with arguments reports HasArguments:
        // the argument rule is evaluated before the denylist lookup.
        let s = site(CallKind::Call, Some("__extends"), 2);
        let verdict = classify(&s, LexicalContext::TopLevel, &Denylist::default());
        assert_eq!(verdict, Verdict::HasArguments);
    }

    #[test]
    fn test_nested_denylisted_call_is_not_top_level() {
        let s = site(CallKind::Call, Some("__importStar"), 0);
        let verdict = classify(&s, LexicalContext::Nested, &Denylist::default());
        assert_eq!(verdict, Verdict::NotTopLevel);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let s = site(CallKind::Call, Some("foo"), 0);
        let denylist = Denylist::default();
        let first = classify(&s, LexicalContext::TopLevel, &denylist);
        for _ in 0..10 {
            assert_eq!(classify(&s, LexicalContext::TopLevel, &denylist), first);
        }
    }

    #[test]
    fn test_lexical_context_from_depth() {
        assert_eq!(LexicalContext::from_depth(0), LexicalContext::TopLevel);
        assert_eq!(LexicalContext::from_depth(1), LexicalContext::Nested);
        assert_eq!(LexicalContext::from_depth(7), LexicalContext::Nested);
    }
}
