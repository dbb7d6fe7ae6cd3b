//! Document-order annotation pass
//!
//! Global invariants enforced:
//! - Each call-like node is visited exactly once, in document order
//! - Lexical context is derived from the live ancestor chain, never stored
//! - Outcomes are ordered by span start position

use crate::annotate::{self, MutationOutcome};
use crate::classify::{classify, CallKind, CallSite, LexicalContext, Verdict};
use crate::denylist::Denylist;
use swc_common::comments::SingleThreadedComments;
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Classification and mutation record for one call-like node
#[derive(Debug, Clone)]
pub struct SiteOutcome {
    pub site: CallSite,
    pub verdict: Verdict,
    pub mutation: MutationOutcome,
}

/// Run the annotation pass over a parsed module
///
/// Visits every call-like node once, classifies it against `denylist`, and
/// attaches pure markers to the eligible ones via the comment map. Returns
/// one outcome per node, sorted by span start position.
pub fn run_pass(
    module: &Module,
    comments: &SingleThreadedComments,
    denylist: &Denylist,
) -> Vec<SiteOutcome> {
    let mut pass = AnnotationPass {
        depth: 0,
        comments,
        denylist,
        outcomes: Vec::new(),
    };

    module.visit_with(&mut pass);

    // Sort by span start for deterministic ordering
    pass.outcomes.sort_by_key(|o| o.site.span.lo);
    pass.outcomes
}

/// Resolve a callee expression to a static dotted name
///
/// `foo` resolves to `foo`, `Object.create` to `Object.create`. Computed
/// members, sequences, parenthesized expressions, `super`, and dynamic
/// `import` are unresolved.
fn resolve_callee_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => {
            let obj = resolve_callee_name(&member.obj)?;
            match &member.prop {
                MemberProp::Ident(prop) => Some(format!("{}.{}", obj, prop.sym)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn call_site(call: &CallExpr) -> CallSite {
    let callee = match &call.callee {
        Callee::Expr(expr) => resolve_callee_name(expr),
        Callee::Super(_) | Callee::Import(_) => None,
    };

    CallSite {
        kind: CallKind::Call,
        callee,
        arg_count: call.args.len(),
        span: call.span,
    }
}

fn new_site(new_expr: &NewExpr) -> CallSite {
    // `new Foo` without an argument list counts as zero arguments
    CallSite {
        kind: CallKind::Construct,
        callee: resolve_callee_name(&new_expr.callee),
        arg_count: new_expr.args.as_ref().map(|args| args.len()).unwrap_or(0),
        span: new_expr.span,
    }
}

/// Visitor that classifies and annotates call-like nodes
///
/// `depth` counts enclosing function-like bodies; the classifier sees only
/// the derived top-level/nested fact.
struct AnnotationPass<'a> {
    depth: usize,
    comments: &'a SingleThreadedComments,
    denylist: &'a Denylist,
    outcomes: Vec<SiteOutcome>,
}

impl AnnotationPass<'_> {
    fn record(&mut self, site: CallSite) {
        let context = LexicalContext::from_depth(self.depth);
        let verdict = classify(&site, context, self.denylist);
        let mutation = annotate::annotate(site.span, verdict, self.comments);
        self.outcomes.push(SiteOutcome {
            site,
            verdict,
            mutation,
        });
    }
}

impl Visit for AnnotationPass<'_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        self.record(call_site(call));

        // Continue visiting children
        call.visit_children_with(self);
    }

    fn visit_new_expr(&mut self, new_expr: &NewExpr) {
        self.record(new_site(new_expr));

        // Continue visiting children
        new_expr.visit_children_with(self);
    }

    fn visit_function(&mut self, n: &Function) {
        self.depth += 1;
        n.visit_children_with(self);
        self.depth -= 1;
    }

    fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
        self.depth += 1;
        n.visit_children_with(self);
        self.depth -= 1;
    }

    fn visit_constructor(&mut self, n: &Constructor) {
        self.depth += 1;
        n.visit_children_with(self);
        self.depth -= 1;
    }

    fn visit_getter_prop(&mut self, n: &GetterProp) {
        self.depth += 1;
        n.visit_children_with(self);
        self.depth -= 1;
    }

    fn visit_setter_prop(&mut self, n: &SetterProp) {
        self.depth += 1;
        n.visit_children_with(self);
        self.depth -= 1;
    }
}
