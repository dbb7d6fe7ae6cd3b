//! Denylist of compiler-injected helper callees
//!
//! Down-leveling and module-interop helpers (the tslib family) register
//! side effects that module semantics depend on, so they are excluded from
//! purity eligibility even when they otherwise qualify.
//!
//! Global invariants enforced:
//! - Immutable after construction; loaded once per pass
//! - Lookup is a pure function of the callee name

use std::collections::HashSet;

/// Helper names emitted by TypeScript down-leveling and module interop
const DEFAULT_HELPERS: &[&str] = &[
    "__assign",
    "__asyncDelegator",
    "__asyncGenerator",
    "__asyncValues",
    "__await",
    "__awaiter",
    "__classPrivateFieldGet",
    "__classPrivateFieldIn",
    "__classPrivateFieldSet",
    "__createBinding",
    "__decorate",
    "__esDecorate",
    "__exportStar",
    "__extends",
    "__generator",
    "__importDefault",
    "__importStar",
    "__makeTemplateObject",
    "__metadata",
    "__param",
    "__propKey",
    "__read",
    "__rest",
    "__runInitializers",
    "__setFunctionName",
    "__setModuleDefault",
    "__spread",
    "__spreadArray",
    "__spreadArrays",
    "__values",
];

/// Set of callee names excluded from purity eligibility
#[derive(Debug, Clone)]
pub struct Denylist {
    names: HashSet<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Denylist::from_names(DEFAULT_HELPERS.iter().map(|s| s.to_string()))
    }
}

impl Denylist {
    /// Build a denylist from an explicit set of names, replacing the defaults
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        Denylist {
            names: names.into_iter().collect(),
        }
    }

    /// Add names on top of the current set
    pub fn extend(&mut self, names: impl IntoIterator<Item = String>) {
        self.names.extend(names);
    }

    /// Check whether a resolved callee name is denylisted
    ///
    /// Bundlers rename colliding helper bindings to `__helper$<n>`, so a
    /// numeric `$` suffix matches the base name. Any other suffix does not.
    pub fn contains(&self, callee: &str) -> bool {
        if self.names.contains(callee) {
            return true;
        }

        match callee.split_once('$') {
            Some((base, suffix)) => {
                !suffix.contains('$')
                    && suffix.parse::<u32>().is_ok()
                    && self.names.contains(base)
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
