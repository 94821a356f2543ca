//! # Symbols in the tableau
//!
//! The solver never works with external [`Variable`](crate::Variable)s
//! directly. Each variable, and every slack, error and dummy quantity the
//! algorithm introduces, is represented inside the tableau by a small `Copy`
//! handle carrying a kind tag and an id that is unique within one solver.
//!
//! Equality, hashing and ordering all use the id only; the kind is carried
//! along for the predicates below.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// What role a symbol plays in the tableau.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SymbolKind {
    /// Stands for a user-visible variable. Unrestricted in sign, and the
    /// only kind whose value is copied back out of the tableau.
    External,
    /// Turns an inequality into an equality: `e <= 0` becomes
    /// `e + s = 0` with `s >= 0`. Restricted and pivotable.
    Slack,
    /// Measures the violation of a non-required constraint; the objective
    /// holds a weighted term per error symbol. Restricted and pivotable.
    Error,
    /// Marks a required equality so it can be found again for removal.
    /// Restricted, and never allowed to enter the basis through a pivot.
    Dummy,
}

/// A variable of the tableau: a kind tag plus a per-solver unique id.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Symbol {
    id: u32,
    kind: SymbolKind,
}

impl Symbol {
    pub(crate) fn new(id: u32, kind: SymbolKind) -> Self {
        Symbol { id, kind }
    }

    pub(crate) fn is_external(self) -> bool {
        self.kind == SymbolKind::External
    }

    pub(crate) fn is_slack(self) -> bool {
        self.kind == SymbolKind::Slack
    }

    pub(crate) fn is_error(self) -> bool {
        self.kind == SymbolKind::Error
    }

    pub(crate) fn is_dummy(self) -> bool {
        self.kind == SymbolKind::Dummy
    }

    /// Restricted symbols may not take negative values.
    pub(crate) fn is_restricted(self) -> bool {
        !self.is_external()
    }

    /// Only slack and error symbols may enter the basis through a pivot.
    pub(crate) fn is_pivotable(self) -> bool {
        self.is_slack() || self.is_error()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self.kind {
            SymbolKind::External => 'v',
            SymbolKind::Slack => 's',
            SymbolKind::Error => 'e',
            SymbolKind::Dummy => 'd',
        };
        write!(f, "{tag}{}", self.id)
    }
}
