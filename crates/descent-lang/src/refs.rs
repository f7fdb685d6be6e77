//! Scope identifiers and symbol references.
//!
//! A symbol's stable identity across streaming is its `(scope, index)`
//! pair: the scope names a table in the symbol-table vector, the index its
//! position inside that table. Both halves are signed so that the
//! "unplaced" states (`ScopeId::NONE`, index −1) are representable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a symbol table within the symbol-table vector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ScopeId(i32);

impl ScopeId {
    /// The outermost (global) scope, always at index zero.
    pub const GLOBAL: ScopeId = ScopeId(0);
    /// No scope: the state of a symbol before it has been placed.
    pub const NONE: ScopeId = ScopeId(-1);

    /// Builds a scope id from a raw index.
    pub const fn new(raw: i32) -> ScopeId {
        ScopeId(raw)
    }

    /// The raw signed index.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True for [`ScopeId::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 < 0
    }

    /// In-range test against a table vector of `len` scopes.
    ///
    /// A scope is valid iff `0 <= scope < len`; everything else falls back
    /// to the global table.
    pub fn in_range(self, len: usize) -> bool {
        self.0 >= 0 && (self.0 as usize) < len
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("<none>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Stable identity of a symbol: `(scope, index)`.
///
/// This is what symbolic tokens carry through the intermediate-code
/// stream, and what recalled symbols use to name their parents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct SymbolRef {
    /// Table the symbol lives in.
    pub scope: ScopeId,
    /// Position within that table; −1 until placed.
    pub index: i32,
}

impl SymbolRef {
    /// The "no symbol" reference: `(NONE, -1)`.
    pub const NONE: SymbolRef = SymbolRef {
        scope: ScopeId::NONE,
        index: -1,
    };

    /// Builds a reference from its two halves.
    pub const fn new(scope: ScopeId, index: i32) -> SymbolRef {
        SymbolRef { scope, index }
    }

    /// True for the "no symbol" reference (either half unplaced).
    pub const fn is_none(self) -> bool {
        self.scope.raw() < 0 || self.index < 0
    }

    /// True for a placed reference.
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.scope, self.index)
    }
}
