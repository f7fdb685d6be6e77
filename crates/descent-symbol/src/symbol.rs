//! The symbol record.

use descent_lang::{ScopeId, SymbolRef};
use descent_stream::{CodeStream, StreamError};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a symbol. Tables and vectors own their symbols
/// through these; parent links hold only weak references.
pub type SymbolHandle = Rc<RefCell<Symbol>>;

/// Symbol classification, with the `EXTERNAL` flag bit-or'ed in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct SymbolCategory(u32);

impl SymbolCategory {
    pub const UNDEFINED: SymbolCategory = SymbolCategory(0);
    pub const TYPE: SymbolCategory = SymbolCategory(1);
    pub const LITERAL: SymbolCategory = SymbolCategory(2);
    pub const VARIABLE: SymbolCategory = SymbolCategory(3);
    pub const SUBROUTINE: SymbolCategory = SymbolCategory(4);
    pub const STRUCTURE_MEMBER: SymbolCategory = SymbolCategory(5);
    pub const PARAMETER: SymbolCategory = SymbolCategory(6);
    /// First value reserved for client-defined categories.
    pub const USER: SymbolCategory = SymbolCategory(0x100);
    /// Flag marking a symbol defined outside the current compilation.
    pub const EXTERNAL: u32 = 0x8000_0000;

    /// Builds a category from a raw value.
    pub const fn new(raw: u32) -> SymbolCategory {
        SymbolCategory(raw)
    }

    /// The raw value, flag included.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The category with the external flag stripped.
    pub const fn base(self) -> SymbolCategory {
        SymbolCategory(self.0 & !Self::EXTERNAL)
    }

    /// True when the external flag is set.
    pub const fn is_external(self) -> bool {
        self.0 & Self::EXTERNAL != 0
    }

    /// This category with the external flag set.
    pub const fn external(self) -> SymbolCategory {
        SymbolCategory(self.0 | Self::EXTERNAL)
    }
}

/// Where a from-source symbol was declared, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOrigin {
    /// Name of the source the declaration came from.
    pub source: Rc<str>,
    /// 1-based declaration line.
    pub line: u32,
}

/// The parent-type link, in its two mutually exclusive representations.
///
/// During parsing the parent is another in-memory symbol, held weakly so
/// a dropped parent invalidates lookups without dangling. After recall it
/// is a `(scope, index)` reference into the symbol vectors.
#[derive(Debug, Clone, Default)]
pub enum ParentLink {
    /// No parent type.
    #[default]
    None,
    /// Parse-phase link to a live symbol.
    Direct(Weak<RefCell<Symbol>>),
    /// Recall-phase link by stable reference.
    Recalled(SymbolRef),
}

impl ParentLink {
    /// The stable reference this link resolves to right now.
    ///
    /// `(NONE, -1)` when there is no parent, the parent has been dropped,
    /// or the parent has not been placed yet.
    pub fn reference(&self) -> SymbolRef {
        match self {
            ParentLink::None => SymbolRef::NONE,
            ParentLink::Direct(weak) => weak
                .upgrade()
                .map(|parent| parent.borrow().reference())
                .unwrap_or(SymbolRef::NONE),
            ParentLink::Recalled(reference) => *reference,
        }
    }

    /// Steps one level up the chain. Recalled links cannot be walked
    /// without the symbol vectors, so they step to `None`.
    fn step(&self) -> ParentLink {
        match self {
            ParentLink::Direct(weak) => weak
                .upgrade()
                .map(|parent| parent.borrow().parent.clone())
                .unwrap_or(ParentLink::None),
            _ => ParentLink::None,
        }
    }

    /// True when `self` and `other` name the same live symbol.
    fn is_same(&self, other: &ParentLink) -> bool {
        match (self, other) {
            (ParentLink::Direct(a), ParentLink::Direct(b)) => match (a.upgrade(), b.upgrade()) {
                (Some(a), Some(b)) => Rc::ptr_eq(&a, &b),
                _ => false,
            },
            (ParentLink::None, _) | (_, ParentLink::None) => false,
            _ => {
                let (a, b) = (self.reference(), other.reference());
                a.is_some() && a == b
            }
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, ParentLink::None)
    }
}

/// A named entity discovered while parsing, or recalled from a stream.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    scope: ScopeId,
    index: i32,
    category: SymbolCategory,
    parent: ParentLink,
    origin: Option<SourceOrigin>,
}

impl Symbol {
    /// A symbol created while reading source text, with its declaration
    /// position recorded for diagnostics. Unplaced until a table takes it.
    pub fn from_source(
        name: impl Into<String>,
        category: SymbolCategory,
        source: Rc<str>,
        line: u32,
    ) -> Symbol {
        Symbol {
            name: name.into(),
            scope: ScopeId::NONE,
            index: -1,
            category,
            parent: ParentLink::None,
            origin: Some(SourceOrigin { source, line }),
        }
    }

    /// A symbol reconstituted from an intermediate-code stream.
    pub fn recalled(
        name: impl Into<String>,
        scope: ScopeId,
        category: SymbolCategory,
        parent: SymbolRef,
    ) -> Symbol {
        let parent = if parent.is_none() {
            ParentLink::None
        } else {
            ParentLink::Recalled(parent)
        };
        Symbol {
            name: name.into(),
            scope,
            index: -1,
            category,
            parent,
            origin: None,
        }
    }

    /// The symbol's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scope it is placed in; `NONE` until placed.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Position within its scope; −1 until placed.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Classification.
    pub fn category(&self) -> SymbolCategory {
        self.category
    }

    /// Declaration position, for from-source symbols.
    pub fn origin(&self) -> Option<&SourceOrigin> {
        self.origin.as_ref()
    }

    /// Stable identity: `(scope, index)`.
    pub fn reference(&self) -> SymbolRef {
        SymbolRef::new(self.scope, self.index)
    }

    /// The parent-type link.
    pub fn parent(&self) -> &ParentLink {
        &self.parent
    }

    /// The parent's stable reference, or `(NONE, -1)`.
    pub fn parent_ref(&self) -> SymbolRef {
        self.parent.reference()
    }

    /// Links this symbol's parent type to a live symbol.
    pub fn set_parent(&mut self, parent: &SymbolHandle) {
        self.parent = ParentLink::Direct(Rc::downgrade(parent));
    }

    /// Replaces the parent link wholesale.
    pub fn set_parent_link(&mut self, parent: ParentLink) {
        self.parent = parent;
    }

    /// Assigns the `(scope, index)` identity; containers call this when
    /// they take ownership.
    pub(crate) fn place(&mut self, scope: ScopeId, index: i32) {
        self.scope = scope;
        self.index = index;
    }

    /// Assignment compatibility: both parent-type chains are walked in
    /// lockstep until they name the same type or either chain ends.
    pub fn can_assign_from(&self, other: &Symbol) -> bool {
        let this = self.reference();
        if this.is_some() && this == other.reference() {
            return true;
        }
        let mut mine = self.parent.clone();
        let mut theirs = other.parent.clone();
        while !mine.is_none() && !theirs.is_none() {
            if mine.is_same(&theirs) {
                return true;
            }
            mine = mine.step();
            theirs = theirs.step();
        }
        false
    }

    /// Comparison compatibility: the symmetric closure of
    /// [`Symbol::can_assign_from`].
    pub fn can_compare_with(&self, other: &Symbol) -> bool {
        self.can_assign_from(other) || other.can_assign_from(self)
    }

    /// Writes this symbol's record: name (length-prefixed UTF-8), scope,
    /// category, and the parent's stable reference.
    pub fn write_to(&self, stream: &mut dyn CodeStream) -> Result<usize, StreamError> {
        let mut written = 0;
        let bytes = self.name.as_bytes();
        written += stream.write(&(bytes.len() as u32).to_ne_bytes())?;
        written += stream.write(bytes)?;
        written += stream.write(&self.scope.raw().to_ne_bytes())?;
        written += stream.write(&self.category.raw().to_ne_bytes())?;
        let parent = self.parent_ref();
        written += stream.write(&parent.scope.raw().to_ne_bytes())?;
        written += stream.write(&parent.index.to_ne_bytes())?;
        Ok(written)
    }

    /// Reads one symbol record, producing a recalled symbol. The index is
    /// not part of the record; placement into a vector re-assigns it.
    pub fn read_from(stream: &mut dyn CodeStream) -> Result<Symbol, StreamError> {
        let mut word = [0u8; 4];
        stream.read_exact(&mut word)?;
        let len = u32::from_ne_bytes(word) as usize;

        let mut bytes = vec![0u8; len];
        stream.read_exact(&mut bytes)?;
        let name = String::from_utf8(bytes).map_err(|_| StreamError::Malformed {
            name: stream.name().to_string(),
            detail: "symbol name is not valid UTF-8".to_string(),
        })?;

        stream.read_exact(&mut word)?;
        let scope = ScopeId::new(i32::from_ne_bytes(word));
        stream.read_exact(&mut word)?;
        let category = SymbolCategory::new(u32::from_ne_bytes(word));
        stream.read_exact(&mut word)?;
        let parent_scope = i32::from_ne_bytes(word);
        stream.read_exact(&mut word)?;
        let parent_index = i32::from_ne_bytes(word);

        Ok(Symbol::recalled(
            name,
            scope,
            category,
            SymbolRef::new(ScopeId::new(parent_scope), parent_index),
        ))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.name, self.reference())
    }
}
