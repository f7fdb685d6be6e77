//! Recall-phase symbol vectors: index-keyed scopes.
//!
//! Reading an intermediate-code file reconstitutes each scope as a
//! vector. Pushing re-assigns indices in arrival order, which reproduces
//! the original `(scope, index)` identities because tables stream their
//! symbols in index order.

use crate::symbol::{Symbol, SymbolHandle};
use descent_lang::{ScopeId, SymbolRef};
use descent_stream::{CodeStream, StreamError};
use std::cell::RefCell;
use std::rc::Rc;

/// One recalled scope.
#[derive(Debug, Clone)]
pub struct SymbolVector {
    scope: ScopeId,
    parent: Option<ScopeId>,
    symbols: Vec<SymbolHandle>,
}

impl SymbolVector {
    /// Creates an empty vector for `scope`.
    pub fn new(scope: ScopeId, parent: Option<ScopeId>) -> SymbolVector {
        SymbolVector {
            scope,
            parent,
            symbols: Vec::new(),
        }
    }

    /// This vector's scope id.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// The enclosing scope recorded for this vector, if any.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Takes ownership of `symbol`, re-assigning its `(scope, index)`.
    pub fn push(&mut self, mut symbol: Symbol) -> SymbolHandle {
        symbol.place(self.scope, self.symbols.len() as i32);
        let handle = Rc::new(RefCell::new(symbol));
        self.symbols.push(Rc::clone(&handle));
        handle
    }

    /// The symbol at `index`.
    pub fn at(&self, index: i32) -> Option<&SymbolHandle> {
        usize::try_from(index).ok().and_then(|i| self.symbols.get(i))
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates in index order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolHandle> {
        self.symbols.iter()
    }

    /// Reads one scope's worth of records, as written by
    /// [`crate::SymbolTable::write_to`].
    pub fn read_from(
        stream: &mut dyn CodeStream,
        scope: ScopeId,
    ) -> Result<SymbolVector, StreamError> {
        let mut word = [0u8; 4];
        stream.read_exact(&mut word)?;
        let parent = match i32::from_ne_bytes(word) {
            raw if raw < 0 => None,
            raw => Some(ScopeId::new(raw)),
        };
        stream.read_exact(&mut word)?;
        let count = u32::from_ne_bytes(word);

        let mut vector = SymbolVector::new(scope, parent);
        for _ in 0..count {
            let symbol = Symbol::read_from(stream)?;
            vector.push(symbol);
        }
        Ok(vector)
    }
}

/// All recalled scopes, indexed by scope id.
#[derive(Debug, Clone, Default)]
pub struct SymbolVectorVector {
    vectors: Vec<SymbolVector>,
}

impl SymbolVectorVector {
    /// Creates an empty collection.
    pub fn new() -> SymbolVectorVector {
        SymbolVectorVector::default()
    }

    /// Reads the whole side-data block written by
    /// [`crate::SymbolTableVector::write_to`].
    pub fn read_from(stream: &mut dyn CodeStream) -> Result<SymbolVectorVector, StreamError> {
        let mut word = [0u8; 4];
        stream.read_exact(&mut word)?;
        let count = u32::from_ne_bytes(word);

        let mut vectors = Vec::with_capacity(count as usize);
        for scope in 0..count {
            vectors.push(SymbolVector::read_from(stream, ScopeId::new(scope as i32))?);
        }
        Ok(SymbolVectorVector { vectors })
    }

    /// Adds a vector, returning its scope id.
    pub fn push(&mut self, vector: SymbolVector) -> ScopeId {
        let scope = ScopeId::new(self.vectors.len() as i32);
        self.vectors.push(vector);
        scope
    }

    /// Number of scopes.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when no scopes have been recalled.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The vector for `scope`, when in range.
    pub fn vector(&self, scope: ScopeId) -> Option<&SymbolVector> {
        scope
            .in_range(self.vectors.len())
            .then(|| &self.vectors[scope.raw() as usize])
    }

    /// Resolves a stable reference to its symbol.
    pub fn resolve(&self, reference: SymbolRef) -> Option<SymbolHandle> {
        self.vector(reference.scope)
            .and_then(|vector| vector.at(reference.index))
            .map(Rc::clone)
    }

    /// Resolves `symbol`'s recalled parent link, when it has one.
    pub fn parent_of(&self, symbol: &Symbol) -> Option<SymbolHandle> {
        let reference = symbol.parent_ref();
        reference.is_some().then(|| self.resolve(reference)).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolCategory;
    use crate::table::SymbolTableVector;
    use descent_stream::MemoryStream;
    use std::rc::Rc;

    fn sym(name: &str, line: u32) -> Symbol {
        Symbol::from_source(name, SymbolCategory::VARIABLE, Rc::from("demo.src"), line)
    }

    #[test]
    fn test_push_reassigns_indices() {
        let mut vector = SymbolVector::new(ScopeId::new(1), Some(ScopeId::GLOBAL));
        let a = vector.push(Symbol::recalled(
            "a",
            ScopeId::new(1),
            SymbolCategory::VARIABLE,
            SymbolRef::NONE,
        ));
        assert_eq!(a.borrow().reference(), SymbolRef::new(ScopeId::new(1), 0));
    }

    #[test]
    fn test_tables_roundtrip_through_stream() {
        let mut tables = SymbolTableVector::new();
        let ty = tables
            .table_or_global_mut(ScopeId::GLOBAL)
            .insert(sym("T", 1))
            .unwrap();
        let mut var = sym("x", 2);
        var.set_parent(&ty);
        let var = tables.table_or_global_mut(ScopeId::GLOBAL).insert(var).unwrap();

        let inner = tables.push_scope(Some(ScopeId::GLOBAL));
        let local = tables.table_or_global_mut(inner).insert(sym("y", 3)).unwrap();

        let mut stream = MemoryStream::new("side-data");
        tables.write_to(&mut stream).unwrap();
        stream.seek_start();

        let recalled = SymbolVectorVector::read_from(&mut stream).unwrap();
        assert_eq!(recalled.len(), 2);

        let ty_back = recalled.resolve(ty.borrow().reference()).unwrap();
        assert_eq!(ty_back.borrow().name(), "T");

        let var_back = recalled.resolve(var.borrow().reference()).unwrap();
        assert_eq!(var_back.borrow().reference(), var.borrow().reference());
        assert_eq!(var_back.borrow().parent_ref(), ty.borrow().reference());

        let local_back = recalled.resolve(local.borrow().reference()).unwrap();
        assert_eq!(local_back.borrow().name(), "y");
        assert_eq!(local_back.borrow().scope(), inner);
        assert_eq!(recalled.vector(inner).unwrap().parent(), Some(ScopeId::GLOBAL));
    }

    #[test]
    fn test_parent_of_resolves_recalled_link() {
        let mut vectors = SymbolVectorVector::new();
        let mut global = SymbolVector::new(ScopeId::GLOBAL, None);
        let ty = global.push(Symbol::recalled(
            "T",
            ScopeId::GLOBAL,
            SymbolCategory::TYPE,
            SymbolRef::NONE,
        ));
        let var = global.push(Symbol::recalled(
            "x",
            ScopeId::GLOBAL,
            SymbolCategory::VARIABLE,
            ty.borrow().reference(),
        ));
        vectors.push(global);

        let parent = vectors.parent_of(&var.borrow()).unwrap();
        assert_eq!(parent.borrow().name(), "T");
        assert!(vectors.parent_of(&ty.borrow()).is_none());
    }

    #[test]
    fn test_resolve_out_of_range_is_none() {
        let vectors = SymbolVectorVector::new();
        assert!(vectors.resolve(SymbolRef::new(ScopeId::GLOBAL, 0)).is_none());
        assert!(vectors.resolve(SymbolRef::NONE).is_none());
    }
}
