//! Symbol-aware driver capabilities: the scope stack and symbol entry.

use crate::driver::Parser;
use descent_lang::ScopeId;
use descent_scan::Fetch;
use descent_stream::Token;
use descent_symbol::{Symbol, SymbolCategory, SymbolHandle, SymbolTableVector};
use std::cell::RefCell;
use std::rc::Rc;

impl<F: Fetch> Parser<F> {
    /// The symbol tables, built on first use when absent.
    fn ensure_symbols(&mut self) -> Rc<RefCell<SymbolTableVector>> {
        if self.symbols.is_none() {
            self.symbols = Some(Rc::new(RefCell::new(SymbolTableVector::new())));
        }
        if self.current_scope.is_none() {
            self.current_scope = ScopeId::GLOBAL;
        }
        Rc::clone(self.symbols.as_ref().expect("just ensured"))
    }

    /// Places `symbol` into table `scope` (the global table when `scope`
    /// is out of range).
    ///
    /// A symbol of the same name already in that table is a duplicate:
    /// one syntax error naming the existing declaration's source and line
    /// is logged, the new symbol is dropped, and `None` comes back. This
    /// is the only syntax error the library emits on its own.
    pub fn enter_symbol_into(&mut self, scope: ScopeId, symbol: Symbol) -> Option<SymbolHandle> {
        let tables = self.ensure_symbols();
        let mut tables = tables.borrow_mut();
        match tables.table_or_global_mut(scope).insert(symbol) {
            Ok(handle) => Some(handle),
            Err(existing) => {
                let existing = existing.borrow();
                let message = match existing.origin() {
                    Some(origin) => format!(
                        "duplicate identifier '{}': first declared at {}:{}",
                        existing.name(),
                        origin.source,
                        origin.line
                    ),
                    None => format!("duplicate identifier '{}'", existing.name()),
                };
                self.log.borrow_mut().syntax_error(
                    self.scanner.source_name(),
                    self.scanner.line_number(),
                    message,
                );
                None
            }
        }
    }

    /// Places `symbol` into the current scope.
    pub fn enter_symbol(&mut self, symbol: Symbol) -> Option<SymbolHandle> {
        self.enter_symbol_into(self.current_scope, symbol)
    }

    /// Places `symbol` into the global scope.
    pub fn enter_global_symbol(&mut self, symbol: Symbol) -> Option<SymbolHandle> {
        self.enter_symbol_into(ScopeId::GLOBAL, symbol)
    }

    /// Looks up `name` starting at `scope` (global when out of range),
    /// walking outward through the parent chain.
    pub fn named_symbol_in(&self, scope: ScopeId, name: &str) -> Option<SymbolHandle> {
        self.symbols
            .as_ref()
            .and_then(|tables| tables.borrow().lookup(scope, name))
    }

    /// Looks up `name` starting at the current scope.
    pub fn symbol_named(&self, name: &str) -> Option<SymbolHandle> {
        self.named_symbol_in(self.current_scope, name)
    }

    /// Opens a scope nested in the current one and makes it current.
    pub fn open_scope(&mut self) -> ScopeId {
        let tables = self.ensure_symbols();
        let parent = if self.current_scope.is_none() {
            ScopeId::GLOBAL
        } else {
            self.current_scope
        };
        let scope = tables.borrow_mut().push_scope(Some(parent));
        self.current_scope = scope;
        scope
    }

    /// Leaves the current scope for its parent (global when the parent
    /// chain is exhausted). The table itself stays in the vector; scope
    /// ids are never reused.
    pub fn close_scope(&mut self) -> ScopeId {
        let parent = self
            .symbols
            .as_ref()
            .and_then(|tables| tables.borrow().table(self.current_scope).and_then(|t| t.parent()));
        self.current_scope = parent.unwrap_or(ScopeId::GLOBAL);
        self.current_scope
    }

    /// A convenience for source grammars: creates a from-source symbol
    /// named by the current token's lexeme, at the current position.
    pub fn symbol_for_current(&self, category: SymbolCategory) -> Option<Symbol> {
        let lexeme = self.scanner.current().and_then(Token::lexeme)?;
        Some(Symbol::from_source(
            lexeme,
            category,
            Rc::from(self.scanner.source_name()),
            self.scanner.line_number(),
        ))
    }

    /// Points the current (symbolic) token at a placed symbol.
    pub fn bind_current_symbol(&mut self, handle: &SymbolHandle) {
        let reference = handle.borrow().reference();
        if let Some(token) = self.scanner.current_mut() {
            token.set_symbol_ref(reference);
        }
    }
}
