//! Symbols and their two container families.
//!
//! A symbol leads two lives. While source text is being parsed it sits in
//! a *symbol table*: keyed by name, scoped, its parent type held as a
//! weak in-memory reference. Once it has crossed an intermediate-code
//! stream it is *recalled* into a *symbol vector*: keyed by index, its
//! parent named by a `(scope, index)` reference, because direct references
//! mean nothing after serialization.
//!
//! The `(scope, index)` pair assigned when a symbol is placed into its
//! table is its stable identity across both lives.

pub mod symbol;
pub mod table;
pub mod vector;

pub use symbol::{ParentLink, SourceOrigin, Symbol, SymbolCategory, SymbolHandle};
pub use table::{SymbolTable, SymbolTableVector};
pub use vector::{SymbolVector, SymbolVectorVector};
