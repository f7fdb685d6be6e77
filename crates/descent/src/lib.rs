//! # descent
//!
//! A toolkit for building recursive-descent front ends.
//!
//! This crate is a facade that re-exports functionality from:
//! - `descent-lang` — opcodes, dictionaries, syntax rules, diagnostics
//! - `descent-stream` — the token model and its binary stream format
//! - `descent-scan` — scanners over source text and intermediate code
//! - `descent-symbol` — scoped symbol tables and recall-phase vectors
//! - `descent-parse` — the parser driver client grammars build on
//!
//! ## Architecture
//!
//! ```text
//! descent-lang      language definition + diagnostics
//!     ↓
//! descent-stream    tokens + intermediate-code records
//!     ↓
//! descent-scan      source scanner / code scanner
//!     ↓                       ↓
//! descent-symbol    tables (parse) / vectors (recall)
//!     ↓
//! descent-parse     driver: recovery, scopes, emission
//!     ↓
//! descent (facade)  re-exports + integration suites
//! ```
//!
//! ## Usage
//!
//! A client defines a [`Language`] (bind keywords and operators, define
//! synchronization rules), scans text with a [`SourceScanner`], and
//! drives a [`Grammar`] implementation through a [`Parser`]. Identifiers
//! become [`Symbol`]s in scoped tables; tokens and symbol tables stream
//! out as intermediate code and are recalled later through a
//! [`CodeScanner`] and [`SymbolVectorVector`].

pub use descent_lang as lang;
pub use descent_lang::{
    CaseFolding, Category, Diagnostic, DiagnosticLog, FatalError, Language, Opcode,
    OpcodeDictionary, RuleId, RuleSet, ScopeId, Severity, SymbolRef, SyntaxRule, CATEGORY_MASK,
};

pub use descent_stream as stream;
pub use descent_stream::{
    CodeStream, FileStream, MemoryStream, Payload, StreamError, Token, TokenList, MAX_RECORD_LEN,
};

pub use descent_scan as scan;
pub use descent_scan::{
    CodeFetch, CodeScanner, Fetch, ScanError, ScanPolicy, Scanner, SourceFetch, SourceScanner,
};

pub use descent_symbol as symbol;
pub use descent_symbol::{
    ParentLink, SourceOrigin, Symbol, SymbolCategory, SymbolHandle, SymbolTable,
    SymbolTableVector, SymbolVector, SymbolVectorVector,
};

pub use descent_parse as parse;
pub use descent_parse::{from_fn, DriverError, DriverResult, FnGrammar, Grammar, Parser};

/// Toolkit version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
