//! Language definitions for the descent parser toolkit.
//!
//! A [`Language`] is everything a scanner and parser need to know about the
//! textual language they are processing:
//!
//! - an [`OpcodeDictionary`] mapping token strings to [`Opcode`] values,
//! - a set of named [`SyntaxRule`]s used for synchronization and
//!   termination tests,
//! - an optional [`CaseFolding`] policy applied to identifiers.
//!
//! The crate also carries the foundation types shared by the rest of the
//! workspace ([`Opcode`], [`Category`], [`SymbolRef`], [`ScopeId`]) and the
//! [`DiagnosticLog`] diagnostics accumulator.
//!
//! # Examples
//!
//! ```
//! use descent_lang::{Category, Language, Opcode, RuleId};
//!
//! let mut lang = Language::new();
//! let kw_if = Opcode::from_parts(Category::KEYWORD, 1);
//! let semi = Opcode::from_parts(Category::DELIMITER, 1);
//! lang.bind("if", kw_if);
//! lang.bind(";", semi);
//! lang.define_rule(RuleId::END_STATEMENT, [semi, Opcode::EOS]);
//!
//! assert_eq!(lang.lookup("if"), kw_if);
//! assert!(lang.syntax_rule(RuleId::END_STATEMENT).unwrap().has(semi));
//! ```

pub mod diag;
pub mod dict;
pub mod language;
pub mod opcode;
pub mod refs;
pub mod rules;

pub use diag::{Diagnostic, DiagnosticLog, FatalError, Severity};
pub use dict::OpcodeDictionary;
pub use language::{CaseFolding, Language};
pub use opcode::{Category, Opcode, CATEGORY_MASK};
pub use refs::{ScopeId, SymbolRef};
pub use rules::{RuleId, RuleSet, SyntaxRule};
