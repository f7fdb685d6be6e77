//! The parser driver.
//!
//! Client grammars do not subclass anything: they implement [`Grammar`]
//! and lean on a [`Parser`] for everything that is not grammar —
//! iteration with lookback, error logging, rule-based resynchronization
//! and skipping, symbol entry with duplicate detection, and re-emission
//! of the token stream as intermediate code.
//!
//! The driver's capabilities come in the three layers a front end grows
//! through: the base iteration/recovery machinery ([`driver`]), the
//! language-aware layer that resolves rules by id and drives
//! [`Parser::parse_until`] ([`lang`]), and the symbol-aware layer that
//! manages the scope stack ([`symbols`]).

pub mod driver;
pub mod grammar;
pub mod lang;
pub mod symbols;

pub use driver::{DriverError, DriverResult, Parser};
pub use grammar::{from_fn, FnGrammar, Grammar};
