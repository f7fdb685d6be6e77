//! The client grammar hook.

use crate::driver::{DriverResult, Parser};
use descent_scan::Fetch;

/// One grammar production, implemented by the client.
///
/// [`Parser::parse_until`](crate::Parser::parse_until) calls `parse`
/// repeatedly, advancing between calls, until the current token lands in
/// the terminating rule. `parse` reports recoverable trouble to the
/// driver's log (typically via
/// [`Parser::resync_to`](crate::Parser::resync_to)) and returns `Err`
/// only for fatal conditions.
pub trait Grammar<F: Fetch> {
    /// Parses one construct starting at the current token.
    fn parse(&mut self, parser: &mut Parser<F>) -> DriverResult<()>;
}

/// A [`Grammar`] backed by a closure; see [`from_fn`].
pub struct FnGrammar<T>(T);

impl<F, T> Grammar<F> for FnGrammar<T>
where
    F: Fetch,
    T: FnMut(&mut Parser<F>) -> DriverResult<()>,
{
    fn parse(&mut self, parser: &mut Parser<F>) -> DriverResult<()> {
        (self.0)(parser)
    }
}

/// Wraps a closure as a [`Grammar`], for small productions and tests.
pub fn from_fn<F, T>(f: T) -> FnGrammar<T>
where
    F: Fetch,
    T: FnMut(&mut Parser<F>) -> DriverResult<()>,
{
    FnGrammar(f)
}
