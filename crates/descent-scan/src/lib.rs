//! Scanners: lazy token sequences over source text or intermediate code.
//!
//! Both scanners share one iteration contract, provided by
//! [`Scanner`]: the first token is loaded at construction, `next()`
//! applies the whitespace and line-ending policies, `peek()` looks ahead
//! without disturbing the current token, and the end-of-stream state is
//! sticky. What differs is where tokens come from, captured by the
//! [`Fetch`] strategy:
//!
//! - [`CodeFetch`] reads prepacked binary records from a
//!   [`descent_stream::CodeStream`] (the recall phase);
//! - [`SourceFetch`] tokenizes UTF-8 text against a
//!   [`descent_lang::Language`] (the parse phase).

pub mod code;
pub mod scanner;
pub mod source;

pub use code::CodeFetch;
pub use scanner::{Fetch, ScanError, ScanPolicy, Scanner};
pub use source::SourceFetch;

/// Scanner over a binary intermediate-code stream.
pub type CodeScanner<S> = Scanner<CodeFetch<S>>;

/// Scanner over in-memory source text.
pub type SourceScanner = Scanner<SourceFetch>;
