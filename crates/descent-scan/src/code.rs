//! Fetch strategy over a binary intermediate-code stream.

use crate::scanner::{Fetch, ScanError, ScanPolicy, Scanner};
use descent_stream::{CodeStream, Token};

/// Produces tokens by decoding intermediate-code records.
///
/// `unread` is a true stream rewind: the token's record is re-exposed to
/// the next read. The end state latches as soon as the end-of-stream token
/// has been synthesized.
#[derive(Debug)]
pub struct CodeFetch<S: CodeStream> {
    stream: S,
    ended: bool,
}

impl<S: CodeStream> CodeFetch<S> {
    /// Wraps a stream positioned at the first record.
    pub fn new(stream: S) -> CodeFetch<S> {
        CodeFetch {
            stream,
            ended: false,
        }
    }

    /// The underlying stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Consumes the fetch, returning the stream.
    pub fn into_stream(self) -> S {
        self.stream
    }
}

impl<S: CodeStream> Fetch for CodeFetch<S> {
    fn fetch(&mut self, _policy: &ScanPolicy) -> Result<Token, ScanError> {
        if self.ended {
            return Ok(Token::stream_end());
        }
        let token = Token::read_from(&mut self.stream)?;
        if token.is_end() {
            self.ended = true;
        }
        Ok(token)
    }

    fn unread(&mut self, token: Token) -> Result<(), ScanError> {
        // The end token occupies no bytes; once ended, stay ended.
        token.return_to(&mut self.stream)?;
        Ok(())
    }

    fn source_name(&self) -> &str {
        self.stream.name()
    }
}

impl<S: CodeStream> Scanner<CodeFetch<S>> {
    /// Builds a scanner over intermediate code and loads the first token.
    pub fn over_code(stream: S, policy: ScanPolicy) -> Result<Scanner<CodeFetch<S>>, ScanError> {
        Scanner::new(CodeFetch::new(stream), policy)
    }
}
