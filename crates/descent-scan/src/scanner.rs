//! The shared scanner core.

use descent_lang::Category;
use descent_stream::{StreamError, Token};
use thiserror::Error;

/// Scanner-level failures.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Whitespace and line-ending handling, set by the scanner's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    /// Discard whitespace tokens entirely; the current token is never of
    /// category `SPACE`.
    pub discard_whitespace: bool,
    /// Combine a run of whitespace tokens into one. Ignored when
    /// `discard_whitespace` is set.
    pub consolidate_whitespace: bool,
    /// Combine a run of line endings into one token carrying the summed
    /// line count.
    pub consolidate_line_endings: bool,
}

impl Default for ScanPolicy {
    fn default() -> ScanPolicy {
        ScanPolicy {
            discard_whitespace: true,
            consolidate_whitespace: true,
            consolidate_line_endings: false,
        }
    }
}

impl ScanPolicy {
    /// Keep every token as scanned.
    pub fn verbatim() -> ScanPolicy {
        ScanPolicy {
            discard_whitespace: false,
            consolidate_whitespace: false,
            consolidate_line_endings: false,
        }
    }
}

/// Token production strategy: where a scanner's tokens come from.
///
/// `fetch` produces the next raw token (the end-of-stream token once the
/// source is exhausted, and forever after). `unread` gives a token back so
/// the next `fetch` reproduces it; unreading the end-of-stream token is a
/// no-op, since that state is sticky.
pub trait Fetch {
    /// Produces the next raw token.
    ///
    /// The policy is passed through so that text tokenization can consume
    /// whole whitespace and line-ending runs when consolidation is on.
    fn fetch(&mut self, policy: &ScanPolicy) -> Result<Token, ScanError>;

    /// Gives `token` back to the source.
    fn unread(&mut self, token: Token) -> Result<(), ScanError>;

    /// Name of the underlying source, for diagnostics.
    fn source_name(&self) -> &str;
}

/// Iterator over a token source, with pushback and policy handling.
///
/// Construction performs the initial advance, so the first token (or the
/// end-of-stream token, for an empty source) is loaded immediately.
#[derive(Debug)]
pub struct Scanner<F: Fetch> {
    fetch: F,
    current: Option<Token>,
    line: u32,
    policy: ScanPolicy,
}

impl<F: Fetch> Scanner<F> {
    /// Builds a scanner and loads the first token.
    pub fn new(fetch: F, policy: ScanPolicy) -> Result<Scanner<F>, ScanError> {
        let mut scanner = Scanner {
            fetch,
            current: None,
            line: 1,
            policy,
        };
        scanner.next()?;
        Ok(scanner)
    }

    /// Advances to the next token, applying the scan policy.
    ///
    /// Whitespace is discarded or consolidated per the policy; line
    /// endings bump the line number by their counts and may be
    /// consolidated into one token with the summed count. Once the
    /// current token is the end-of-stream token this is a no-op.
    pub fn next(&mut self) -> Result<(), ScanError> {
        if matches!(&self.current, Some(t) if t.is_end()) {
            return Ok(());
        }
        loop {
            let token = self.fetch.fetch(&self.policy)?;
            match token.category() {
                Category::SPACE if self.policy.discard_whitespace => continue,
                Category::SPACE if self.policy.consolidate_whitespace => {
                    self.absorb_spaces()?;
                    self.current = Some(token);
                    return Ok(());
                }
                Category::EOL => {
                    let mut count = token.line_count().max(1);
                    if self.policy.consolidate_line_endings {
                        count += self.absorb_line_endings()?;
                        self.line += count;
                        self.current = Some(Token::line_ending(count));
                    } else {
                        self.line += count;
                        self.current = Some(token);
                    }
                    return Ok(());
                }
                _ => {
                    self.current = Some(token);
                    return Ok(());
                }
            }
        }
    }

    /// Consumes the rest of a whitespace run.
    fn absorb_spaces(&mut self) -> Result<(), ScanError> {
        loop {
            let token = self.fetch.fetch(&self.policy)?;
            if token.category() != Category::SPACE {
                return self.fetch.unread(token);
            }
        }
    }

    /// Consumes the rest of a line-ending run, returning the summed count.
    fn absorb_line_endings(&mut self) -> Result<u32, ScanError> {
        let mut extra = 0;
        loop {
            let token = self.fetch.fetch(&self.policy)?;
            if token.category() == Category::EOL {
                extra += token.line_count().max(1);
            } else {
                self.fetch.unread(token)?;
                return Ok(extra);
            }
        }
    }

    /// Reads the next token without touching the current one, then gives
    /// it back. The returned copy is the caller's.
    ///
    /// Whitespace the policy discards is consumed here too: the token
    /// sequence never surfaces it, so a peek cannot either.
    pub fn peek(&mut self) -> Result<Token, ScanError> {
        loop {
            let token = self.fetch.fetch(&self.policy)?;
            if self.policy.discard_whitespace && token.category() == Category::SPACE {
                continue;
            }
            let copy = token.clone();
            self.fetch.unread(token)?;
            return Ok(copy);
        }
    }

    /// The current token, if one is loaded.
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Mutable access to the current token (silencing).
    pub fn current_mut(&mut self) -> Option<&mut Token> {
        self.current.as_mut()
    }

    /// Takes ownership of the current token, leaving the scanner without
    /// one until the next advance.
    pub fn take_current(&mut self) -> Option<Token> {
        self.current.take()
    }

    /// Gives `token` back to the source and drops it.
    pub fn return_token(&mut self, token: Token) -> Result<(), ScanError> {
        self.fetch.unread(token)
    }

    /// Returns the current token to the source and clears it. A no-op
    /// when the current token is the end-of-stream token: that state is
    /// never left.
    pub fn rewind(&mut self) -> Result<(), ScanError> {
        if matches!(&self.current, Some(t) if t.is_end()) {
            return Ok(());
        }
        if let Some(token) = self.current.take() {
            self.fetch.unread(token)?;
        }
        Ok(())
    }

    /// True while there is a current token and it is not end-of-stream.
    pub fn continues(&self) -> bool {
        matches!(&self.current, Some(t) if !t.is_end())
    }

    /// 1-based line number: one plus the line terminators consumed so far.
    pub fn line_number(&self) -> u32 {
        self.line
    }

    /// The active policy.
    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// Name of the underlying source.
    pub fn source_name(&self) -> &str {
        self.fetch.source_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use descent_lang::Opcode;

    /// Fetch over a canned token sequence, with a pushback stack.
    struct Canned {
        tokens: Vec<Token>,
        pos: usize,
        pushback: Vec<Token>,
    }

    impl Canned {
        fn new(tokens: Vec<Token>) -> Canned {
            Canned {
                tokens,
                pos: 0,
                pushback: Vec::new(),
            }
        }
    }

    impl Fetch for Canned {
        fn fetch(&mut self, _policy: &ScanPolicy) -> Result<Token, ScanError> {
            if let Some(token) = self.pushback.pop() {
                return Ok(token);
            }
            match self.tokens.get(self.pos) {
                Some(token) => {
                    self.pos += 1;
                    Ok(token.clone())
                }
                None => Ok(Token::stream_end()),
            }
        }

        fn unread(&mut self, token: Token) -> Result<(), ScanError> {
            if !token.is_end() {
                self.pushback.push(token);
            }
            Ok(())
        }

        fn source_name(&self) -> &str {
            "canned"
        }
    }

    fn ident() -> Token {
        Token::symbolic(Opcode::IDENTIFIER, "x")
    }

    fn space() -> Token {
        Token::plain(Opcode::SPACE)
    }

    #[test]
    fn test_first_token_loaded_at_construction() {
        let scanner = Scanner::new(Canned::new(vec![ident()]), ScanPolicy::default()).unwrap();
        assert_eq!(scanner.current().unwrap().opcode(), Opcode::IDENTIFIER);
        assert!(scanner.continues());
    }

    #[test]
    fn test_empty_source_starts_ended() {
        let scanner = Scanner::new(Canned::new(vec![]), ScanPolicy::default()).unwrap();
        assert!(scanner.current().unwrap().is_end());
        assert!(!scanner.continues());
    }

    #[test]
    fn test_whitespace_discarded() {
        let tokens = vec![space(), ident(), space()];
        let mut scanner = Scanner::new(Canned::new(tokens), ScanPolicy::default()).unwrap();
        assert_eq!(scanner.current().unwrap().opcode(), Opcode::IDENTIFIER);
        scanner.next().unwrap();
        assert!(scanner.current().unwrap().is_end());
    }

    #[test]
    fn test_whitespace_consolidated() {
        let policy = ScanPolicy {
            discard_whitespace: false,
            consolidate_whitespace: true,
            consolidate_line_endings: false,
        };
        let tokens = vec![space(), space(), space(), ident()];
        let mut scanner = Scanner::new(Canned::new(tokens), policy).unwrap();
        assert_eq!(scanner.current().unwrap().category(), Category::SPACE);
        scanner.next().unwrap();
        assert_eq!(scanner.current().unwrap().opcode(), Opcode::IDENTIFIER);
        scanner.next().unwrap();
        assert!(scanner.current().unwrap().is_end());
    }

    #[test]
    fn test_line_endings_consolidated_and_counted() {
        let policy = ScanPolicy {
            consolidate_line_endings: true,
            ..ScanPolicy::default()
        };
        let tokens = vec![
            Token::line_ending(1),
            Token::line_ending(1),
            Token::line_ending(1),
            ident(),
        ];
        let mut scanner = Scanner::new(Canned::new(tokens), policy).unwrap();
        let current = scanner.current().unwrap();
        assert_eq!(current.opcode(), Opcode::EOL);
        assert_eq!(current.line_count(), 3);
        assert_eq!(scanner.line_number(), 4);

        scanner.next().unwrap();
        assert_eq!(scanner.current().unwrap().opcode(), Opcode::IDENTIFIER);
    }

    #[test]
    fn test_line_number_accumulates_without_consolidation() {
        let tokens = vec![Token::line_ending(2), ident(), Token::line_ending(1)];
        let mut scanner = Scanner::new(Canned::new(tokens), ScanPolicy::default()).unwrap();
        assert_eq!(scanner.line_number(), 3);
        scanner.next().unwrap();
        scanner.next().unwrap();
        assert_eq!(scanner.line_number(), 4);
    }

    #[test]
    fn test_peek_leaves_current_untouched() {
        let tokens = vec![ident(), Token::line_ending(1)];
        let mut scanner = Scanner::new(Canned::new(tokens), ScanPolicy::default()).unwrap();
        let peeked = scanner.peek().unwrap();
        assert_eq!(peeked.opcode(), Opcode::EOL);
        assert_eq!(scanner.current().unwrap().opcode(), Opcode::IDENTIFIER);

        scanner.next().unwrap();
        assert_eq!(scanner.current().unwrap().opcode(), Opcode::EOL);
    }

    #[test]
    fn test_end_state_is_sticky() {
        let mut scanner = Scanner::new(Canned::new(vec![]), ScanPolicy::default()).unwrap();
        assert!(scanner.current().unwrap().is_end());
        scanner.next().unwrap();
        scanner.rewind().unwrap();
        assert!(scanner.current().unwrap().is_end());
        assert!(!scanner.continues());
    }
}
