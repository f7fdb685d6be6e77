//! The token model and its binary record format.
//!
//! A token is a small tagged record: an opcode, a parser-local `silenced`
//! flag, and a payload determined by the opcode's category. The deep token
//! class hierarchy of classic front ends collapses into [`Payload`]:
//!
//! - [`Payload::Plain`] — keywords, operators, delimiters, whitespace;
//! - [`Payload::Symbol`] — identifiers, numbers, strings; carries the
//!   `(scope, index)` reference into a symbol vector, plus the source
//!   lexeme while the token is still on the textual side of the pipeline;
//! - [`Payload::LineEnding`] — one or more consolidated line terminators;
//! - [`Payload::StreamEnd`] — the synthesized end-of-stream sentinel.

use crate::io::{CodeStream, StreamError};
use descent_lang::{Category, Opcode, ScopeId, SymbolRef, SyntaxRule};
use std::fmt;

/// Largest token record: opcode (4) + symbol reference (8).
pub const MAX_RECORD_LEN: usize = 12;

/// Per-category token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No payload beyond the opcode.
    Plain,
    /// Symbol reference, plus the lexeme when scanned from text.
    ///
    /// The lexeme never reaches the intermediate-code stream; recalled
    /// tokens always carry `None`.
    Symbol {
        reference: SymbolRef,
        lexeme: Option<Box<str>>,
    },
    /// Count of consecutive line terminators this token stands for.
    LineEnding { count: u32 },
    /// End of stream; never written, synthesized by the reader.
    StreamEnd,
}

/// A scanned or recalled token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    opcode: Opcode,
    silenced: bool,
    payload: Payload,
}

impl Token {
    /// A payload-free token.
    pub fn plain(opcode: Opcode) -> Token {
        debug_assert!(
            !opcode.is_symbolic() && opcode.category() != Category::EOL,
            "plain token constructed with payload-carrying opcode {opcode}"
        );
        Token {
            opcode,
            silenced: false,
            payload: Payload::Plain,
        }
    }

    /// A symbolic token with an unplaced reference and a source lexeme.
    pub fn symbolic(opcode: Opcode, lexeme: impl Into<Box<str>>) -> Token {
        debug_assert!(opcode.is_symbolic(), "non-symbolic opcode {opcode}");
        Token {
            opcode,
            silenced: false,
            payload: Payload::Symbol {
                reference: SymbolRef::NONE,
                lexeme: Some(lexeme.into()),
            },
        }
    }

    /// A symbolic token recalled with a placed reference.
    pub fn recalled(opcode: Opcode, reference: SymbolRef) -> Token {
        debug_assert!(opcode.is_symbolic(), "non-symbolic opcode {opcode}");
        Token {
            opcode,
            silenced: false,
            payload: Payload::Symbol {
                reference,
                lexeme: None,
            },
        }
    }

    /// A line-ending token standing for `count >= 1` terminators.
    pub fn line_ending(count: u32) -> Token {
        debug_assert!(count >= 1, "line-ending token with zero count");
        Token {
            opcode: Opcode::EOL,
            silenced: false,
            payload: Payload::LineEnding { count },
        }
    }

    /// The end-of-stream sentinel.
    pub fn stream_end() -> Token {
        Token {
            opcode: Opcode::EOS,
            silenced: false,
            payload: Payload::StreamEnd,
        }
    }

    /// This token's opcode.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// This token's category (opcode high bits).
    pub fn category(&self) -> Category {
        self.opcode.category()
    }

    /// The payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// True for the end-of-stream sentinel.
    pub fn is_end(&self) -> bool {
        matches!(self.payload, Payload::StreamEnd)
    }

    /// Sets the silenced flag, returning the previous value.
    ///
    /// Silencing is parser-local and never persisted; it suppresses the
    /// token when the parser re-emits its stream.
    pub fn silence(&mut self, silenced: bool) -> bool {
        std::mem::replace(&mut self.silenced, silenced)
    }

    /// The silenced flag.
    pub fn is_silenced(&self) -> bool {
        self.silenced
    }

    /// Rule-membership test.
    pub fn is_part_of(&self, rule: &SyntaxRule) -> bool {
        rule.has(self.opcode)
    }

    /// The symbol reference, for symbolic tokens.
    pub fn symbol_ref(&self) -> Option<SymbolRef> {
        match &self.payload {
            Payload::Symbol { reference, .. } => Some(*reference),
            _ => None,
        }
    }

    /// Points a symbolic token at a placed symbol. No-op otherwise.
    pub fn set_symbol_ref(&mut self, reference: SymbolRef) {
        if let Payload::Symbol { reference: slot, .. } = &mut self.payload {
            *slot = reference;
        }
    }

    /// The source lexeme, for symbolic tokens scanned from text.
    pub fn lexeme(&self) -> Option<&str> {
        match &self.payload {
            Payload::Symbol { lexeme, .. } => lexeme.as_deref(),
            _ => None,
        }
    }

    /// The line count, for line-ending tokens.
    pub fn line_count(&self) -> u32 {
        match self.payload {
            Payload::LineEnding { count } => count,
            _ => 0,
        }
    }

    /// On-stream size of this token in bytes.
    ///
    /// This is the distance `return_to` rewinds so the next read
    /// reproduces the token.
    pub fn streaming_len(&self) -> usize {
        match self.payload {
            Payload::Plain => 4,
            Payload::Symbol { .. } => 12,
            Payload::LineEnding { .. } => 8,
            Payload::StreamEnd => 0,
        }
    }

    /// Reads the next token record from `stream`.
    ///
    /// The factory inspects the opcode's category to pick the payload
    /// shape. When the stream has ended (or yields no bytes for the
    /// opcode) the end-of-stream token is synthesized; a *partial* record
    /// is a [`StreamError::Truncated`].
    pub fn read_from(stream: &mut dyn CodeStream) -> Result<Token, StreamError> {
        if stream.has_ended() {
            return Ok(Token::stream_end());
        }

        let mut word = [0u8; 4];
        let got = stream.read(&mut word)?;
        if got == 0 {
            return Ok(Token::stream_end());
        }
        if got != 4 {
            return Err(StreamError::Truncated {
                name: stream.name().to_string(),
                wanted: 4,
                got,
            });
        }
        let opcode = Opcode::new(u32::from_ne_bytes(word));

        let payload = match opcode.category() {
            Category::EOS => Payload::StreamEnd,
            Category::EOL => {
                let mut count = [0u8; 4];
                stream.read_exact(&mut count)?;
                Payload::LineEnding {
                    count: u32::from_ne_bytes(count),
                }
            }
            cat if cat.is_symbolic() => {
                let mut halves = [0u8; 8];
                stream.read_exact(&mut halves)?;
                let scope = i32::from_ne_bytes(halves[..4].try_into().unwrap());
                let index = i32::from_ne_bytes(halves[4..].try_into().unwrap());
                Payload::Symbol {
                    reference: SymbolRef::new(ScopeId::new(scope), index),
                    lexeme: None,
                }
            }
            _ => Payload::Plain,
        };

        Ok(Token {
            opcode,
            silenced: false,
            payload,
        })
    }

    /// Writes this token's record to `stream`, returning the bytes
    /// written. The end-of-stream token writes nothing; the silenced flag
    /// is never persisted.
    pub fn write_to(&self, stream: &mut dyn CodeStream) -> Result<usize, StreamError> {
        let mut record = [0u8; MAX_RECORD_LEN];
        let len = self.streaming_len();
        if len == 0 {
            return Ok(0);
        }
        record[..4].copy_from_slice(&self.opcode.raw().to_ne_bytes());
        match &self.payload {
            Payload::Symbol { reference, .. } => {
                record[4..8].copy_from_slice(&reference.scope.raw().to_ne_bytes());
                record[8..12].copy_from_slice(&reference.index.to_ne_bytes());
            }
            Payload::LineEnding { count } => {
                record[4..8].copy_from_slice(&count.to_ne_bytes());
            }
            Payload::Plain | Payload::StreamEnd => {}
        }
        stream.write(&record[..len])
    }

    /// Returns this token to `stream`: rewinds by [`Self::streaming_len`]
    /// and consumes the in-memory token, so the next read reproduces it.
    /// A no-op for the end-of-stream token.
    pub fn return_to(self, stream: &mut dyn CodeStream) -> Result<(), StreamError> {
        match self.streaming_len() {
            0 => Ok(()),
            n => stream.rewind_by(n),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Symbol {
                lexeme: Some(text), ..
            } => write!(f, "{} '{}'", self.opcode, text),
            Payload::Symbol { reference, .. } => write!(f, "{} {}", self.opcode, reference),
            Payload::LineEnding { count } => write!(f, "{} x{}", self.opcode, count),
            _ => write!(f, "{}", self.opcode),
        }
    }
}
