//! Fetch strategy over UTF-8 source text.
//!
//! Classification is driven by the language definition: identifier-shaped
//! text is case-folded and looked up (a hit is a keyword, a miss an
//! identifier), everything that is neither identifier, number, string,
//! whitespace, nor line ending is matched maximal-munch against the
//! dictionary's operator and delimiter keys.
//!
//! The scanner reports trouble in-band rather than through a log it does
//! not have: an unterminated string or an unmatchable character becomes a
//! `DUMMY`-category token for the parser's recovery machinery to deal
//! with.

use crate::scanner::{Fetch, ScanError, ScanPolicy, Scanner};
use descent_lang::{Category, Language, Opcode};
use descent_stream::Token;
use std::rc::Rc;
use tracing::trace;

/// Produces tokens by tokenizing source text.
///
/// `unread` is a pushback stack: byte positions in text cannot be rewound
/// by on-stream record sizes, so returned tokens are simply replayed.
#[derive(Debug)]
pub struct SourceFetch {
    language: Rc<Language>,
    name: String,
    text: String,
    pos: usize,
    pushback: Vec<Token>,
}

impl SourceFetch {
    /// Builds a tokenizer over `text`.
    pub fn new(language: Rc<Language>, name: impl Into<String>, text: impl Into<String>) -> SourceFetch {
        SourceFetch {
            language,
            name: name.into(),
            text: text.into(),
            pos: 0,
            pushback: Vec::new(),
        }
    }

    /// The language definition in use.
    pub fn language(&self) -> &Language {
        &self.language
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    /// Scans a run of line terminators, consuming the whole run only when
    /// consolidation is on. `\r\n` counts as one terminator.
    fn scan_line_endings(&mut self, consolidate: bool) -> Token {
        let mut count = 0u32;
        loop {
            let rest = self.rest();
            if rest.starts_with("\r\n") {
                self.pos += 2;
            } else if rest.starts_with('\n') || rest.starts_with('\r') {
                self.pos += 1;
            } else {
                break;
            }
            count += 1;
            if !consolidate {
                break;
            }
        }
        Token::line_ending(count)
    }

    /// Scans horizontal whitespace: one character, or the whole run when
    /// the policy discards or consolidates whitespace.
    fn scan_whitespace(&mut self, run: bool) -> Token {
        loop {
            match self.rest().chars().next() {
                Some(c) if is_inline_space(c) => self.pos += c.len_utf8(),
                _ => break,
            }
            if !run {
                break;
            }
        }
        Token::plain(Opcode::SPACE)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.rest().chars().next() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let lexeme = &self.text[start..self.pos];
        let opcode = self.language.lookup_identifier(lexeme);
        if opcode.is_some() {
            Token::plain(opcode)
        } else {
            Token::symbolic(Opcode::IDENTIFIER, lexeme)
        }
    }

    /// Scans a numeric literal. Deliberately permissive: digits with any
    /// interspersed letters or dots (covers fractions, exponents, and
    /// base-suffix styles); validation belongs to the client grammar.
    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.rest().chars().next() {
            if c.is_ascii_alphanumeric() || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        Token::symbolic(Opcode::NUMBER, &self.text[start..self.pos])
    }

    /// Scans a quoted string, decoding escapes. An unterminated string
    /// (line ending or end of text before the closing quote) yields a
    /// `DUMMY`-category token.
    fn scan_string(&mut self) -> Token {
        let quote = self.rest().chars().next().expect("caller saw a quote");
        self.pos += quote.len_utf8();

        let mut decoded = String::new();
        loop {
            let Some(c) = self.rest().chars().next() else {
                return self.unterminated(quote);
            };
            match c {
                '\n' | '\r' => return self.unterminated(quote),
                '\\' => {
                    self.pos += 1;
                    let Some(esc) = self.rest().chars().next() else {
                        return self.unterminated(quote);
                    };
                    self.pos += esc.len_utf8();
                    match esc {
                        'n' => decoded.push('\n'),
                        'r' => decoded.push('\r'),
                        't' => decoded.push('\t'),
                        '0' => decoded.push('\0'),
                        'x' => {
                            let hex = self.rest().get(..2).unwrap_or("");
                            match u8::from_str_radix(hex, 16) {
                                Ok(byte) if hex.len() == 2 => {
                                    self.pos += 2;
                                    decoded.push(byte as char);
                                }
                                _ => return self.unterminated(quote),
                            }
                        }
                        other => decoded.push(other),
                    }
                }
                c if c == quote => {
                    self.pos += c.len_utf8();
                    return Token::symbolic(Opcode::STRING, decoded);
                }
                c => {
                    self.pos += c.len_utf8();
                    decoded.push(c);
                }
            }
        }
    }

    fn unterminated(&self, quote: char) -> Token {
        trace!(source = %self.name, "unterminated string literal");
        Token::plain(Opcode::from_parts(Category::DUMMY, quote as u16))
    }

    /// Maximal-munch match against the dictionary's special keys.
    fn scan_special(&mut self) -> Token {
        let max = self.language.max_special_len();
        if max > 0 {
            let mut ends = Vec::with_capacity(max);
            for (offset, c) in self.rest().char_indices().take(max) {
                ends.push(offset + c.len_utf8());
            }
            for &end in ends.iter().rev() {
                let opcode = self.language.lookup(&self.rest()[..end]);
                if opcode.is_some() {
                    self.pos += end;
                    return Token::plain(opcode);
                }
            }
        }

        let c = self.rest().chars().next().expect("caller saw a character");
        self.pos += c.len_utf8();
        trace!(source = %self.name, character = %c, "no opcode for character");
        Token::plain(Opcode::from_parts(Category::DUMMY, (c as u32 & 0xFFFF) as u16))
    }
}

impl Fetch for SourceFetch {
    fn fetch(&mut self, policy: &ScanPolicy) -> Result<Token, ScanError> {
        if let Some(token) = self.pushback.pop() {
            return Ok(token);
        }
        let Some(c) = self.rest().chars().next() else {
            return Ok(Token::stream_end());
        };

        let token = if c == '\n' || c == '\r' {
            self.scan_line_endings(policy.consolidate_line_endings)
        } else if is_inline_space(c) {
            self.scan_whitespace(policy.discard_whitespace || policy.consolidate_whitespace)
        } else if c.is_ascii_alphabetic() || c == '_' {
            self.scan_identifier()
        } else if c.is_ascii_digit() {
            self.scan_number()
        } else if c == '"' || c == '\'' {
            self.scan_string()
        } else {
            self.scan_special()
        };
        Ok(token)
    }

    fn unread(&mut self, token: Token) -> Result<(), ScanError> {
        if !token.is_end() {
            self.pushback.push(token);
        }
        Ok(())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

impl Scanner<SourceFetch> {
    /// Builds a scanner over source text and loads the first token.
    pub fn over_source(
        language: Rc<Language>,
        name: impl Into<String>,
        text: impl Into<String>,
        policy: ScanPolicy,
    ) -> Result<Scanner<SourceFetch>, ScanError> {
        Scanner::new(SourceFetch::new(language, name, text), policy)
    }
}

fn is_inline_space(c: char) -> bool {
    c != '\n' && c != '\r' && c.is_whitespace()
}
