//! The parser driver's state and base capabilities.

use descent_lang::{DiagnosticLog, FatalError, Language, RuleId, ScopeId, SyntaxRule};
use descent_scan::{Fetch, ScanError, Scanner};
use descent_stream::{CodeStream, StreamError, Token, TokenList};
use descent_symbol::SymbolTableVector;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// Failures that unwind a parse.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Fatal(#[from] FatalError),

    #[error("no syntax rule with id {id}")]
    UnknownRule { id: RuleId },

    #[error("no output stream configured")]
    MissingOutput,
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Everything a recursive-descent grammar leans on.
///
/// A *root* parser is built with [`Parser::source`] (phase one, emitting
/// intermediate code) or [`Parser::recall`] (phase two, reading it back)
/// and owns its collaborators. A *child* parser built with
/// [`Parser::for_source`] shares its parent's language, symbol tables,
/// output, and log, so nested sources parse into one symbol universe.
pub struct Parser<F: Fetch> {
    pub(crate) scanner: Scanner<F>,
    pub(crate) lookback: TokenList,
    pub(crate) log: Rc<RefCell<DiagnosticLog>>,
    pub(crate) language: Option<Rc<Language>>,
    pub(crate) output: Option<Rc<RefCell<dyn CodeStream>>>,
    pub(crate) symbols: Option<Rc<RefCell<SymbolTableVector>>>,
    pub(crate) current_scope: ScopeId,
    pub(crate) needs_output: bool,
}

impl<F: Fetch> Parser<F> {
    /// A root parser for the source phase: it will emit intermediate
    /// code, so [`Parser::ready_to_parse`] insists on an output stream.
    pub fn source(scanner: Scanner<F>, log: Rc<RefCell<DiagnosticLog>>) -> Parser<F> {
        Parser {
            scanner,
            lookback: TokenList::new(),
            log,
            language: None,
            output: None,
            symbols: None,
            current_scope: ScopeId::NONE,
            needs_output: true,
        }
    }

    /// A root parser for the recall phase: no output stream required.
    pub fn recall(scanner: Scanner<F>, log: Rc<RefCell<DiagnosticLog>>) -> Parser<F> {
        Parser {
            needs_output: false,
            ..Parser::source(scanner, log)
        }
    }

    /// A child parser over a nested source, borrowing the parent's
    /// language, symbol tables, output, and log, and starting in the
    /// parent's current scope.
    pub fn for_source<G: Fetch>(scanner: Scanner<F>, parent: &Parser<G>) -> Parser<F> {
        Parser {
            scanner,
            lookback: TokenList::new(),
            log: Rc::clone(&parent.log),
            language: parent.language.clone(),
            output: parent.output.clone(),
            symbols: parent.symbols.clone(),
            current_scope: parent.current_scope,
            needs_output: parent.needs_output,
        }
    }

    /// Installs the language definition.
    pub fn set_language(&mut self, language: Rc<Language>) {
        self.language = Some(language);
    }

    /// Installs the intermediate-code output stream.
    pub fn set_output(&mut self, output: Rc<RefCell<dyn CodeStream>>) {
        self.output = Some(output);
    }

    /// Installs a symbol-table vector (normally left to
    /// [`Parser::ready_to_parse`], which builds a default one).
    pub fn set_symbols(&mut self, symbols: Rc<RefCell<SymbolTableVector>>) {
        self.symbols = Some(symbols);
    }

    /// The language definition, when installed.
    pub fn language(&self) -> Option<&Rc<Language>> {
        self.language.as_ref()
    }

    /// The shared diagnostic log.
    pub fn log(&self) -> &Rc<RefCell<DiagnosticLog>> {
        &self.log
    }

    /// The shared symbol tables, when present.
    pub fn symbols(&self) -> Option<&Rc<RefCell<SymbolTableVector>>> {
        self.symbols.as_ref()
    }

    /// The scope symbols currently enter into; `NONE` until readied.
    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    /// The scanner.
    pub fn scanner(&self) -> &Scanner<F> {
        &self.scanner
    }

    /// Mutable access to the scanner (policy changes, silencing).
    pub fn scanner_mut(&mut self) -> &mut Scanner<F> {
        &mut self.scanner
    }

    /// Layered precondition check; each layer fails independently.
    ///
    /// Base: a source and a log (structural here). Language layer: a
    /// language definition must be installed (children inherit one at
    /// construction). Source layer: an output stream, for parsers that
    /// emit. Symbol layer: a symbol-table vector — built on the spot,
    /// holding a single global table, when absent; either way the current
    /// scope comes out global if it was still unset.
    pub fn ready_to_parse(&mut self) -> bool {
        if self.language.is_none() {
            return false;
        }
        if self.needs_output && self.output.is_none() {
            return false;
        }
        if self.symbols.is_none() {
            self.symbols = Some(Rc::new(RefCell::new(SymbolTableVector::new())));
        }
        if self.current_scope.is_none() {
            self.current_scope = ScopeId::GLOBAL;
        }
        true
    }

    /// The current token.
    pub fn current(&self) -> Option<&Token> {
        self.scanner.current()
    }

    /// True while the current token exists and is not end-of-stream.
    pub fn continues(&self) -> bool {
        self.scanner.continues()
    }

    /// Advances to the next token. The previous current token moves onto
    /// the lookback list; the end-of-stream token never does.
    pub fn next_token(&mut self) -> DriverResult<()> {
        if matches!(self.scanner.current(), Some(token) if !token.is_end()) {
            if let Some(token) = self.scanner.take_current() {
                self.lookback.push(token);
            }
        }
        self.scanner.next()?;
        Ok(())
    }

    /// The most recently consumed token.
    pub fn previous_token(&self) -> Option<&Token> {
        self.lookback.last()
    }

    /// The lookback list.
    pub fn lookback(&self) -> &TokenList {
        &self.lookback
    }

    /// Looks at the token after the current one.
    pub fn peek(&mut self) -> DriverResult<Token> {
        Ok(self.scanner.peek()?)
    }

    /// Returns the current token to the scanner's source.
    pub fn put_back(&mut self) -> DriverResult<()> {
        self.scanner.rewind()?;
        Ok(())
    }

    /// Logs a syntax error at the current position, then advances until
    /// the current token is a member of `rule` or the stream ends.
    pub fn resync_to(&mut self, rule: &SyntaxRule, message: impl Into<String>) -> DriverResult<()> {
        let message = message.into();
        debug!(rule = %rule.id(), line = self.scanner.line_number(), "resynchronizing: {message}");
        self.log.borrow_mut().syntax_error(
            self.scanner.source_name(),
            self.scanner.line_number(),
            message,
        );
        while self.continues() && !self.current_is_in(rule) {
            self.next_token()?;
        }
        Ok(())
    }

    /// Advances until the current token is a member of `rule` or the
    /// stream ends, without logging. Skipped tokens are optionally
    /// silenced so re-emission drops them.
    pub fn skip_to(&mut self, rule: &SyntaxRule, silence: bool) -> DriverResult<()> {
        while self.continues() && !self.current_is_in(rule) {
            if silence {
                if let Some(token) = self.scanner.current_mut() {
                    token.silence(true);
                }
            }
            self.next_token()?;
        }
        Ok(())
    }

    /// Advances over a run of tokens that *are* members of `rule`.
    pub fn skip_over(&mut self, rule: &SyntaxRule, silence: bool) -> DriverResult<()> {
        while self.continues() && self.current_is_in(rule) {
            if silence {
                if let Some(token) = self.scanner.current_mut() {
                    token.silence(true);
                }
            }
            self.next_token()?;
        }
        Ok(())
    }

    fn current_is_in(&self, rule: &SyntaxRule) -> bool {
        matches!(self.scanner.current(), Some(token) if token.is_part_of(rule))
    }

    /// Writes the current token to the output stream; silenced tokens
    /// write nothing. Returns the bytes written.
    pub fn write_current(&mut self) -> DriverResult<usize> {
        let Some(token) = self.scanner.current() else {
            return Ok(0);
        };
        if token.is_silenced() {
            return Ok(0);
        }
        let output = self.output.as_ref().ok_or(DriverError::MissingOutput)?;
        let written = token.write_to(&mut *output.borrow_mut())?;
        Ok(written)
    }

    /// Drains the lookback list to the output stream, oldest first,
    /// suppressing silenced tokens. Returns the bytes written.
    pub fn flush_lookback(&mut self) -> DriverResult<usize> {
        let output = self.output.as_ref().ok_or(DriverError::MissingOutput)?;
        let mut output = output.borrow_mut();
        let mut written = 0;
        for token in self.lookback.drain() {
            if !token.is_silenced() {
                written += token.write_to(&mut *output)?;
            }
        }
        Ok(written)
    }
}
