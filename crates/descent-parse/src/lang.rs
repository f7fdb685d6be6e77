//! Language-aware driver capabilities: rules by id, `parse_until`.

use crate::driver::{DriverError, DriverResult, Parser};
use crate::grammar::Grammar;
use descent_scan::Fetch;
use descent_lang::{RuleId, SyntaxRule};
use tracing::warn;

impl<F: Fetch> Parser<F> {
    /// Resolves a rule by id on the installed language. Cloned out so the
    /// caller can keep driving the parser while holding it.
    pub(crate) fn rule_by_id(&self, id: RuleId) -> Option<SyntaxRule> {
        self.language
            .as_ref()
            .and_then(|language| language.syntax_rule(id))
            .cloned()
    }

    /// [`Parser::resync_to`] by rule id; a no-op when the id is unknown.
    pub fn resync_to_rule(&mut self, id: RuleId, message: impl Into<String>) -> DriverResult<()> {
        match self.rule_by_id(id) {
            Some(rule) => self.resync_to(&rule, message),
            None => Ok(()),
        }
    }

    /// [`Parser::skip_to`] by rule id; a no-op when the id is unknown.
    pub fn skip_to_rule(&mut self, id: RuleId, silence: bool) -> DriverResult<()> {
        match self.rule_by_id(id) {
            Some(rule) => self.skip_to(&rule, silence),
            None => Ok(()),
        }
    }

    /// [`Parser::skip_over`] by rule id; a no-op when the id is unknown.
    pub fn skip_over_rule(&mut self, id: RuleId, silence: bool) -> DriverResult<()> {
        match self.rule_by_id(id) {
            Some(rule) => self.skip_over(&rule, silence),
            None => Ok(()),
        }
    }

    /// Drives `grammar` until the current token is a member of rule `id`.
    ///
    /// After each inner `parse`: end-of-stream terminates successfully
    /// when the rule includes the end-of-stream opcode and fatally when it
    /// does not; a current token inside the rule terminates; anything
    /// else advances one token and goes around again.
    ///
    /// Returns the number of (non-fatal) errors the inner `parse` calls
    /// logged. An unknown rule id is [`DriverError::UnknownRule`].
    pub fn parse_until<G: Grammar<F>>(
        &mut self,
        id: RuleId,
        grammar: &mut G,
    ) -> DriverResult<usize> {
        let Some(rule) = self.rule_by_id(id) else {
            return Err(DriverError::UnknownRule { id });
        };
        let errors_before = self.log.borrow().errors();
        loop {
            grammar.parse(self)?;
            match self.current() {
                None => self.next_token()?,
                Some(token) if token.is_end() => {
                    if token.is_part_of(&rule) {
                        break;
                    }
                    warn!(rule = %id, "stream ended while a terminator was required");
                    let fatal = self.log.borrow_mut().fatal(
                        self.scanner.source_name(),
                        self.scanner.line_number(),
                        "unexpected end of stream",
                    );
                    return Err(fatal.into());
                }
                Some(token) if token.is_part_of(&rule) => break,
                Some(_) => self.next_token()?,
            }
        }
        Ok(self.log.borrow().errors() - errors_before)
    }
}
