//! Syntax rules: named opcode sets.
//!
//! Rules drive the parser's synchronization machinery. A rule is nothing
//! more than a set of opcodes with a membership predicate; the rule *id*
//! is how client grammars refer to it through the language definition.

use crate::opcode::Opcode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Integer identifier of a syntax rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RuleId(u32);

impl RuleId {
    /// The conventional statement-terminator rule.
    pub const END_STATEMENT: RuleId = RuleId(1);
    /// First id reserved for client-defined rules.
    pub const USER: RuleId = RuleId(0x100);

    /// Builds a rule id from a raw value.
    pub const fn new(raw: u32) -> RuleId {
        RuleId(raw)
    }

    /// The raw value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule #{}", self.0)
    }
}

/// A named, unordered set of opcodes.
#[derive(Debug, Clone)]
pub struct SyntaxRule {
    id: RuleId,
    opcodes: HashSet<Opcode>,
}

impl SyntaxRule {
    /// Builds a rule from any collection of opcodes.
    pub fn new(id: RuleId, opcodes: impl IntoIterator<Item = Opcode>) -> SyntaxRule {
        SyntaxRule {
            id,
            opcodes: opcodes.into_iter().collect(),
        }
    }

    /// This rule's identifier.
    pub fn id(&self) -> RuleId {
        self.id
    }

    /// Membership predicate.
    pub fn has(&self, opcode: Opcode) -> bool {
        self.opcodes.contains(&opcode)
    }

    /// Adds an opcode to the rule.
    pub fn add(&mut self, opcode: Opcode) {
        self.opcodes.insert(opcode);
    }

    /// Number of member opcodes.
    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    /// True when the rule has no members.
    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }
}

/// Registry of rules keyed by id.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<RuleId, SyntaxRule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> RuleSet {
        RuleSet::default()
    }

    /// Defines (or redefines) the rule with `id`.
    pub fn define(&mut self, id: RuleId, opcodes: impl IntoIterator<Item = Opcode>) -> &SyntaxRule {
        self.rules.insert(id, SyntaxRule::new(id, opcodes));
        &self.rules[&id]
    }

    /// Looks up a rule by id.
    pub fn rule(&self, id: RuleId) -> Option<&SyntaxRule> {
        self.rules.get(&id)
    }

    /// Number of defined rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are defined.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let semi = Opcode::new(0x0030_0001);
        let rule = SyntaxRule::new(RuleId::END_STATEMENT, [semi, Opcode::EOS]);
        assert!(rule.has(semi));
        assert!(rule.has(Opcode::EOS));
        assert!(!rule.has(Opcode::EOL));
        assert_eq!(rule.len(), 2);
    }

    #[test]
    fn test_registry_lookup() {
        let mut set = RuleSet::new();
        set.define(RuleId::END_STATEMENT, [Opcode::EOS]);
        assert!(set.rule(RuleId::END_STATEMENT).is_some());
        assert!(set.rule(RuleId::new(99)).is_none());
    }

    #[test]
    fn test_redefine_replaces() {
        let mut set = RuleSet::new();
        set.define(RuleId::END_STATEMENT, [Opcode::EOS]);
        set.define(RuleId::END_STATEMENT, [Opcode::EOL]);
        let rule = set.rule(RuleId::END_STATEMENT).unwrap();
        assert!(rule.has(Opcode::EOL));
        assert!(!rule.has(Opcode::EOS));
    }
}
