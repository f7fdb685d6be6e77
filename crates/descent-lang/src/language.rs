//! The language definition consumed by scanners and parsers.

use crate::dict::OpcodeDictionary;
use crate::opcode::Opcode;
use crate::rules::{RuleId, RuleSet, SyntaxRule};
use serde::{Deserialize, Serialize};

/// Case-folding policy applied to identifiers before dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseFolding {
    /// Identifiers are looked up as written.
    #[default]
    Preserve,
    /// Identifiers are lowercased before lookup (case-insensitive
    /// languages binding lowercase keywords).
    Lower,
    /// Identifiers are uppercased before lookup.
    Upper,
}

impl CaseFolding {
    /// Applies the policy to `text`.
    pub fn apply(self, text: &str) -> String {
        match self {
            CaseFolding::Preserve => text.to_string(),
            CaseFolding::Lower => text.to_ascii_lowercase(),
            CaseFolding::Upper => text.to_ascii_uppercase(),
        }
    }
}

/// A language definition: opcode dictionary + syntax rules + case folding.
///
/// The definition is built up front (typically once, at client start-up)
/// and then shared immutably by scanners and parsers.
#[derive(Debug, Clone, Default)]
pub struct Language {
    dictionary: OpcodeDictionary,
    rules: RuleSet,
    folding: CaseFolding,
    /// Longest bound key that does not scan as an identifier; the source
    /// scanner's maximal-munch window for operators and delimiters.
    max_special_len: usize,
}

impl Language {
    /// Creates an empty, case-preserving language.
    pub fn new() -> Language {
        Language::default()
    }

    /// Creates an empty language with the given folding policy.
    pub fn with_folding(folding: CaseFolding) -> Language {
        Language {
            folding,
            ..Language::default()
        }
    }

    /// The case-folding policy.
    pub fn folding(&self) -> CaseFolding {
        self.folding
    }

    /// Binds `text` to `opcode`, applying the folding policy to the key.
    ///
    /// Folding at bind time keeps the dictionary consistent with folded
    /// lookups; it is the identity on non-alphabetic keys.
    pub fn bind(&mut self, text: &str, opcode: Opcode) -> Option<Opcode> {
        let key = self.folding.apply(text);
        let bound = self.dictionary.bind(&key, opcode);
        if bound.is_some() && !is_identifier_shaped(&key) {
            self.max_special_len = self.max_special_len.max(key.chars().count());
        }
        bound
    }

    /// Bulk-binds parallel slices; see [`OpcodeDictionary::bind_many`].
    pub fn bind_many(&mut self, texts: &[&str], opcodes: &[u32]) -> usize {
        if texts.len() != opcodes.len() {
            return 0;
        }
        texts
            .iter()
            .zip(opcodes)
            .filter(|(text, raw)| self.bind(text, Opcode::new(**raw)).is_some())
            .count()
    }

    /// Looks up raw text without folding (operators, delimiters).
    pub fn lookup(&self, text: &str) -> Opcode {
        self.dictionary.lookup(text)
    }

    /// Looks up an identifier, applying the folding policy first.
    pub fn lookup_identifier(&self, text: &str) -> Opcode {
        self.dictionary.lookup(&self.folding.apply(text))
    }

    /// Defines a syntax rule.
    pub fn define_rule(
        &mut self,
        id: RuleId,
        opcodes: impl IntoIterator<Item = Opcode>,
    ) -> &SyntaxRule {
        self.rules.define(id, opcodes)
    }

    /// Looks up a syntax rule by id.
    pub fn syntax_rule(&self, id: RuleId) -> Option<&SyntaxRule> {
        self.rules.rule(id)
    }

    /// The opcode dictionary.
    pub fn dictionary(&self) -> &OpcodeDictionary {
        &self.dictionary
    }

    /// Longest non-identifier-shaped key bound so far, in characters.
    pub fn max_special_len(&self) -> usize {
        self.max_special_len
    }
}

/// True when `text` would scan as an identifier (and is therefore matched
/// via identifier lookup rather than maximal munch).
fn is_identifier_shaped(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Category;

    #[test]
    fn test_folded_bind_and_lookup() {
        let mut lang = Language::with_folding(CaseFolding::Upper);
        let op = Opcode::from_parts(Category::KEYWORD, 1);
        lang.bind("if", op);
        assert_eq!(lang.lookup_identifier("IF"), op);
        assert_eq!(lang.lookup_identifier("If"), op);
        assert_eq!(lang.lookup_identifier("iff"), Opcode::NONE);
    }

    #[test]
    fn test_preserve_is_case_sensitive() {
        let mut lang = Language::new();
        let op = Opcode::from_parts(Category::KEYWORD, 1);
        lang.bind("if", op);
        assert_eq!(lang.lookup_identifier("if"), op);
        assert_eq!(lang.lookup_identifier("IF"), Opcode::NONE);
    }

    #[test]
    fn test_max_special_len_tracks_operators_only() {
        let mut lang = Language::new();
        lang.bind("identifierlike", Opcode::from_parts(Category::KEYWORD, 1));
        assert_eq!(lang.max_special_len(), 0);
        lang.bind("<", Opcode::from_parts(Category::OPERATOR, 1));
        lang.bind("<<=", Opcode::from_parts(Category::OPERATOR, 2));
        assert_eq!(lang.max_special_len(), 3);
    }

    #[test]
    fn test_rules_reachable_through_language() {
        let mut lang = Language::new();
        let semi = Opcode::from_parts(Category::DELIMITER, 1);
        lang.define_rule(RuleId::END_STATEMENT, [semi]);
        assert!(lang.syntax_rule(RuleId::END_STATEMENT).unwrap().has(semi));
        assert!(lang.syntax_rule(RuleId::new(77)).is_none());
    }
}
