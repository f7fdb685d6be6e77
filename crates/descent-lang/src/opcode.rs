//! Opcode and category encoding.
//!
//! Every token kind is identified by a 32-bit opcode. The high 16 bits are
//! the *category* (identifier, number, keyword, ...), the low 16 bits
//! disambiguate within a category. The category of any opcode is derivable
//! purely by masking, which is what lets the intermediate-code reader pick
//! the right token variant before it has read the payload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask isolating the category half of an opcode.
pub const CATEGORY_MASK: u32 = 0xFFFF_0000;

/// Token category: the high 16 bits of an opcode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Category(u32);

impl Category {
    /// Reserved category. Opcode zero (category `DUMMY`, low bits zero)
    /// means "no opcode" throughout the toolkit.
    pub const DUMMY: Category = Category(0x0000_0000);
    /// Identifiers; tokens of this category carry a symbol reference.
    pub const IDENTIFIER: Category = Category(0x0001_0000);
    /// Numeric literals; carry a symbol reference.
    pub const NUMBER: Category = Category(0x0002_0000);
    /// String literals; carry a symbol reference.
    pub const STRING: Category = Category(0x0003_0000);
    /// Horizontal whitespace.
    pub const SPACE: Category = Category(0x0004_0000);
    /// Line endings; tokens of this category carry a line count.
    pub const EOL: Category = Category(0x0005_0000);
    /// End of stream. Never written to intermediate code; synthesized by
    /// the reader.
    pub const EOS: Category = Category(0x0006_0000);

    /// Suggested base for keyword opcodes.
    pub const KEYWORD: Category = Category(0x0010_0000);
    /// Suggested base for operator opcodes.
    pub const OPERATOR: Category = Category(0x0020_0000);
    /// Suggested base for delimiter / special-character opcodes.
    pub const DELIMITER: Category = Category(0x0030_0000);
    /// First category value reserved for client-defined ranges.
    pub const USER: Category = Category(0x0100_0000);

    /// Builds a category from a raw masked value.
    ///
    /// Bits outside [`CATEGORY_MASK`] are cleared.
    pub const fn new(raw: u32) -> Category {
        Category(raw & CATEGORY_MASK)
    }

    /// The raw masked value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// True for the categories whose tokens carry a symbol reference:
    /// identifiers, numbers, and strings.
    pub const fn is_symbolic(self) -> bool {
        matches!(
            self,
            Category::IDENTIFIER | Category::NUMBER | Category::STRING
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Category::DUMMY => "dummy",
            Category::IDENTIFIER => "identifier",
            Category::NUMBER => "number",
            Category::STRING => "string",
            Category::SPACE => "space",
            Category::EOL => "end-of-line",
            Category::EOS => "end-of-stream",
            Category::KEYWORD => "keyword",
            Category::OPERATOR => "operator",
            Category::DELIMITER => "delimiter",
            _ => return write!(f, "category {:#010x}", self.0),
        };
        f.write_str(name)
    }
}

/// A 32-bit token-kind identifier.
///
/// Opcode zero ([`Opcode::NONE`]) is reserved as "not a real opcode": the
/// dictionary returns it for unknown strings and refuses to bind it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Opcode(u32);

impl Opcode {
    /// The reserved "no opcode" value.
    pub const NONE: Opcode = Opcode(0);

    /// Canonical identifier opcode (category bits only).
    pub const IDENTIFIER: Opcode = Opcode(Category::IDENTIFIER.0);
    /// Canonical number opcode.
    pub const NUMBER: Opcode = Opcode(Category::NUMBER.0);
    /// Canonical string opcode.
    pub const STRING: Opcode = Opcode(Category::STRING.0);
    /// Canonical whitespace opcode.
    pub const SPACE: Opcode = Opcode(Category::SPACE.0);
    /// Canonical line-ending opcode.
    pub const EOL: Opcode = Opcode(Category::EOL.0);
    /// Canonical end-of-stream opcode.
    pub const EOS: Opcode = Opcode(Category::EOS.0);

    /// Builds an opcode from a raw 32-bit value.
    pub const fn new(raw: u32) -> Opcode {
        Opcode(raw)
    }

    /// Builds an opcode from a category and a low-half discriminator.
    pub const fn from_parts(category: Category, low: u16) -> Opcode {
        Opcode(category.0 | low as u32)
    }

    /// The raw 32-bit value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The category half of this opcode.
    pub const fn category(self) -> Category {
        Category(self.0 & CATEGORY_MASK)
    }

    /// The low-half discriminator.
    pub const fn low(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// True for the reserved zero opcode.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// True for any real opcode.
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// True when tokens of this opcode carry a symbol reference.
    pub const fn is_symbolic(self) -> bool {
        self.category().is_symbolic()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:#06x}", self.category(), self.low())
    }
}

impl From<u32> for Opcode {
    fn from(raw: u32) -> Opcode {
        Opcode(raw)
    }
}
