//! Tape symbols and alphabets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tape symbol.
///
/// Serialized as a one-character JSON string (`"0"`, `"_"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub char);

impl Symbol {
    /// The blank symbol every alphabet contains.
    pub const BLANK: Symbol = Symbol('_');

    /// Create a symbol from a character.
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    /// Check if this is the blank symbol.
    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }

    /// Get the underlying character.
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::BLANK
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered, duplicate-free set of symbols that always includes the blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    /// Build an alphabet, dropping duplicates and appending the blank if missing.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut out: Vec<Symbol> = Vec::new();
        for s in symbols {
            if !out.contains(&s) {
                out.push(s);
            }
        }
        if !out.contains(&Symbol::BLANK) {
            out.push(Symbol::BLANK);
        }
        Self { symbols: out }
    }

    /// The `{0, 1, _}` alphabet used by the sandbox.
    pub fn binary() -> Self {
        Self::new(['0', '1', '_'].map(Symbol))
    }

    /// Build an alphabet from the characters of a string (`"01_"`).
    pub fn parse(chars: &str) -> Self {
        Self::new(chars.chars().filter(|c| !c.is_whitespace()).map(Symbol))
    }

    /// Check membership.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    /// Number of symbols, blank included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// An alphabet always holds the blank, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Return the first character of `input` that is not part of the alphabet.
    pub fn first_foreign(&self, input: &str) -> Option<char> {
        input.chars().find(|c| !self.contains(Symbol(*c)))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::binary()
    }
}

impl From<Vec<Symbol>> for Alphabet {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self::new(symbols)
    }
}

impl From<Alphabet> for Vec<Symbol> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.symbols.iter().map(|s| s.to_string()).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
