//! Resizable tape with a read/write head.
//!
//! The tape grows by one blank cell whenever the head would leave it, so
//! head movement is always legal. It never shrinks on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;
use crate::transition::Move;

/// Blank cells placed on each side of the input by [`Tape::set_contents`].
pub const PADDING: usize = 5;

/// A linear sequence of symbols with a head position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new("")
    }
}

impl Tape {
    /// Create a tape holding `input`.
    pub fn new(input: &str) -> Self {
        let mut tape = Self {
            cells: Vec::new(),
            head: 0,
        };
        tape.set_contents(input);
        tape
    }

    /// Re-initialize the contents: padding, the input, padding.
    ///
    /// The head lands on the first input cell, which for an empty input is
    /// the midpoint of the blank tape.
    pub fn set_contents(&mut self, input: &str) {
        self.cells = std::iter::repeat(Symbol::BLANK)
            .take(PADDING)
            .chain(input.chars().map(Symbol))
            .chain(std::iter::repeat(Symbol::BLANK).take(PADDING))
            .collect();
        self.head = PADDING;
    }

    /// Symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Overwrite the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Move the head one cell left, growing the tape at index 0 if needed.
    pub fn move_left(&mut self) {
        if self.head == 0 {
            self.cells.insert(0, Symbol::BLANK);
        } else {
            self.head -= 1;
        }
    }

    /// Move the head one cell right, growing the tape at the end if needed.
    pub fn move_right(&mut self) {
        self.head += 1;
        if self.head >= self.cells.len() {
            self.cells.push(Symbol::BLANK);
        }
        self.head = self.head.min(self.cells.len() - 1);
    }

    /// Apply a head movement.
    pub fn apply(&mut self, movement: Move) {
        match movement {
            Move::Left => self.move_left(),
            Move::Right => self.move_right(),
            Move::Stay => {}
        }
    }

    /// Put the head back on the first non-blank cell (midpoint if all blank).
    pub fn reset(&mut self) {
        self.head = self
            .cells
            .iter()
            .position(|s| !s.is_blank())
            .unwrap_or(self.cells.len() / 2);
    }

    /// Contents with leading and trailing blanks stripped.
    pub fn to_compact_string(&self) -> String {
        let start = self.cells.iter().position(|s| !s.is_blank());
        let end = self.cells.iter().rposition(|s| !s.is_blank());
        match (start, end) {
            (Some(start), Some(end)) => self.cells[start..=end]
                .iter()
                .map(|s| s.as_char())
                .collect(),
            _ => String::new(),
        }
    }

    /// Current head index.
    pub fn head(&self) -> usize {
        self.head
    }

    /// All cells.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Tape {
    /// Renders the cells with the head cell bracketed: `__[1]01__`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.cells.iter().enumerate() {
            if i == self.head {
                write!(f, "[{}]", s)?;
            } else {
                write!(f, "{}", s)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_contents_places_head_on_input() {
        let tape = Tape::new("101");
        assert_eq!(tape.len(), 3 + 2 * PADDING);
        assert_eq!(tape.head(), PADDING);
        assert_eq!(tape.read(), Symbol('1'));
    }

    #[test]
    fn test_empty_input_head_at_midpoint() {
        let tape = Tape::new("");
        assert_eq!(tape.head(), tape.len() / 2);
        assert!(tape.read().is_blank());
    }

    #[test]
    fn test_move_left_from_zero_grows_by_one() {
        let mut tape = Tape::new("");
        for _ in 0..PADDING {
            tape.move_left();
        }
        assert_eq!(tape.head(), 0);
        let before = tape.len();

        tape.move_left();

        assert_eq!(tape.len(), before + 1);
        assert_eq!(tape.head(), 0);
        assert!(tape.read().is_blank());
    }

    #[test]
    fn test_move_right_from_last_grows_by_one() {
        let mut tape = Tape::new("1");
        while tape.head() < tape.len() - 1 {
            tape.move_right();
        }
        let before = tape.len();

        tape.move_right();

        assert_eq!(tape.len(), before + 1);
        assert_eq!(tape.head(), tape.len() - 1);
    }

    #[test]
    fn test_moves_conserve_symbols() {
        let mut tape = Tape::new("1101");
        let original = tape.to_compact_string();
        for _ in 0..12 {
            tape.move_left();
        }
        for _ in 0..30 {
            tape.move_right();
        }
        tape.apply(Move::Stay);
        assert_eq!(tape.to_compact_string(), original);
    }

    #[test]
    fn test_reset_finds_first_non_blank() {
        let mut tape = Tape::new("_01");
        tape.move_right();
        tape.move_right();
        tape.move_right();
        tape.reset();
        assert_eq!(tape.head(), PADDING + 1);
        assert_eq!(tape.read(), Symbol('0'));
    }

    #[test]
    fn test_compact_string_keeps_interior_blanks() {
        let mut tape = Tape::new("1");
        tape.move_right();
        tape.move_right();
        tape.write(Symbol('0'));
        assert_eq!(tape.to_compact_string(), "1_0");
    }

    #[test]
    fn test_display_marks_head() {
        let tape = Tape::new("10");
        assert_eq!(tape.to_string(), "_____[1]0_____");
    }
}
