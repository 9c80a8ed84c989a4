//! This module defines the `Tape`: a sparse, two-way-unbounded sequence of symbols with a single
//! read/write head. Only cells that were seeded, written, or visited by the head are stored;
//! every other position implicitly holds [`BLANK`].

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{input_symbol, Direction, BLANK};

/// A single tape addressed by signed positions, with the head starting at position 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
    head: i64,
}

impl Tape {
    /// Creates a tape seeded with `input` at positions `0..n-1`.
    ///
    /// Occurrences of [`crate::types::INPUT_BLANK_SYMBOL`] are rewritten to the blank symbol.
    pub fn new(input: &str) -> Self {
        Self::from_symbols(input.chars().map(input_symbol))
    }

    /// Creates a tape seeded verbatim with `symbols` at positions `0..n-1`.
    pub fn from_symbols(symbols: impl IntoIterator<Item = char>) -> Self {
        Self {
            cells: (0..).zip(symbols).collect(),
            head: 0,
        }
    }

    /// Returns the symbol under the head, or blank if that cell was never written.
    pub fn read(&self) -> char {
        self.cells.get(&self.head).copied().unwrap_or(BLANK)
    }

    /// Overwrites the cell under the head.
    pub fn write(&mut self, symbol: char) {
        self.cells.insert(self.head, symbol);
    }

    pub fn move_right(&mut self) {
        self.move_head(1);
    }

    pub fn move_left(&mut self) {
        self.move_head(-1);
    }

    /// Moves the head one cell in `direction`.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
        }
    }

    /// Moves the head by `offset`, materializing the destination with blank on first visit.
    fn move_head(&mut self, offset: i64) {
        self.head += offset;
        self.cells.entry(self.head).or_insert(BLANK);
    }

    /// Returns the current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Returns the lowest and highest materialized positions, if any.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let (&low, _) = self.cells.first_key_value()?;
        let (&high, _) = self.cells.last_key_value()?;
        Some((low, high))
    }

    /// Iterates over materialized cells in position order.
    pub fn cells(&self) -> impl Iterator<Item = (i64, char)> + '_ {
        self.cells.iter().map(|(&pos, &symbol)| (pos, symbol))
    }

    /// Returns the visited span from the lowest to the highest materialized position.
    /// Gaps between materialized positions read as blank.
    pub fn render(&self) -> Vec<char> {
        match self.bounds() {
            Some((low, high)) => (low..=high)
                .map(|pos| self.cells.get(&pos).copied().unwrap_or(BLANK))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl From<&str> for Tape {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render().into_iter().try_for_each(|c| write!(f, "{c}"))
    }
}
