//! This module defines the core data structures and types shared by the tape, the machine and
//! the evaluator: transition rules, head directions, reserved symbols and states, and the
//! error type surfaced by every fallible operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rule;

/// The reserved blank symbol. Every tape cell that was never written holds it, and it is
/// implicitly part of every machine's alphabet.
pub const BLANK: char = ' ';
/// A special input symbol used in textual inputs (tape seeds, rule files) to denote the blank.
pub const INPUT_BLANK_SYMBOL: char = '_';
/// The reserved terminal state. Reaching it ends evaluation.
pub const HALT: &str = "halt";
/// The maximum allowed size for a machine definition in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The step budget used by front ends that do not specify one.
pub const DEFAULT_MAX_STEPS: usize = 10000;

/// Rewrites [`INPUT_BLANK_SYMBOL`] to [`BLANK`], leaving every other symbol untouched.
pub fn input_symbol(c: char) -> char {
    if c == INPUT_BLANK_SYMBOL {
        BLANK
    } else {
        c
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

/// A single transition rule: in `state`, reading `read`, write `write`, move the head in
/// `direction` and continue in `next_state`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Case {
    /// The state this rule fires from.
    pub state: String,
    /// The symbol under the head that selects this rule.
    pub read: char,
    /// The symbol written over the cell under the head.
    pub write: char,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine transitions to.
    pub next_state: String,
}

impl Case {
    pub fn new(
        state: impl Into<String>,
        read: char,
        write: char,
        direction: Direction,
        next_state: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            read,
            write,
            direction,
            next_state: next_state.into(),
        }
    }

    /// The rule synthesized for an uncovered `(state, symbol)` pair: write the symbol back,
    /// move right, halt.
    pub fn halting(state: impl Into<String>, symbol: char) -> Self {
        Self::new(state, symbol, symbol, Direction::Right, HALT)
    }

    /// Returns `true` if this rule transitions to [`HALT`].
    pub fn halts(&self) -> bool {
        self.next_state == HALT
    }
}

/// Represents the outcome of a single evaluation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A rule fired and the machine has not reached the halt state.
    Continue,
    /// The machine is in the halt state.
    Halt,
}

/// Represents the errors that can occur while building or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The initial state is not a member of the declared state set.
    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),
    /// Two or more supplied rules share the same source state and read symbol.
    #[error("Ambiguous transition: more than one rule for state {state} reading {symbol:?}")]
    AmbiguousTransition { state: String, symbol: char },
    /// The tape holds a symbol outside the machine's alphabet.
    #[error("Invalid tape symbol {symbol:?} at position {position}")]
    InvalidTapeSymbol { symbol: char, position: i64 },
    /// No rule matches the current state and symbol. Only reachable through rules that were
    /// flagged at construction.
    #[error("No rule defined for state {state} and symbol {symbol:?}")]
    UndefinedTransition { state: String, symbol: char },
    /// The machine did not halt within the given step budget.
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    /// Indicates an error during the parsing of a machine definition.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structurally invalid machine definition.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let right_json = serde_json::to_string(&Direction::Right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");
        assert_eq!(
            serde_json::from_str::<Direction>(&right_json).unwrap(),
            Direction::Right
        );
    }

    #[test]
    fn test_halting_case() {
        let case = Case::halting("i", '1');

        assert_eq!(case.state, "i");
        assert_eq!(case.read, '1');
        assert_eq!(case.write, '1');
        assert_eq!(case.direction, Direction::Right);
        assert!(case.halts());
    }

    #[test]
    fn test_input_symbol() {
        assert_eq!(input_symbol('_'), BLANK);
        assert_eq!(input_symbol('a'), 'a');
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::AmbiguousTransition {
            state: "i".to_string(),
            symbol: '0',
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("Ambiguous transition"));
        assert!(error_msg.contains("'0'"));

        let error = TuringMachineError::InvalidTapeSymbol {
            symbol: 'x',
            position: -2,
        };
        assert!(error.to_string().contains("position -2"));
    }
}
