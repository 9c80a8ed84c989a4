//! This module defines `Program`: a serializable machine definition bundling the construction
//! inputs of a [`Machine`] with a name and an initial tape.

use serde::{Deserialize, Serialize};

use crate::machine::Machine;
use crate::tape::Tape;
use crate::types::{Case, TuringMachineError};

/// A machine definition as written in a `.tm` or `.json` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The name of the program.
    pub name: String,
    /// The declared states, in declaration order. Never contains the halt state.
    pub states: Vec<String>,
    /// The declared alphabet. The blank symbol is implied.
    pub alphabet: Vec<char>,
    /// The state the machine starts in.
    pub initial_state: String,
    /// The initial tape content, seeded at positions `0..n-1`. `_` denotes blank.
    #[serde(default)]
    pub tape: String,
    /// The supplied transition rules, possibly partial.
    pub cases: Vec<Case>,
}

impl Program {
    /// Builds the validated machine this program describes.
    pub fn machine(&self) -> Result<Machine, TuringMachineError> {
        Machine::new(
            self.states.iter().cloned(),
            self.alphabet.iter().copied(),
            self.initial_state.clone(),
            self.cases.clone(),
        )
    }

    /// Returns a fresh tape seeded with the program's initial content.
    pub fn tape(&self) -> Tape {
        Tape::new(&self.tape)
    }

    /// Returns the number of distinct declared states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}
