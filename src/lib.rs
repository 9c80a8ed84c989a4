//! This crate provides a single-tape, single-head deterministic Turing machine.
//! It includes a sparse two-way-unbounded tape, validated transition tables that are completed
//! into total functions at construction, an evaluation engine, and a text format for machine
//! definitions together with a small set of built-in programs.

pub mod analyzer;
pub mod evaluator;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod program;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `Diagnostic` enum from the analyzer module.
pub use analyzer::Diagnostic;
/// Re-exports the evaluation entry points.
pub use evaluator::{evaluate, evaluate_bounded, Execution};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` struct and the pure completion function.
pub use machine::{complete, Completion, Machine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
pub use program::Program;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
pub use tape::Tape;
/// Re-exports the shared types and reserved constants.
pub use types::{
    Case, Direction, Step, TuringMachineError, BLANK, DEFAULT_MAX_STEPS, HALT, MAX_PROGRAM_SIZE,
};
