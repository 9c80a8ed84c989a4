//! This module drives a `Machine` over a `Tape`. It offers the run-to-completion entry point
//! [`evaluate`], a budgeted variant [`evaluate_bounded`], and [`Execution`] for callers that
//! want to advance one step at a time.

use tracing::{debug, trace};

use crate::machine::Machine;
use crate::tape::Tape;
use crate::types::{Step, TuringMachineError, HALT};

/// Runs `machine` against `tape` until the halt state is reached, mutating the tape in place.
///
/// Termination is not guaranteed: a rule set that never reaches the halt state loops forever.
/// Use [`evaluate_bounded`] when the run must be bounded.
///
/// # Errors
///
/// * `TuringMachineError::InvalidTapeSymbol` if the tape holds a symbol outside the alphabet.
/// * `TuringMachineError::UndefinedTransition` if a flagged rule led outside the declared
///   states or alphabet.
pub fn evaluate(machine: &Machine, tape: &mut Tape) -> Result<(), TuringMachineError> {
    Execution::new(machine, tape)?.run()
}

/// Runs `machine` against `tape` for at most `max_steps` steps and returns the number of steps
/// taken.
///
/// # Errors
///
/// Same as [`evaluate`], plus `TuringMachineError::StepLimitExceeded` if the machine has not
/// halted once the budget is spent.
pub fn evaluate_bounded(
    machine: &Machine,
    tape: &mut Tape,
    max_steps: usize,
) -> Result<usize, TuringMachineError> {
    let mut execution = Execution::new(machine, tape)?;
    execution.run_bounded(max_steps)?;
    Ok(execution.step_count())
}

/// A single run of a machine over a tape it exclusively borrows.
pub struct Execution<'a> {
    machine: &'a Machine,
    tape: &'a mut Tape,
    state: &'a str,
    step_count: usize,
}

impl<'a> Execution<'a> {
    /// Starts a run in the machine's initial state.
    ///
    /// Every symbol materialized on the tape must belong to the machine's alphabet. Cells
    /// materialized later by head movement hold blank, so the check is not repeated.
    pub fn new(machine: &'a Machine, tape: &'a mut Tape) -> Result<Self, TuringMachineError> {
        if let Some((position, symbol)) = tape.cells().find(|&(_, s)| !machine.accepts(s)) {
            return Err(TuringMachineError::InvalidTapeSymbol { symbol, position });
        }

        Ok(Self {
            machine,
            tape,
            state: machine.initial_state(),
            step_count: 0,
        })
    }

    /// Fires the single rule matching the current state and the symbol under the head.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a rule fired and the new state is not the halt state.
    /// * `Step::Halt` if the machine is (or just became) halted.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        if self.is_halted() {
            return Ok(Step::Halt);
        }

        let machine = self.machine;
        let symbol = self.tape.read();
        let case = machine.case(self.state, symbol).ok_or_else(|| {
            TuringMachineError::UndefinedTransition {
                state: self.state.to_string(),
                symbol,
            }
        })?;

        trace!(
            step = self.step_count,
            state = self.state,
            head = self.tape.head(),
            read = ?symbol,
            write = ?case.write,
            direction = ?case.direction,
            next = case.next_state.as_str(),
            "Step"
        );

        self.tape.write(case.write);
        self.tape.shift(case.direction);
        self.state = &case.next_state;
        self.step_count += 1;

        if self.is_halted() {
            debug!(steps = self.step_count, head = self.tape.head(), "Machine halted");
            Ok(Step::Halt)
        } else {
            Ok(Step::Continue)
        }
    }

    /// Steps until the machine halts.
    pub fn run(&mut self) -> Result<(), TuringMachineError> {
        while self.step()? == Step::Continue {}
        Ok(())
    }

    /// Steps until the machine halts, failing if it takes more than `max_steps` steps.
    pub fn run_bounded(&mut self, max_steps: usize) -> Result<(), TuringMachineError> {
        while !self.is_halted() {
            if self.step_count >= max_steps {
                debug!(steps = self.step_count, state = self.state, "Step limit reached");
                return Err(TuringMachineError::StepLimitExceeded(max_steps));
            }
            self.step()?;
        }

        Ok(())
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        self.state
    }

    /// Returns the number of rules fired so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn tape(&self) -> &Tape {
        &*self.tape
    }

    pub fn is_halted(&self) -> bool {
        self.state == HALT
    }
}
