//! This module provides the checks run over a rule set while a `Machine` is being built. The
//! ambiguity check is fatal; everything else is reported as a [`Diagnostic`], which leaves the
//! machine constructible and runnable.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::types::{Case, TuringMachineError, HALT};

/// Non-fatal findings about a rule set.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Diagnostic {
    /// `(state, symbol)` pairs the caller left uncovered. Each one was completed with a rule
    /// that writes the symbol back, moves right and halts.
    Incomplete(Vec<(String, char)>),
    /// Supplied rules whose source state is undeclared, or whose read or write symbol lies
    /// outside the alphabet. They are kept but can never fire from a valid configuration.
    ImpossibleCases(Vec<Case>),
    /// Next states referenced by supplied rules that are neither declared nor the halt state.
    UndefinedNextStates(Vec<String>),
    /// Declared states that no sequence of rules reaches from the initial state.
    UnreachableStates(Vec<String>),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Incomplete(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(state, symbol)| format!("({state}, {symbol:?})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Incomplete transition function, halting on: {pairs}")
            }
            Diagnostic::ImpossibleCases(cases) => {
                let cases = cases
                    .iter()
                    .map(|c| {
                        format!(
                            "({}, {:?}) -> ({:?}, {:?}, {})",
                            c.state, c.read, c.write, c.direction, c.next_state
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Impossible cases: {cases}")
            }
            Diagnostic::UndefinedNextStates(states) => {
                write!(f, "Rules reference undefined states: {states:?}")
            }
            Diagnostic::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {states:?}")
            }
        }
    }
}

/// Fails with [`TuringMachineError::AmbiguousTransition`] on the first `(state, read)` pair
/// that appears in more than one rule, in supply order.
pub fn check_ambiguous(cases: &[Case]) -> Result<(), TuringMachineError> {
    let mut seen = HashSet::new();

    for case in cases {
        if !seen.insert((case.state.as_str(), case.read)) {
            return Err(TuringMachineError::AmbiguousTransition {
                state: case.state.clone(),
                symbol: case.read,
            });
        }
    }

    Ok(())
}

/// Collects the rules that reference a state or symbol outside the declared domain.
pub fn impossible_cases(
    cases: &[Case],
    states: &BTreeSet<String>,
    alphabet: &[char],
) -> Vec<Case> {
    cases
        .iter()
        .filter(|c| {
            !states.contains(&c.state) || !alphabet.contains(&c.read) || !alphabet.contains(&c.write)
        })
        .cloned()
        .collect()
}

/// Collects next states that are neither declared nor [`HALT`], sorted and deduplicated.
pub fn undefined_next_states(cases: &[Case], states: &BTreeSet<String>) -> Vec<String> {
    cases
        .iter()
        .filter(|c| !c.halts() && !states.contains(&c.next_state))
        .map(|c| c.next_state.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Finds declared states that cannot be reached from `initial_state` by following `cases`.
///
/// Performs a depth-first traversal over the rule graph. The halt state is never reported.
pub fn unreachable_states(
    initial_state: &str,
    cases: &[Case],
    states: &BTreeSet<String>,
) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = vec![initial_state];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for case in cases.iter().filter(|c| c.state == state) {
            if !visited.contains(case.next_state.as_str()) {
                queue.push(&case.next_state);
            }
        }
    }

    // BTreeSet iteration keeps the output sorted
    states
        .iter()
        .filter(|s| !visited.contains(s.as_str()))
        .cloned()
        .collect()
}
