//! This module defines the `Machine`: an immutable, validated transition table over a declared
//! state set and alphabet. Construction completes the supplied rules into a total function and
//! indexes them for constant-time dispatch during evaluation.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use crate::analyzer::{
    check_ambiguous, impossible_cases, undefined_next_states, unreachable_states, Diagnostic,
};
use crate::types::{Case, TuringMachineError, BLANK, HALT};

/// The result of [`complete`]: a rule list that is total over `states × alphabet`, together
/// with the pairs that had to be synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The supplied rules followed by one halting rule per missing pair.
    pub cases: Vec<Case>,
    /// The `(state, symbol)` pairs no supplied rule covered, in state then alphabet order.
    pub missing: Vec<(String, char)>,
}

/// Completes `cases` into a total rule set over `states × alphabet`.
///
/// Every uncovered pair gets a rule that writes the symbol back, moves right and halts. The
/// input is left untouched.
pub fn complete(cases: &[Case], states: &BTreeSet<String>, alphabet: &[char]) -> Completion {
    let covered: HashSet<(&str, char)> =
        cases.iter().map(|c| (c.state.as_str(), c.read)).collect();

    let missing: Vec<(String, char)> = states
        .iter()
        .flat_map(|state| alphabet.iter().map(move |&symbol| (state, symbol)))
        .filter(|(state, symbol)| !covered.contains(&(state.as_str(), *symbol)))
        .map(|(state, symbol)| (state.clone(), symbol))
        .collect();

    let mut total = cases.to_vec();
    total.extend(
        missing
            .iter()
            .map(|(state, symbol)| Case::halting(state.clone(), *symbol)),
    );

    Completion {
        cases: total,
        missing,
    }
}

/// A validated single-tape Turing machine.
///
/// A `Machine` never changes after construction. It holds no tape and no current state, so a
/// single instance can drive any number of evaluations, including concurrent ones.
#[derive(Debug, Clone)]
pub struct Machine {
    states: BTreeSet<String>,
    alphabet: Vec<char>,
    initial_state: String,
    cases: Vec<Case>,
    index: HashMap<String, HashMap<char, usize>>,
    diagnostics: Vec<Diagnostic>,
}

impl Machine {
    /// Builds a machine from a declared state set, an alphabet, an initial state and a
    /// (possibly partial) list of rules.
    ///
    /// The blank symbol is always added to the alphabet. [`HALT`] is reserved and is removed
    /// from the declared states if present.
    ///
    /// # Errors
    ///
    /// * `TuringMachineError::InvalidInitialState` if `initial_state` is not declared.
    /// * `TuringMachineError::AmbiguousTransition` if two rules share a state and read symbol.
    ///
    /// Missing coverage, impossible rules, undefined next states and unreachable states are
    /// not errors; they are logged and available through [`Machine::diagnostics`].
    pub fn new<I, S>(
        states: I,
        alphabet: impl IntoIterator<Item = char>,
        initial_state: impl Into<String>,
        cases: Vec<Case>,
    ) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut states: BTreeSet<String> = states.into_iter().map(Into::into).collect();
        if states.remove(HALT) {
            debug!("Ignoring reserved state '{HALT}' in declared states");
        }

        let initial_state = initial_state.into();
        if !states.contains(&initial_state) {
            return Err(TuringMachineError::InvalidInitialState(initial_state));
        }

        let mut symbols = Vec::new();
        for symbol in alphabet.into_iter().chain([BLANK]) {
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        let alphabet = symbols;

        check_ambiguous(&cases)?;

        let completion = complete(&cases, &states, &alphabet);
        let diagnostics = diagnose(&initial_state, &cases, &completion, &states, &alphabet);
        for diagnostic in &diagnostics {
            warn!("{diagnostic}");
        }

        let mut index: HashMap<String, HashMap<char, usize>> = HashMap::new();
        for (i, case) in completion.cases.iter().enumerate() {
            index
                .entry(case.state.clone())
                .or_default()
                .insert(case.read, i);
        }

        debug!(
            states = states.len(),
            symbols = alphabet.len(),
            supplied = cases.len(),
            synthesized = completion.missing.len(),
            "Machine constructed"
        );

        Ok(Self {
            states,
            alphabet,
            initial_state,
            cases: completion.cases,
            index,
            diagnostics,
        })
    }

    /// Returns the unique rule for `state` reading `symbol`.
    ///
    /// Always `Some` for a declared state and an alphabet symbol.
    pub fn case(&self, state: &str, symbol: char) -> Option<&Case> {
        self.index
            .get(state)
            .and_then(|by_symbol| by_symbol.get(&symbol))
            .and_then(|&i| self.cases.get(i))
    }

    /// Returns the declared states, excluding [`HALT`].
    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }

    /// Returns the alphabet, blank included.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Returns the total rule set: supplied rules first, then synthesized halting rules.
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Returns the non-fatal findings recorded at construction.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if the supplied rules already covered every `(state, symbol)` pair.
    pub fn is_complete(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::Incomplete(_)))
    }

    /// Returns `true` if `symbol` is part of the alphabet.
    pub fn accepts(&self, symbol: char) -> bool {
        self.alphabet.contains(&symbol)
    }
}

/// Runs every non-fatal check and collects the findings.
fn diagnose(
    initial_state: &str,
    supplied: &[Case],
    completion: &Completion,
    states: &BTreeSet<String>,
    alphabet: &[char],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if !completion.missing.is_empty() {
        diagnostics.push(Diagnostic::Incomplete(completion.missing.clone()));
    }

    let impossible = impossible_cases(supplied, states, alphabet);
    if !impossible.is_empty() {
        diagnostics.push(Diagnostic::ImpossibleCases(impossible));
    }

    let undefined = undefined_next_states(supplied, states);
    if !undefined.is_empty() {
        diagnostics.push(Diagnostic::UndefinedNextStates(undefined));
    }

    let unreachable = unreachable_states(initial_state, &completion.cases, states);
    if !unreachable.is_empty() {
        diagnostics.push(Diagnostic::UnreachableStates(unreachable));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn flip_cases() -> Vec<Case> {
        vec![
            Case::new("i", '0', '1', Direction::Right, "i"),
            Case::new("i", '1', '0', Direction::Right, "i"),
            Case::new("i", BLANK, BLANK, Direction::Left, HALT),
        ]
    }

    #[test]
    fn test_complete_machine() {
        let machine = Machine::new(["i"], ['0', '1'], "i", flip_cases()).unwrap();

        assert!(machine.is_complete());
        assert!(machine.diagnostics().is_empty());
        assert_eq!(machine.alphabet(), &['0', '1', BLANK]);
        assert_eq!(machine.cases().len(), 3);
        assert_eq!(machine.initial_state(), "i");
    }

    #[test]
    fn test_construction_is_total() {
        let cases = vec![
            Case::new("a", '0', '1', Direction::Right, "b"),
            Case::new("b", '1', '1', Direction::Left, "a"),
        ];
        let machine = Machine::new(["a", "b", "c"], ['0', '1'], "a", cases).unwrap();

        for state in machine.states() {
            for &symbol in machine.alphabet() {
                let matching = machine
                    .cases()
                    .iter()
                    .filter(|c| &c.state == state && c.read == symbol)
                    .count();
                assert_eq!(matching, 1, "({state}, {symbol:?})");
                assert!(machine.case(state, symbol).is_some());
            }
        }

        // 3 states x 3 symbols, 2 of them supplied
        assert_eq!(machine.cases().len(), 9);
        assert!(!machine.is_complete());
    }

    #[test]
    fn test_synthesized_rule_halts() {
        let cases = vec![Case::new("i", '0', '0', Direction::Right, "i")];
        let machine = Machine::new(["i"], ['0', '1'], "i", cases).unwrap();

        let case = machine.case("i", '1').unwrap();
        assert_eq!(case, &Case::halting("i", '1'));
        assert_eq!(
            machine.diagnostics()[0],
            Diagnostic::Incomplete(vec![("i".to_string(), '1'), ("i".to_string(), BLANK)])
        );
    }

    #[test]
    fn test_invalid_initial_state() {
        let result = Machine::new(["i"], ['0'], "start", flip_cases());

        assert_eq!(
            result.unwrap_err(),
            TuringMachineError::InvalidInitialState("start".to_string())
        );
    }

    #[test]
    fn test_halt_cannot_be_initial_state() {
        let result = Machine::new(["i", HALT], ['0'], HALT, vec![]);

        assert!(matches!(
            result,
            Err(TuringMachineError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_ambiguous_transition() {
        let cases = vec![
            Case::new("i", '0', '1', Direction::Right, "i"),
            Case::new("i", '0', '0', Direction::Left, HALT),
        ];

        let result = Machine::new(["i"], ['0', '1'], "i", cases);
        assert_eq!(
            result.unwrap_err(),
            TuringMachineError::AmbiguousTransition {
                state: "i".to_string(),
                symbol: '0',
            }
        );
    }

    #[test]
    fn test_blank_is_always_in_alphabet() {
        let machine = Machine::new(["i"], ['a', 'b', 'a'], "i", vec![]).unwrap();
        assert_eq!(machine.alphabet(), &['a', 'b', BLANK]);

        let machine = Machine::new(["i"], [BLANK, 'a'], "i", vec![]).unwrap();
        assert_eq!(machine.alphabet(), &[BLANK, 'a']);
        assert!(machine.accepts(BLANK));
    }

    #[test]
    fn test_impossible_cases_are_accepted() {
        let mut cases = flip_cases();
        cases.push(Case::new("ghost", '0', '1', Direction::Right, "i"));
        cases.push(Case::new("i", 'x', '1', Direction::Right, "i"));

        let machine = Machine::new(["i"], ['0', '1'], "i", cases).unwrap();

        assert!(machine.is_complete());
        assert_eq!(machine.cases().len(), 5);
        assert!(machine
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::ImpossibleCases(c) if c.len() == 2)));
    }

    #[test]
    fn test_undefined_and_unreachable_states() {
        let cases = vec![
            Case::new("a", '0', '0', Direction::Right, "nowhere"),
            Case::new("b", '0', '0', Direction::Right, "a"),
        ];

        let machine = Machine::new(["a", "b"], ['0'], "a", cases).unwrap();
        let diagnostics = machine.diagnostics();

        assert!(diagnostics.contains(&Diagnostic::UndefinedNextStates(vec![
            "nowhere".to_string()
        ])));
        assert!(diagnostics.contains(&Diagnostic::UnreachableStates(vec!["b".to_string()])));
    }

    #[test]
    fn test_reserved_halt_state_is_dropped() {
        let machine = Machine::new(["i", HALT], ['0'], "i", vec![]).unwrap();

        assert!(!machine.states().contains(HALT));
        assert!(machine.case(HALT, '0').is_none());
    }

    #[test]
    fn test_complete_is_pure() {
        let cases = flip_cases();
        let states: BTreeSet<String> = ["i".to_string(), "j".to_string()].into();

        let completion = complete(&cases, &states, &['0', '1', BLANK]);

        assert_eq!(cases, flip_cases());
        assert_eq!(completion.cases[..3], cases[..]);
        assert_eq!(completion.missing.len(), 3);
        assert!(completion.cases[3..].iter().all(|c| c.state == "j" && c.halts()));
    }

    #[test]
    fn test_machine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Machine>();
    }
}
