//! This module provides the parser for `.tm` machine definitions, utilizing the `pest` crate.
//! The grammar lives in `grammar.pest`; this module turns its parse tree into a [`Program`].

use crate::{
    program::Program,
    types::{input_symbol, Case, Direction, TuringMachineError, BLANK, HALT},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the machine definition grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TuringMachineParser;

/// Parses the given input string into a `Program`.
///
/// The returned program is only syntactically checked. Semantic validation (initial state,
/// ambiguity, completeness) happens when it is turned into a machine with
/// [`Program::machine`].
///
/// # Errors
///
/// * `TuringMachineError::ParseError` on syntax errors, duplicate sections or duplicate state
///   blocks.
/// * `TuringMachineError::ValidationError` if a required section is missing.
pub fn parse(input: &str) -> Result<Program, TuringMachineError> {
    let root = TuringMachineParser::parse(Rule::program, input.trim())
        .map_err(|e| TuringMachineError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty program".to_string()))?;

    parse_program(root)
}

/// Parses the top-level sections of a definition from a `Pair<Rule::program>`.
fn parse_program(pair: Pair<Rule>) -> Result<Program, TuringMachineError> {
    let mut name: Option<String> = None;
    let mut alphabet: Option<Vec<char>> = None;
    let mut initial_state: Option<String> = None;
    let mut tape: Option<String> = None;
    let mut blocks: Option<Vec<(String, Vec<Case>)>> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_inner_string(p)?.trim().to_string()),
            Rule::alphabet => alphabet = Some(parse_symbols(p)),
            Rule::initial => initial_state = Some(parse_inner_string(p)?),
            Rule::tape => tape = Some(parse_symbols(p).into_iter().collect()),
            Rule::rules => blocks = Some(parse_blocks(p)?),
            _ => {} // EOI
        }
    }

    let name = check_required_rule(name, "name")?;
    let alphabet = check_required_rule(alphabet, "alphabet")?;
    let blocks = check_required_rule(blocks, "rules")?;

    let states: Vec<String> = blocks
        .iter()
        .map(|(state, _)| state.clone())
        .filter(|state| state != HALT)
        .collect();

    // The first declared state starts the machine unless `initial:` says otherwise
    let initial_state =
        check_required_rule(initial_state.or_else(|| states.first().cloned()), "initial")?;

    Ok(Program {
        name,
        states,
        alphabet,
        initial_state,
        tape: tape.unwrap_or_default(),
        cases: blocks.into_iter().flat_map(|(_, cases)| cases).collect(),
    })
}

/// Parses every state block of a `Pair<Rule::rules>`, rejecting states declared twice.
fn parse_blocks(pair: Pair<Rule>) -> Result<Vec<(String, Vec<Case>)>, TuringMachineError> {
    let mut blocks: Vec<(String, Vec<Case>)> = Vec::new();

    for block in pair.into_inner() {
        let span = block.as_span();
        let (state, cases) = parse_block(block)?;

        if blocks.iter().any(|(s, _)| *s == state) {
            return Err(parse_error(&format!("Duplicate state block: {state}"), span));
        }

        blocks.push((state, cases));
    }

    Ok(blocks)
}

/// Parses a `Pair<Rule::block>`: a state header followed by its transitions.
fn parse_block(pair: Pair<Rule>) -> Result<(String, Vec<Case>), TuringMachineError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();

    let state = pairs
        .next()
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| parse_error("Missing state name", span))?;

    let cases = pairs
        .map(|transition| parse_transition(transition, &state))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((state, cases))
}

/// Parses a single `Pair<Rule::transition>` belonging to `state`.
///
/// If the write symbol is omitted, the rule writes back the symbol it reads.
fn parse_transition(pair: Pair<Rule>, state: &str) -> Result<Case, TuringMachineError> {
    let span = pair.as_span();
    let inner: Vec<Pair<Rule>> = pair.into_inner().collect();

    match inner.as_slice() {
        [read, write, direction, next] => Ok(Case::new(
            state,
            parse_symbol(read.as_str()),
            parse_symbol(write.as_str()),
            parse_direction(direction)?,
            next.as_str(),
        )),
        [read, direction, next] => {
            let read = parse_symbol(read.as_str());
            Ok(Case::new(
                state,
                read,
                read,
                parse_direction(direction)?,
                next.as_str(),
            ))
        }
        _ => Err(parse_error("Malformed transition", span)),
    }
}

/// Parses a direction: `R` or `>` for right, `L` or `<` for left.
fn parse_direction(pair: &Pair<Rule>) -> Result<Direction, TuringMachineError> {
    match pair.as_str() {
        "<" | "L" => Ok(Direction::Left),
        ">" | "R" => Ok(Direction::Right),
        other => Err(parse_error(
            &format!("Unsupported direction: {other}"),
            pair.as_span(),
        )),
    }
}

/// Collects every `symbol` child of a section.
fn parse_symbols(pair: Pair<Rule>) -> Vec<char> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| parse_symbol(p.as_str()))
        .collect()
}

/// Parses a single character symbol, handling quoted symbols and the input blank.
fn parse_symbol(input: &str) -> char {
    let unquoted = if input.len() > 1 {
        input.trim_matches('\'')
    } else {
        input
    };

    unquoted.chars().next().map(input_symbol).unwrap_or(BLANK)
}

/// Extracts the string content of the first child of a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> Result<String, TuringMachineError> {
    let span = pair.as_span();
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| parse_error("Missing value", span))
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks if a top-level section has already been declared.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), TuringMachineError> {
    if !matches!(
        rule,
        Rule::name | Rule::alphabet | Rule::initial | Rule::tape | Rule::rules
    ) {
        return Ok(());
    };

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, name: &str) -> Result<T, TuringMachineError> {
    value.ok_or_else(|| TuringMachineError::ValidationError(format!("Missing '{name}' section")))
}
