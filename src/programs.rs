use crate::program::Program;
use crate::types::TuringMachineError;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../programs/palindrome.tm"),
    include_str!("../programs/binary-increment.tm"),
    include_str!("../programs/busy-beaver-3.tm"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = PROGRAM_TEXTS
        .iter()
        .filter_map(|text| match crate::parser::parse(text) {
            Ok(program) => Some(program),
            Err(e) => {
                tracing::error!("Failed to parse embedded program: {e}");
                None
            }
        })
        .collect();
}

/// Read-only access to the programs embedded in the crate.
pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            TuringMachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|program| program.name.clone()).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            state_count: program.state_count(),
            case_count: program.cases.len(),
            name: program.name,
            initial_state: program.initial_state,
            initial_tape: program.tape,
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, program)| program.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub initial_tape: String,
    pub state_count: usize,
    pub case_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{evaluate, evaluate_bounded};
    use crate::tape::Tape;
    use crate::types::{BLANK, DEFAULT_MAX_STEPS};

    fn palindrome() -> Program {
        ProgramManager::get_program_by_name("Binary Palindrome").unwrap()
    }

    #[test]
    fn test_all_programs_parse() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_all_programs_build_and_halt() {
        for program in PROGRAMS.iter() {
            let machine = program.machine().unwrap();
            let mut tape = program.tape();

            let result = evaluate_bounded(&machine, &mut tape, DEFAULT_MAX_STEPS);
            assert!(result.is_ok(), "Program '{}' failed: {:?}", program.name, result);
        }
    }

    #[test]
    fn test_palindrome_definition() {
        let program = palindrome();

        assert_eq!(program.states, vec!["i", "p0", "p1", "q0", "q1", "r"]);
        assert_eq!(program.alphabet, vec!['0', '1']);
        assert_eq!(program.initial_state, "i");

        // (q0, 1) and (q1, 0) are left to the synthesized halting rules
        let machine = program.machine().unwrap();
        assert!(!machine.is_complete());
        assert_eq!(machine.cases().len(), 6 * 3);
    }

    #[test]
    fn test_palindrome_accepts_odd_palindrome() {
        let machine = palindrome().machine().unwrap();
        let mut tape = Tape::new("10101");

        evaluate(&machine, &mut tape).unwrap();

        assert!(tape.render().len() >= 5);
        assert!(tape.render().iter().all(|&c| c == BLANK));
    }

    #[test]
    fn test_palindrome_accepts_even_palindromes() {
        let machine = palindrome().machine().unwrap();

        for input in ["", "11", "0110", "100001"] {
            let mut tape = Tape::new(input);
            evaluate(&machine, &mut tape).unwrap();
            assert!(
                tape.render().iter().all(|&c| c == BLANK),
                "'{input}' left {tape}"
            );
        }
    }

    #[test]
    fn test_palindrome_rejects_non_palindrome() {
        let machine = palindrome().machine().unwrap();

        for input in ["1101", "10", "0111"] {
            let mut tape = Tape::new(input);
            evaluate(&machine, &mut tape).unwrap();
            assert!(
                tape.render().iter().any(|&c| c != BLANK),
                "'{input}' was accepted"
            );
        }

        let mut tape = Tape::new("1101");
        evaluate(&machine, &mut tape).unwrap();
        assert_eq!(tape.to_string().trim(), "0");
    }

    #[test]
    fn test_binary_increment() {
        let program = ProgramManager::get_program_by_name("binary increment").unwrap();
        let machine = program.machine().unwrap();

        let mut tape = program.tape();
        evaluate(&machine, &mut tape).unwrap();
        assert_eq!(tape.to_string().trim(), "1100");

        let mut tape = Tape::new("111");
        evaluate(&machine, &mut tape).unwrap();
        assert_eq!(tape.to_string().trim(), "1000");
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.bounds(), Some((-1, 3)));
    }

    #[test]
    fn test_busy_beaver() {
        let program = ProgramManager::get_program_by_name("Busy Beaver 3").unwrap();
        let machine = program.machine().unwrap();
        let mut tape = program.tape();

        let steps = evaluate_bounded(&machine, &mut tape, DEFAULT_MAX_STEPS).unwrap();

        assert_eq!(steps, 14);
        assert_eq!(tape.render().iter().filter(|&&c| c == '1').count(), 6);
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();

        assert_eq!(info.index, 0);
        assert_eq!(info.name, "Binary Palindrome");
        assert_eq!(info.initial_state, "i");
        assert_eq!(info.initial_tape, "10101");
        assert_eq!(info.state_count, 6);
        assert_eq!(info.case_count, 16);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_program_manager_search_programs() {
        assert_eq!(ProgramManager::search_programs("binary"), vec![0, 1]);
        assert_eq!(ProgramManager::search_programs("BEAVER"), vec![2]);
        assert!(ProgramManager::search_programs("nonexistent").is_empty());
        assert_eq!(ProgramManager::list_program_names().len(), 3);
    }
}
