//! This module provides the `ProgramLoader` struct, responsible for loading machine definitions
//! from files and strings. Both the `.tm` text format and serialized `.json` programs are
//! supported.

use crate::parser::parse;
use crate::program::Program;
use crate::types::{TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of the text format.
pub const TEXT_EXTENSION: &str = "tm";
/// File extension of serialized programs.
pub const JSON_EXTENSION: &str = "json";

/// `ProgramLoader` is a utility struct for loading machine definitions.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// Files ending in `.json` are deserialized; anything else is parsed as the text format.
    ///
    /// # Errors
    ///
    /// * `TuringMachineError::FileError` if the file cannot be read or exceeds
    ///   [`MAX_PROGRAM_SIZE`].
    /// * `TuringMachineError::ParseError` or `TuringMachineError::ValidationError` if the
    ///   content is not a valid program.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if content.len() > MAX_PROGRAM_SIZE {
            return Err(TuringMachineError::FileError(format!(
                "File {} exceeds the maximum program size of {} bytes",
                path.display(),
                MAX_PROGRAM_SIZE
            )));
        }

        debug!(path = %path.display(), bytes = content.len(), "Loading program");

        if path.extension().is_some_and(|ext| ext == JSON_EXTENSION) {
            Self::load_program_from_json(&content)
        } else {
            Self::load_program_from_string(&content)
        }
    }

    /// Loads a single program from text-format content.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        parse(content)
    }

    /// Loads a single program from a JSON-serialized [`Program`].
    pub fn load_program_from_json(content: &str) -> Result<Program, TuringMachineError> {
        serde_json::from_str(content)
            .map_err(|e| TuringMachineError::ValidationError(format!("Invalid JSON program: {e}")))
    }

    /// Loads every `.tm` and `.json` program in a directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result
    /// carries either the path and the loaded program, or the error for that file.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || !is_program_file(&path) {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

fn is_program_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == TEXT_EXTENSION || ext == JSON_EXTENSION)
}
