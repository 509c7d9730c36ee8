//! Program text assembly.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An ordered list of Quil instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<String>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction.
    ///
    /// Multi-line input is split into one instruction per non-blank line.
    pub fn inst(&mut self, instruction: impl Into<String>) -> &mut Self {
        let instruction = instruction.into();
        for line in instruction.lines() {
            let line = line.trim();
            if !line.is_empty() {
                self.instructions.push(line.to_string());
            }
        }
        self
    }

    /// Append a measurement of `qubit` into classical `address`.
    pub fn measure(&mut self, qubit: u64, address: u64) -> &mut Self {
        self.instructions.push(format!("MEASURE {qubit} [{address}]"));
        self
    }

    /// The instructions in program order.
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The program text sent to the QVM.
    pub fn out(&self) -> String {
        self.instructions.join("\n")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.out())
    }
}

impl FromStr for Program {
    type Err = Infallible;

    /// Read Quil source, one instruction per line. `#` starts a comment.
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut program = Self::new();
        for line in source.lines() {
            let code = line.split_once('#').map_or(line, |(code, _)| code);
            program.inst(code);
        }
        Ok(program)
    }
}

impl<S: Into<String>> FromIterator<S> for Program {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut program = Self::new();
        for instruction in iter {
            program.inst(instruction);
        }
        program
    }
}

impl From<&str> for Program {
    fn from(source: &str) -> Self {
        match source.parse() {
            Ok(program) => program,
            Err(never) => match never {},
        }
    }
}
