//! FILENAME: core/parser/src/position.rs
//! PURPOSE: Positioned characters and the byte stream that produces them.
//! CONTEXT: First stage of the pipeline. Bytes are read one at a time and
//! decoded as single characters, each stamped with a 1-based line and column.
//! The stream ends with a synthetic NUL character that fails every
//! character-class predicate.

use crate::lookahead::Producer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufReader, Bytes, Read};

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

const END_OF_INPUT: char = '\0';

/// A single decoded character plus where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char {
    pub value: char,
    pub position: Position,
}

impl Char {
    pub fn new(value: char, line: usize, column: usize) -> Self {
        Char {
            value,
            position: Position::new(line, column),
        }
    }

    pub fn end_of_input(position: Position) -> Self {
        Char {
            value: END_OF_INPUT,
            position,
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        self.value == END_OF_INPUT
    }

    pub fn is_digit(&self) -> bool {
        self.value.is_ascii_digit()
    }

    pub fn is_letter(&self) -> bool {
        self.value.is_alphabetic()
    }

    pub fn is_whitespace(&self) -> bool {
        self.value.is_whitespace() && !self.is_end_of_input()
    }

    pub fn is_newline(&self) -> bool {
        self.value == '\n'
    }

    pub fn is_control(&self) -> bool {
        self.value.is_control()
    }

    /// True if this character equals `test`. The end sentinel matches nothing.
    pub fn is(&self, test: char) -> bool {
        !self.is_end_of_input() && self.value == test
    }

    pub fn is_any(&self, tests: &[char]) -> bool {
        tests.iter().any(|&test| self.is(test))
    }
}

impl fmt::Display for Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_of_input() {
            write!(f, "<End of Input>")
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Reads bytes from any `Read` and yields positioned characters.
pub struct CharStream<R: Read> {
    bytes: Bytes<BufReader<R>>,
    line: usize,
    column: usize,
}

impl<R: Read> CharStream<R> {
    pub fn new(input: R) -> Self {
        CharStream {
            bytes: BufReader::new(input).bytes(),
            line: 1,
            column: 0,
        }
    }

    /// Position of the last character handed out.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl<R: Read> Producer for CharStream<R> {
    type Item = Char;
    type Error = std::io::Error;

    fn fetch(&mut self) -> Result<Option<Char>, std::io::Error> {
        let byte = match self.bytes.next() {
            Some(byte) => byte?,
            None => return Ok(None),
        };

        self.column += 1;
        let result = Char::new(byte as char, self.line, self.column);
        if byte == b'\n' {
            self.line += 1;
            self.column = 0;
        }
        Ok(Some(result))
    }

    fn end_of_input(&self) -> Char {
        Char::end_of_input(self.position())
    }
}
