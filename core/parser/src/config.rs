//! FILENAME: core/parser/src/config.rs
//! PURPOSE: Tunable switches for the lexer and parser.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lex a lone `|` (not part of `||`) as a single-character bracket.
    pub single_pipe_as_bracket: bool,
    /// Bind `tau` and `e` as constants in the scope when a parser is created.
    pub inject_constants: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            single_pipe_as_bracket: true,
            inject_constants: true,
        }
    }
}
