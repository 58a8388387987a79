//! FILENAME: core/parser/src/token.rs
//! PURPOSE: Token definitions for the formula lexer.
//! CONTEXT: Tokens are the atomic units produced by the lexer and consumed by the parser.
//! A token keeps three views of its text: `contents` (semantic text used for
//! number parsing and name lookup), `trigger` (the canonical symbol key used
//! for matching operators) and `source` (the verbatim slice for diagnostics).

use crate::position::{Char, Position};
use serde::{Deserialize, Serialize};

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Integer,
    Decimal,
    ScientificDecimal,
    Symbol,
    EndOfInput,
}

/// A classified, positioned lexical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub contents: String,
    pub trigger: String,
    pub source: String,
    pub position: Position,
}

impl Token {
    /// Creates an empty token of `kind` starting at `position`.
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Token {
            kind,
            contents: String::new(),
            trigger: String::new(),
            source: String::new(),
            position,
        }
    }

    /// Creates a token whose three texts are the single character `ch`.
    pub fn from_char(kind: TokenKind, ch: Char) -> Self {
        let mut token = Token::new(kind, ch.position);
        if !ch.is_end_of_input() {
            token.contents.push(ch.value);
            token.trigger.push(ch.value);
            token.source.push(ch.value);
        }
        token
    }

    pub fn end_of_input(position: Position) -> Self {
        Token::new(TokenKind::EndOfInput, position)
    }

    /// Appends to contents and source.
    pub fn push_content(&mut self, ch: char) {
        self.contents.push(ch);
        self.source.push(ch);
    }

    /// Appends to trigger and source.
    pub fn push_trigger(&mut self, ch: char) {
        self.trigger.push(ch);
        self.source.push(ch);
    }

    /// Appends to source only (grouping separators, consumed markers).
    pub fn push_source(&mut self, ch: char) {
        self.source.push(ch);
    }

    /// Moves a numeric token along the Integer -> Decimal -> ScientificDecimal
    /// path. Never moves backwards.
    pub fn upgrade(&mut self, kind: TokenKind) {
        debug_assert!(self.is_number() && kind_rank(kind) > kind_rank(self.kind));
        self.kind = kind;
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_end(&self) -> bool {
        self.is(TokenKind::EndOfInput)
    }

    pub fn is_identifier(&self) -> bool {
        self.is(TokenKind::Identifier)
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Integer | TokenKind::Decimal | TokenKind::ScientificDecimal
        )
    }

    pub fn is_any_symbol(&self) -> bool {
        self.is(TokenKind::Symbol)
    }

    /// True for a symbol token whose trigger is `symbol`.
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.matches(TokenKind::Symbol, symbol)
    }

    pub fn matches(&self, kind: TokenKind, trigger: &str) -> bool {
        self.is(kind) && self.trigger == trigger
    }

    pub fn was_triggered_by(&self, triggers: &[&str]) -> bool {
        triggers.iter().any(|trigger| self.trigger == *trigger)
    }

    /// Case-insensitive comparison against the semantic contents.
    pub fn has_content(&self, content: &str) -> bool {
        self.contents.to_lowercase() == content.to_lowercase()
    }

    /// Quoted source text for error messages.
    pub fn describe(&self) -> String {
        if self.is_end() {
            "end of input".to_string()
        } else {
            format!("'{}'", self.source)
        }
    }
}

fn kind_rank(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Integer => 0,
        TokenKind::Decimal => 1,
        TokenKind::ScientificDecimal => 2,
        _ => u8::MAX,
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{} ({})", self.kind, self.source, self.position)
    }
}
