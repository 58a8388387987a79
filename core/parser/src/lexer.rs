//! FILENAME: core/parser/src/lexer.rs
//! PURPOSE: Scans positioned characters and produces a stream of Tokens.
//! CONTEXT: This is the second stage of the parsing pipeline. It sits on a
//! character lookahead buffer and is itself a `Producer` for the token
//! lookahead buffer the parser reads from. It handles whitespace and comment
//! skipping, number scanning with digit grouping and scientific notation,
//! identifiers, brackets and one- or two-character symbols.
//!
//! SUPPORTED SYMBOLS:
//! - Brackets: ( ) [ ] { } and a lone | (configurable)
//! - Digraphs: && || ** and any symbol followed by = (==, <=, >=, !=)
//! - Everything else printable is a one-character symbol
//! - Comments: // to end of line, /* ... */

use crate::config::ParserConfig;
use crate::error::{CalcError, CalcResult};
use crate::lookahead::{Lookahead, Producer};
use crate::position::{Char, CharStream};
use crate::token::{Token, TokenKind};
use log::trace;
use std::io::Read;

const DECIMAL_SEPARATOR: char = '.';
const GROUPING_SEPARATOR: char = '_';
const SCIENTIFIC_SEPARATORS: [char; 2] = ['e', 'E'];
const EFFECTIVE_SCIENTIFIC_SEPARATOR: char = 'E';
const SIGNS: [char; 2] = ['+', '-'];

const LINE_COMMENT: &str = "//";
const BLOCK_COMMENT_START: &str = "/*";
const BLOCK_COMMENT_END: &str = "*/";
const BRACKETS: [char; 6] = ['(', '[', '{', '}', ']', ')'];

/// Token stream the parser consumes.
pub type TokenStream<R> = Lookahead<Lexer<R>>;

pub struct Lexer<R: Read> {
    input: Lookahead<CharStream<R>>,
    single_pipe_as_bracket: bool,
}

impl<'a> Lexer<&'a [u8]> {
    pub fn for_str(input: &'a str) -> Self {
        Lexer::new(input.as_bytes())
    }
}

impl<R: Read> Lexer<R> {
    pub fn new(input: R) -> Self {
        Lexer::with_config(input, &ParserConfig::default())
    }

    pub fn with_config(input: R, config: &ParserConfig) -> Self {
        Lexer {
            input: Lookahead::new(CharStream::new(input)),
            single_pipe_as_bracket: config.single_pipe_as_bracket,
        }
    }

    /// Wraps the lexer in a token lookahead buffer.
    pub fn into_stream(self) -> TokenStream<R> {
        Lookahead::new(self)
    }

    /// Advances the lexer and returns the next token, or an end-of-input
    /// token once the characters run out.
    pub fn next_token(&mut self) -> CalcResult<Token> {
        match self.fetch()? {
            Some(token) => Ok(token),
            None => Ok(self.end_of_input()),
        }
    }

    /// Skips whitespace and comments, then classifies the next token by its
    /// leading character.
    fn fetch_next_token(&mut self) -> CalcResult<Option<Token>> {
        loop {
            while self.ch(0)?.is_whitespace() {
                self.input.consume()?;
            }

            if self.ch(0)?.is_end_of_input() {
                return Ok(None);
            }

            if self.can_consume(LINE_COMMENT, true)? {
                self.skip_to_end_of_line()?;
                continue;
            }

            if self.can_consume(BLOCK_COMMENT_START, true)? {
                self.skip_block_comment()?;
                continue;
            }

            let token = if self.at_start_of_number()? {
                self.fetch_number()?
            } else if self.at_start_of_identifier()? {
                self.fetch_identifier()?
            } else if self.at_bracket(false)? {
                Token::from_char(TokenKind::Symbol, self.input.consume()?)
            } else if self.at_symbol_character()? {
                self.fetch_symbol()?
            } else {
                let ch = self.ch(0)?;
                return Err(CalcError::lexical(
                    format!(
                        "Invalid character in input: '{}'",
                        ch.value.escape_default()
                    ),
                    ch.position,
                ));
            };

            trace!(target: "LEXER", "{}", token);
            return Ok(Some(token));
        }
    }

    fn ch(&mut self, offset: usize) -> CalcResult<Char> {
        Ok(*self.input.peek(offset)?)
    }

    fn at_start_of_identifier(&mut self) -> CalcResult<bool> {
        Ok(self.ch(0)?.is_letter())
    }

    /// A digit, or `-`/`.` directly followed by one (also `-.5`).
    fn at_start_of_number(&mut self) -> CalcResult<bool> {
        let current = self.ch(0)?;
        if current.is_digit() {
            return Ok(true);
        }
        let next = self.ch(1)?;
        if current.is('-') {
            if next.is_digit() {
                return Ok(true);
            }
            return Ok(next.is(DECIMAL_SEPARATOR) && self.ch(2)?.is_digit());
        }
        Ok(current.is(DECIMAL_SEPARATOR) && next.is_digit())
    }

    /// Inside symbol scanning the lone pipe is not a bracket.
    fn at_bracket(&mut self, in_symbol: bool) -> CalcResult<bool> {
        let current = self.ch(0)?;
        if current.is_any(&BRACKETS) {
            return Ok(true);
        }
        Ok(!in_symbol
            && self.single_pipe_as_bracket
            && current.is('|')
            && !self.ch(1)?.is('|'))
    }

    fn at_symbol_character(&mut self) -> CalcResult<bool> {
        let current = self.ch(0)?;
        if current.is_end_of_input()
            || current.is_digit()
            || current.is_letter()
            || current.is_whitespace()
            || current.is_control()
        {
            return Ok(false);
        }

        Ok(!(self.at_bracket(true)?
            || self.can_consume(BLOCK_COMMENT_START, false)?
            || self.can_consume(LINE_COMMENT, false)?
            || self.at_start_of_number()?
            || self.at_start_of_identifier()?))
    }

    /// Checks whether the upcoming characters spell `text`, consuming them
    /// on a match when `consume` is set.
    fn can_consume(&mut self, text: &str, consume: bool) -> CalcResult<bool> {
        for (offset, expected) in text.chars().enumerate() {
            if !self.ch(offset)?.is(expected) {
                return Ok(false);
            }
        }

        if consume {
            self.input.consume_n(text.chars().count())?;
        }
        Ok(true)
    }

    fn skip_to_end_of_line(&mut self) -> CalcResult<()> {
        loop {
            let current = self.ch(0)?;
            if current.is_end_of_input() || current.is_newline() {
                return Ok(());
            }
            self.input.consume()?;
        }
    }

    fn skip_block_comment(&mut self) -> CalcResult<()> {
        loop {
            let current = self.ch(0)?;
            if current.is_end_of_input() {
                return Err(CalcError::lexical(
                    "Premature end of block comment.",
                    current.position,
                ));
            }
            if self.can_consume(BLOCK_COMMENT_END, true)? {
                return Ok(());
            }
            self.input.consume()?;
        }
    }

    fn fetch_identifier(&mut self) -> CalcResult<Token> {
        let first = self.input.consume()?;
        let mut token = Token::new(TokenKind::Identifier, first.position);
        token.push_content(first.value);

        loop {
            let current = self.ch(0)?;
            if !(current.is_digit() || current.is_letter() || current.is('_')) {
                break;
            }
            token.push_content(self.input.consume()?.value);
        }

        Ok(token)
    }

    fn fetch_symbol(&mut self) -> CalcResult<Token> {
        let first = self.input.consume()?;
        let mut token = Token::new(TokenKind::Symbol, first.position);
        token.push_trigger(first.value);

        let current = self.ch(0)?;
        let digraph = (first.value == '&' && current.is('&'))
            || (first.value == '|' && current.is('|'))
            || (first.value == '*' && current.is('*'))
            || current.is('=');
        if digraph {
            token.push_trigger(self.input.consume()?.value);
        }

        Ok(token)
    }

    /// Scans a numeric literal. The token starts as an Integer and is
    /// upgraded on the first `.` and on the first exponent marker.
    fn fetch_number(&mut self) -> CalcResult<Token> {
        let first = self.input.consume()?;
        let kind = if first.is(DECIMAL_SEPARATOR) {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        };
        let mut token = Token::new(kind, first.position);
        token.push_content(first.value);

        loop {
            let current = self.ch(0)?;
            let next = self.ch(1)?;

            if current.is_digit() {
                token.push_content(self.input.consume()?.value);
            } else if current.is(GROUPING_SEPARATOR) && next.is_digit() {
                token.push_source(self.input.consume()?.value);
            } else if current.is(DECIMAL_SEPARATOR) {
                if token.is(TokenKind::Decimal) || token.is(TokenKind::ScientificDecimal) {
                    return Err(CalcError::lexical(
                        format!("Unexpected decimal separator in '{}'", token.source),
                        current.position,
                    ));
                }
                token.upgrade(TokenKind::Decimal);
                token.push_content(self.input.consume()?.value);
            } else if current.is_any(&SCIENTIFIC_SEPARATORS)
                && (next.is_digit() || next.is_any(&SIGNS))
            {
                if token.is(TokenKind::ScientificDecimal) {
                    return Err(CalcError::lexical(
                        format!(
                            "Unexpected scientific notation separator in '{}'",
                            token.source
                        ),
                        current.position,
                    ));
                }
                token.upgrade(TokenKind::ScientificDecimal);
                self.input.consume()?;
                token.push_content(EFFECTIVE_SCIENTIFIC_SEPARATOR);
                if self.ch(0)?.is_any(&SIGNS) {
                    token.push_content(self.input.consume()?.value);
                }
            } else {
                break;
            }
        }

        Ok(token)
    }
}

impl<R: Read> Producer for Lexer<R> {
    type Item = Token;
    type Error = CalcError;

    fn fetch(&mut self) -> CalcResult<Option<Token>> {
        self.fetch_next_token()
    }

    fn end_of_input(&self) -> Token {
        Token::end_of_input(self.input.producer().position())
    }
}

impl<R: Read> TokenStream<R> {
    /// True while a token other than end of input is ahead.
    pub fn more(&mut self) -> CalcResult<bool> {
        Ok(!self.current()?.is_end())
    }

    pub fn at_end(&mut self) -> CalcResult<bool> {
        Ok(self.current()?.is_end())
    }
}

/// Lexes a whole string, returning every token up to (not including) the end
/// of input.
pub fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
    let mut lexer = Lexer::for_str(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.fetch()? {
        tokens.push(token);
    }
    Ok(tokens)
}
