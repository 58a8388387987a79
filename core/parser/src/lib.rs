//! FILENAME: core/parser/src/lib.rs
//! PURPOSE: Library root for the formula parser.
//! CONTEXT: This crate turns formula text into an expression tree bound to a
//! scope of variables and functions, and evaluates that tree on demand.
//!
//! PIPELINE: Bytes --> CharStream --> Lexer --> Tokens --> Parser --> AST --> simplify
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /, % and ^ / ** (power, right-associative)
//! - Comparison: <, <=, >, >=, ==, !=
//! - Boolean: && and || over non-zero truthiness
//! - Conditional: cond ? a : b
//! - Absolute value: |x|
//! - Numbers: 1_000, .5, 2.5e-3, unit suffixes 5K, 2.5m
//! - Function calls and variables resolved through a Scope
//! - Comments: // line and /* block */

pub mod ast;
pub mod config;
pub mod error;
pub mod function;
pub mod lexer;
pub mod lookahead;
pub mod parser;
pub mod position;
pub mod scope;
pub mod token;
pub mod variable;


pub use ast::{BinaryOperation, BinaryOperator, Expression, FunctionCall, VariableReference};
pub use config::ParserConfig;
pub use error::{CalcError, CalcResult, ErrorKind};
pub use function::{Arity, Function};
pub use lexer::{tokenize, Lexer, TokenStream};
pub use lookahead::{Lookahead, Producer};
pub use parser::{parse, parse_reader, parse_with_config, Parser};
pub use position::{Char, CharStream, Position};
pub use scope::Scope;
pub use token::{Token, TokenKind};
pub use variable::Variable;
