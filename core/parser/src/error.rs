//! FILENAME: core/parser/src/error.rs
//! PURPOSE: Error taxonomy shared by the lexer, parser and evaluator.
//! CONTEXT: Every failure is fatal. There is no recovery and no partial tree,
//! so a single enum travels through every stage of the pipeline.

use crate::position::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("lexical error at {position}: {message}")]
    Lexical { message: String, position: Position },

    #[error("syntax error at {position}: {message}")]
    Syntax { message: String, position: Position },

    #[error("semantic error: {message}{}", .position.map(|p| format!(" (at {})", p)).unwrap_or_default())]
    Semantic {
        message: String,
        position: Option<Position>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a `CalcError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
    Io,
}

impl CalcError {
    pub fn lexical(message: impl Into<String>, position: Position) -> Self {
        CalcError::Lexical {
            message: message.into(),
            position,
        }
    }

    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        CalcError::Syntax {
            message: message.into(),
            position,
        }
    }

    pub fn semantic(message: impl Into<String>, position: Option<Position>) -> Self {
        CalcError::Semantic {
            message: message.into(),
            position,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::Lexical { .. } => ErrorKind::Lexical,
            CalcError::Syntax { .. } => ErrorKind::Syntax,
            CalcError::Semantic { .. } => ErrorKind::Semantic,
            CalcError::Io(_) => ErrorKind::Io,
        }
    }

    /// Source position of the failure, when one is known.
    pub fn position(&self) -> Option<Position> {
        match self {
            CalcError::Lexical { position, .. } | CalcError::Syntax { position, .. } => {
                Some(*position)
            }
            CalcError::Semantic { position, .. } => *position,
            CalcError::Io(_) => None,
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
