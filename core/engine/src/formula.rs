//! FILENAME: core/engine/src/formula.rs
//! PURPOSE: A compiled formula: source text, simplified tree and dependencies.
//! CONTEXT: Produced by `Calculator::compile`. The tree keeps live links to
//! the calculator's variables, so `evaluate` always sees their latest values.

use crate::dependency_extractor::Dependencies;
use calc_parser::{CalcResult, Expression};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Formula {
    source: String,
    expression: Expression,
    dependencies: Dependencies,
}

impl Formula {
    pub(crate) fn new(source: String, expression: Expression, dependencies: Dependencies) -> Self {
        Formula {
            source,
            expression,
            dependencies,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// True when the formula folded to a single number at compile time.
    pub fn is_constant(&self) -> bool {
        self.expression.is_constant()
    }

    pub fn evaluate(&self) -> CalcResult<f64> {
        self.expression.evaluate()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
