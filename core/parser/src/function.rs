//! FILENAME: core/parser/src/function.rs
//! PURPOSE: Callable functions bound in a scope and referenced by call nodes.
//! CONTEXT: Three body shapes are supported. Unary and binary bodies receive
//! evaluated numbers and short-circuit to NaN on a NaN argument. General
//! bodies receive the unevaluated argument expressions and decide what to
//! evaluate (the conditional operator relies on this).

use crate::ast::Expression;
use crate::error::{CalcError, CalcResult};
use std::fmt;
use std::rc::Rc;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Any number of arguments, unchecked.
    Variadic,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(expected) => expected == count,
            Arity::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(count) => write!(f, "{}", count),
            Arity::Variadic => write!(f, "any number of"),
        }
    }
}

pub type GeneralBody = dyn Fn(&[Expression]) -> CalcResult<f64>;

pub enum FunctionBody {
    Unary(Box<dyn Fn(f64) -> f64>),
    Binary(Box<dyn Fn(f64, f64) -> f64>),
    General(Box<GeneralBody>),
}

pub struct Function {
    name: String,
    arity: Arity,
    deterministic: bool,
    body: FunctionBody,
}

impl Function {
    pub fn unary(
        name: impl Into<String>,
        body: impl Fn(f64) -> f64 + 'static,
        deterministic: bool,
    ) -> Self {
        Function {
            name: name.into(),
            arity: Arity::Fixed(1),
            deterministic,
            body: FunctionBody::Unary(Box::new(body)),
        }
    }

    pub fn binary(
        name: impl Into<String>,
        body: impl Fn(f64, f64) -> f64 + 'static,
        deterministic: bool,
    ) -> Self {
        Function {
            name: name.into(),
            arity: Arity::Fixed(2),
            deterministic,
            body: FunctionBody::Binary(Box::new(body)),
        }
    }

    pub fn general(
        name: impl Into<String>,
        arity: Arity,
        deterministic: bool,
        body: impl Fn(&[Expression]) -> CalcResult<f64> + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            arity,
            deterministic,
            body: FunctionBody::General(Box::new(body)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Deterministic functions with constant arguments are folded at parse time.
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn evaluate(&self, arguments: &[Expression]) -> CalcResult<f64> {
        if !self.arity.accepts(arguments.len()) {
            return Err(CalcError::semantic(
                format!(
                    "{}: Expected {} arguments, but received {}",
                    self.name,
                    self.arity,
                    arguments.len()
                ),
                None,
            ));
        }

        match &self.body {
            FunctionBody::Unary(body) => {
                let argument = arguments[0].evaluate()?;
                if argument.is_nan() {
                    return Ok(f64::NAN);
                }
                Ok(body(argument))
            }
            FunctionBody::Binary(body) => {
                let first = arguments[0].evaluate()?;
                if first.is_nan() {
                    return Ok(f64::NAN);
                }
                let second = arguments[1].evaluate()?;
                if second.is_nan() {
                    return Ok(f64::NAN);
                }
                Ok(body(first, second))
            }
            FunctionBody::General(body) => body(arguments),
        }
    }

    /// Closures cannot be compared, so functions match by identity or name.
    pub fn same_function(a: &Rc<Function>, b: &Rc<Function>) -> bool {
        Rc::ptr_eq(a, b) || a.name == b.name
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("deterministic", &self.deterministic)
            .finish()
    }
}
