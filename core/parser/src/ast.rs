//! FILENAME: core/parser/src/ast.rs
//! PURPOSE: Defines the expression tree for parsed formulas.
//! CONTEXT: The parser assembles these nodes, simplifies the tree once, and
//! hands it to the caller. Evaluation is a synchronous recursive walk that
//! can be repeated any number of times: variable references read the
//! variable's current value, so rebinding a variable changes the result
//! without reparsing.
//!
//! NODE KINDS:
//! - Constant: a fixed number
//! - Variable: a live link to a shared `Variable`
//! - Binary: two operands and an operator (with the `sealed` flag used by
//!   precedence repair)
//! - Call: a `Function` and its argument expressions

use crate::error::CalcResult;
use crate::function::Function;
use crate::variable::Variable;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Smallest positive (subnormal) double. Equality tests compare the absolute
/// difference against it, which amounts to exact equality.
pub const SMALLEST_POSITIVE: f64 = 5e-324;

/// Truthiness used by the boolean operators and the conditional.
pub fn is_truthy(value: f64) -> bool {
    value.abs() > SMALLEST_POSITIVE
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < SMALLEST_POSITIVE
}

fn from_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Binary operators. The high nibble of the code is the precedence rank,
/// the low nibble tells operators of the same rank apart.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    And = 0x11,
    Or = 0x12,
    LessThan = 0x23,
    LessEqual = 0x24,
    Equal = 0x25,
    GreaterEqual = 0x26,
    GreaterThan = 0x27,
    NotEqual = 0x28,
    Add = 0x39,
    Subtract = 0x3A,
    Multiply = 0x4B,
    Divide = 0x4C,
    Modulo = 0x4D,
    Power = 0x5E,
}

impl BinaryOperator {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn precedence(self) -> u8 {
        (self.code() >> 4) & 0x0F
    }

    /// Operators whose operands may be swapped and regrouped.
    pub fn is_commutative(self) -> bool {
        matches!(self, BinaryOperator::Add | BinaryOperator::Multiply)
    }

    /// Applies the operator to two already evaluated operands.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOperator::Add => a + b,
            BinaryOperator::Subtract => a - b,
            BinaryOperator::Multiply => a * b,
            BinaryOperator::Divide => a / b,
            BinaryOperator::Modulo => a % b,
            BinaryOperator::Power => a.powf(b),

            BinaryOperator::LessThan => from_bool(a < b),
            BinaryOperator::LessEqual => from_bool(a < b || nearly_equal(a, b)),
            BinaryOperator::GreaterThan => from_bool(a > b),
            BinaryOperator::GreaterEqual => from_bool(a > b || nearly_equal(a, b)),
            BinaryOperator::Equal => from_bool(nearly_equal(a, b)),
            BinaryOperator::NotEqual => from_bool((a - b).abs() > SMALLEST_POSITIVE),

            BinaryOperator::And => from_bool(is_truthy(a) && is_truthy(b)),
            BinaryOperator::Or => from_bool(is_truthy(a) || is_truthy(b)),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Equal => "==",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed formula expression.
#[derive(Debug, Clone)]
pub enum Expression {
    Constant(f64),
    Variable(VariableReference),
    Binary(BinaryOperation),
    Call(FunctionCall),
}

/// Non-owning link to a variable that outlives the tree.
#[derive(Debug, Clone)]
pub struct VariableReference {
    pub variable: Rc<Variable>,
}

#[derive(Debug, Clone)]
pub struct BinaryOperation {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    /// Set by parenthesization and unary minus. Precedence repair never
    /// walks into a sealed node.
    pub sealed: bool,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub function: Rc<Function>,
    pub arguments: Vec<Expression>,
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Expression::Constant(value)
    }

    pub fn variable(variable: Rc<Variable>) -> Self {
        Expression::Variable(VariableReference { variable })
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary(BinaryOperation::new(operator, left, right))
    }

    pub fn call(function: Rc<Function>, arguments: Vec<Expression>) -> Self {
        Expression::Call(FunctionCall {
            function,
            arguments,
        })
    }

    /// True only for constant nodes.
    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    pub fn constant_value(&self) -> Option<f64> {
        match self {
            Expression::Constant(value) => Some(*value),
            _ => None,
        }
    }

    pub fn evaluate(&self) -> CalcResult<f64> {
        match self {
            Expression::Constant(value) => Ok(*value),
            Expression::Variable(reference) => Ok(reference.variable.value()),
            Expression::Binary(operation) => operation.evaluate(),
            Expression::Call(call) => call.function.evaluate(&call.arguments),
        }
    }

    /// Bottom-up rewrite: folds constant sub-trees, moves constants to the
    /// left of commutative operators and regroups same-operator chains so
    /// constants end up next to each other.
    pub fn simplify(self) -> CalcResult<Expression> {
        match self {
            Expression::Constant(value) => Ok(Expression::Constant(value)),
            Expression::Variable(reference) => {
                if reference.variable.is_constant() {
                    Ok(Expression::Constant(reference.variable.value()))
                } else {
                    Ok(Expression::Variable(reference))
                }
            }
            Expression::Binary(operation) => operation.simplify(),
            Expression::Call(call) => call.simplify(),
        }
    }
}

impl BinaryOperation {
    pub fn new(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        BinaryOperation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            sealed: false,
        }
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn sealed(mut self) -> Self {
        self.seal();
        self
    }

    /// True if `operator` may be inserted into this node's left spine:
    /// the node is unsealed and has the same precedence rank.
    pub fn accepts_left_insertion(&self, operator: BinaryOperator) -> bool {
        !self.sealed && self.operator.precedence() == operator.precedence()
    }

    /// Both operands are always evaluated; there is no short-circuiting.
    pub fn evaluate(&self) -> CalcResult<f64> {
        let a = self.left.evaluate()?;
        let b = self.right.evaluate()?;
        Ok(self.operator.apply(a, b))
    }

    fn simplify(self) -> CalcResult<Expression> {
        let BinaryOperation {
            operator,
            left,
            right,
            sealed,
        } = self;
        let mut left = (*left).simplify()?;
        let mut right = (*right).simplify()?;

        if let (Some(a), Some(b)) = (left.constant_value(), right.constant_value()) {
            let value = operator.apply(a, b);
            debug!(target: "SIMPLIFY", "folded ({} {} {}) to {}", a, operator, b, value);
            return Ok(Expression::Constant(value));
        }

        if operator.is_commutative() && right.is_constant() {
            std::mem::swap(&mut left, &mut right);
        }

        let child = match right {
            Expression::Binary(child)
                if operator.is_commutative()
                    && child.operator == operator
                    && child.left.is_constant() =>
            {
                child
            }
            right => {
                return Ok(Expression::Binary(BinaryOperation {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    sealed,
                }))
            }
        };

        let BinaryOperation {
            left: child_left,
            right: child_right,
            ..
        } = child;
        let regrouped = match (left.constant_value(), child_left.constant_value()) {
            (Some(a), Some(b)) => {
                let value = operator.apply(a, b);
                debug!(target: "SIMPLIFY", "combined {} {} {} across a chain", a, operator, b);
                BinaryOperation::new(operator, Expression::Constant(value), *child_right)
            }
            _ => {
                debug!(target: "SIMPLIFY", "rotated constant {} outward", child_left);
                BinaryOperation::new(
                    operator,
                    *child_left,
                    Expression::binary(operator, left, *child_right),
                )
            }
        };

        // The regrouped node may expose another constant pair.
        Expression::Binary(regrouped).simplify()
    }
}

impl FunctionCall {
    pub fn new(function: Rc<Function>, arguments: Vec<Expression>) -> Self {
        FunctionCall {
            function,
            arguments,
        }
    }

    fn simplify(self) -> CalcResult<Expression> {
        let FunctionCall {
            function,
            arguments,
        } = self;
        let arguments = arguments
            .into_iter()
            .map(Expression::simplify)
            .collect::<CalcResult<Vec<_>>>()?;

        if function.is_deterministic() && arguments.iter().all(Expression::is_constant) {
            let value = function.evaluate(&arguments)?;
            debug!(target: "SIMPLIFY", "folded call to {} into {}", function.name(), value);
            return Ok(Expression::Constant(value));
        }

        Ok(Expression::Call(FunctionCall {
            function,
            arguments,
        }))
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::Constant(a), Expression::Constant(b)) => a == b,
            (Expression::Variable(a), Expression::Variable(b)) => a == b,
            (Expression::Binary(a), Expression::Binary(b)) => a == b,
            (Expression::Call(a), Expression::Call(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for VariableReference {
    fn eq(&self, other: &Self) -> bool {
        Variable::same_binding(&self.variable, &other.variable)
    }
}

/// The seal is a parse-time detail and does not take part in equality.
impl PartialEq for BinaryOperation {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.left == other.left && self.right == other.right
    }
}

impl PartialEq for FunctionCall {
    fn eq(&self, other: &Self) -> bool {
        Function::same_function(&self.function, &other.function)
            && self.arguments == other.arguments
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Variable(reference) => write!(f, "{}", reference.variable.name()),
            Expression::Binary(operation) => write!(
                f,
                "({} {} {})",
                operation.left, operation.operator, operation.right
            ),
            Expression::Call(call) => {
                write!(f, "{}(", call.function.name())?;
                for (index, argument) in call.arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}
