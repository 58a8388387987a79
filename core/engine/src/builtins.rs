//! FILENAME: core/engine/src/builtins.rs
//! PURPOSE: Standard library of math functions and constants.
//! CONTEXT: Registered into a root scope that user scopes chain to. All
//! functions are deterministic except `now`, so calls with constant
//! arguments fold away at parse time.
//!
//! FUNCTIONS:
//! - Trigonometric: sin, cos, tan, asin, acos, atan, atan2
//! - Hyperbolic: sinh, cosh, tanh, coth
//! - Powers and logs: sqrt, exp, ln, log10, log2, pow, hypot
//! - Rounding and sign: abs, floor, ceil, round, sign
//! - Aggregates (any number of arguments): min, max, sum, avg
//! - Clock: now (seconds since the Unix epoch)

use calc_parser::{Arity, CalcError, CalcResult, Expression, Function, Scope};
use chrono::Utc;

/// Names of every function `register_builtins` binds.
pub const BUILTIN_FUNCTIONS: [&str; 28] = [
    "sin", "cos", "tan", "asin", "acos", "atan", "atan2", "sinh", "cosh", "tanh", "coth", "sqrt",
    "exp", "ln", "log10", "log2", "pow", "hypot", "abs", "floor", "ceil", "round", "sign", "min",
    "max", "sum", "avg", "now",
];

/// Binds the standard functions and the constant `pi` into `scope`.
pub fn register_builtins(scope: &mut Scope) {
    scope.create_constant("pi", std::f64::consts::PI);

    // ==================== Trigonometric ====================
    unary(scope, "sin", f64::sin);
    unary(scope, "cos", f64::cos);
    unary(scope, "tan", f64::tan);
    unary(scope, "asin", f64::asin);
    unary(scope, "acos", f64::acos);
    unary(scope, "atan", f64::atan);
    binary(scope, "atan2", f64::atan2);

    // ==================== Hyperbolic ====================
    unary(scope, "sinh", f64::sinh);
    unary(scope, "cosh", f64::cosh);
    unary(scope, "tanh", f64::tanh);
    unary(scope, "coth", |x| 1.0 / x.tanh());

    // ==================== Powers and Logarithms ====================
    unary(scope, "sqrt", f64::sqrt);
    unary(scope, "exp", f64::exp);
    unary(scope, "ln", f64::ln);
    unary(scope, "log10", f64::log10);
    unary(scope, "log2", f64::log2);
    binary(scope, "pow", f64::powf);
    binary(scope, "hypot", f64::hypot);

    // ==================== Rounding and Sign ====================
    unary(scope, "abs", f64::abs);
    unary(scope, "floor", f64::floor);
    unary(scope, "ceil", f64::ceil);
    unary(scope, "round", f64::round);
    unary(scope, "sign", fn_sign);

    // ==================== Aggregates ====================
    variadic(scope, "min", fn_min);
    variadic(scope, "max", fn_max);
    variadic(scope, "sum", fn_sum);
    variadic(scope, "avg", fn_avg);

    scope.create_function(
        "now",
        Function::general("now", Arity::Fixed(0), false, |_| Ok(fn_now())),
    );
}

fn unary(scope: &mut Scope, name: &str, body: impl Fn(f64) -> f64 + 'static) {
    scope.create_function(name, Function::unary(name, body, true));
}

fn binary(scope: &mut Scope, name: &str, body: impl Fn(f64, f64) -> f64 + 'static) {
    scope.create_function(name, Function::binary(name, body, true));
}

fn variadic(scope: &mut Scope, name: &str, body: fn(&[f64]) -> CalcResult<f64>) {
    scope.create_function(
        name,
        Function::general(name, Arity::Variadic, true, move |arguments| {
            body(&collect_numbers(arguments)?)
        }),
    );
}

/// Evaluates every argument in order, stopping at the first failure.
fn collect_numbers(arguments: &[Expression]) -> CalcResult<Vec<f64>> {
    arguments.iter().map(Expression::evaluate).collect()
}

fn fn_sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum()
    }
}

fn fn_min(numbers: &[f64]) -> CalcResult<f64> {
    if numbers.is_empty() {
        return Ok(0.0);
    }
    Ok(numbers.iter().cloned().fold(f64::INFINITY, f64::min))
}

fn fn_max(numbers: &[f64]) -> CalcResult<f64> {
    if numbers.is_empty() {
        return Ok(0.0);
    }
    Ok(numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
}

fn fn_sum(numbers: &[f64]) -> CalcResult<f64> {
    Ok(numbers.iter().sum())
}

fn fn_avg(numbers: &[f64]) -> CalcResult<f64> {
    if numbers.is_empty() {
        return Err(CalcError::semantic(
            "avg: Expected at least 1 argument, but received 0",
            None,
        ));
    }
    Ok(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

fn fn_now() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
