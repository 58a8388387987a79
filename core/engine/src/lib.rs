//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the formula engine.
//! CONTEXT: Builds on the parser crate: standard builtins, dependency
//! extraction and the `Calculator` facade hosts drive formulas through.

pub mod builtins;
pub mod calculator;
pub mod dependency_extractor;
pub mod formula;

// Re-export commonly used types at the crate root
pub use builtins::{register_builtins, BUILTIN_FUNCTIONS};
pub use calculator::Calculator;
pub use dependency_extractor::{extract_dependencies, Dependencies};
pub use formula::Formula;

pub use calc_parser::{CalcError, CalcResult, ErrorKind, Expression, ParserConfig, Scope};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_evaluates_a_formula() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.evaluate_str("1 + 2 * 3").unwrap(), 7.0);
    }

    #[test]
    fn integration_test_compile_rebind_evaluate() {
        let mut calculator = Calculator::new();
        calculator.set("x", 1.0).unwrap();

        let formula = calculator.compile("x * 10 + sqrt(16)").unwrap();
        assert_eq!(formula.evaluate().unwrap(), 14.0);

        calculator.set("x", 2.0).unwrap();
        assert_eq!(formula.evaluate().unwrap(), 24.0);
    }
}
