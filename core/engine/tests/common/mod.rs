//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for engine integration tests.

#![allow(dead_code)]

use calc_engine::{Calculator, ErrorKind, Formula};

/// Absolute tolerance for results that go through transcendental functions.
pub const TOLERANCE: f64 = 1e-9;

/// Test harness wrapping a calculator with the standard builtins.
pub struct TestHarness {
    pub calculator: Calculator,
}

impl TestHarness {
    /// Create a new test harness with no user variables.
    pub fn new() -> Self {
        TestHarness {
            calculator: Calculator::new(),
        }
    }

    /// Create a harness with the given variables bound.
    pub fn with_variables(variables: &[(&str, f64)]) -> Self {
        let mut harness = Self::new();
        for (name, value) in variables {
            harness.set(name, *value);
        }
        harness
    }

    /// Create a harness with geometry fixtures: r, w, h and the constant g.
    pub fn with_geometry() -> Self {
        let mut harness = Self::with_variables(&[("r", 2.0), ("w", 3.0), ("h", 4.0)]);
        harness.calculator.define_constant("g", 9.81);
        harness
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.calculator
            .set(name, value)
            .unwrap_or_else(|e| panic!("set {} failed: {}", name, e));
    }

    pub fn compile(&mut self, source: &str) -> Formula {
        self.calculator
            .compile(source)
            .unwrap_or_else(|e| panic!("'{}' failed to compile: {}", source, e))
    }

    pub fn eval(&mut self, source: &str) -> f64 {
        self.compile(source)
            .evaluate()
            .unwrap_or_else(|e| panic!("'{}' failed to evaluate: {}", source, e))
    }

    /// Asserts an exact result.
    pub fn assert_eval(&mut self, source: &str, expected: f64) {
        let actual = self.eval(source);
        assert_eq!(actual, expected, "'{}'", source);
    }

    /// Asserts a result within `TOLERANCE`.
    pub fn assert_close(&mut self, source: &str, expected: f64) {
        let actual = self.eval(source);
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "'{}': expected {}, got {}",
            source,
            expected,
            actual
        );
    }

    /// Asserts that compiling or evaluating `source` fails with `kind`.
    pub fn assert_error(&mut self, source: &str, kind: ErrorKind) {
        let result = self
            .calculator
            .compile(source)
            .and_then(|formula| formula.evaluate());
        match result {
            Ok(value) => panic!("'{}' evaluated to {}, expected {:?}", source, value, kind),
            Err(e) => assert_eq!(e.kind(), kind, "'{}': {}", source, e),
        }
    }
}
