//! FILENAME: core/engine/src/calculator.rs
//! PURPOSE: Host-facing facade: owns the scopes, compiles formulas, rebinds
//! variables between evaluations.
//! CONTEXT: Builtins live in a shared root scope. User variables and
//! constants live in a child scope, which is the one formulas are parsed
//! against. Compile once, then `set` variables and `evaluate` as often as
//! needed.

use crate::builtins::register_builtins;
use crate::dependency_extractor::extract_dependencies;
use crate::formula::Formula;
use calc_parser::{parse_with_config, CalcError, CalcResult, ParserConfig, Scope, Variable};
use log::{debug, info};
use std::rc::Rc;

pub struct Calculator {
    scope: Scope,
    config: ParserConfig,
}

impl Calculator {
    /// Creates a calculator with the standard builtins.
    pub fn new() -> Self {
        Calculator::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        let mut builtins = Scope::new();
        register_builtins(&mut builtins);
        Calculator {
            scope: Scope::with_parent(Rc::new(builtins)),
            config,
        }
    }

    /// Binds `name` to `value`, creating the variable on first use.
    /// Fails if `name` is a constant.
    pub fn set(&mut self, name: &str, value: f64) -> CalcResult<()> {
        if let Some(existing) = self.scope.get_variable(name) {
            if existing.is_constant() {
                return Err(CalcError::semantic(
                    format!("Cannot assign to constant: '{}'", name),
                    None,
                ));
            }
        }

        debug!(target: "ENGINE", "set {} = {}", name, value);
        self.scope.create_variable(name).set_value(value);
        Ok(())
    }

    /// Binds an immutable value. Formulas compiled afterwards fold it in.
    pub fn define_constant(&mut self, name: &str, value: f64) -> Rc<Variable> {
        self.scope.create_constant(name, value)
    }

    /// Declares a variable without changing its value.
    pub fn declare(&mut self, name: &str) -> Rc<Variable> {
        self.scope.create_variable(name)
    }

    pub fn variable(&self, name: &str) -> Option<Rc<Variable>> {
        self.scope.get_variable(name)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Parses and simplifies `source` against the calculator's scope.
    pub fn compile(&mut self, source: &str) -> CalcResult<Formula> {
        let expression = parse_with_config(source, &mut self.scope, &self.config)?;
        let dependencies = extract_dependencies(&expression);
        info!(
            target: "ENGINE",
            "compiled '{}' ({} variables, {} functions)",
            source,
            dependencies.variables.len(),
            dependencies.functions.len()
        );
        Ok(Formula::new(source.to_string(), expression, dependencies))
    }

    /// Compiles and evaluates `source` once.
    pub fn evaluate_str(&mut self, source: &str) -> CalcResult<f64> {
        self.compile(source)?.evaluate()
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new()
    }
}
