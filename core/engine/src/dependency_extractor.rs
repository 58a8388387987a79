//! FILENAME: core/engine/src/dependency_extractor.rs
//! PURPOSE: Extracts variable and function references from parsed expressions.
//! CONTEXT: After a formula is parsed into an AST, this module walks the tree
//! to find every variable it reads and every function it calls. Constants
//! are already folded into the tree by then, so only live bindings show up.
//! Calls the parser synthesizes (conditional, absolute value) are reported
//! under their function names like any other call.

use calc_parser::Expression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Names a formula depends on, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    pub variables: BTreeSet<String>,
    pub functions: BTreeSet<String>,
}

impl Dependencies {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.functions.is_empty()
    }

    /// True if the formula reads the variable `name`.
    pub fn reads(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    /// True if the formula calls the function `name`.
    pub fn calls(&self, name: &str) -> bool {
        self.functions.contains(name)
    }
}

/// Extracts all dependencies from an AST expression.
pub fn extract_dependencies(expr: &Expression) -> Dependencies {
    let mut deps = Dependencies::default();
    extract_recursive(expr, &mut deps);
    deps
}

fn extract_recursive(expr: &Expression, deps: &mut Dependencies) {
    match expr {
        Expression::Constant(_) => {}

        Expression::Variable(reference) => {
            deps.variables
                .insert(reference.variable.name().to_string());
        }

        Expression::Binary(operation) => {
            extract_recursive(&operation.left, deps);
            extract_recursive(&operation.right, deps);
        }

        Expression::Call(call) => {
            deps.functions.insert(call.function.name().to_string());
            for argument in &call.arguments {
                extract_recursive(argument, deps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_parser::{parse, Function, Scope};

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scope() -> Scope {
        let mut scope = Scope::new();
        scope.create_variable("x");
        scope.create_variable("y");
        scope.create_constant("k", 2.0);
        scope.create_function("f", Function::unary("f", |v| v * 2.0, true));
        scope
    }

    #[test]
    fn test_extract_constant() {
        let deps = extract_dependencies(&Expression::constant(1.0));
        assert!(deps.is_empty());
    }

    #[test]
    fn test_extract_variables() {
        let mut scope = scope();
        let expr = parse("x + y * x", &mut scope).unwrap();

        let deps = extract_dependencies(&expr);
        assert_eq!(deps.variables, names(&["x", "y"]));
        assert!(deps.functions.is_empty());
    }

    #[test]
    fn test_folded_constants_are_not_dependencies() {
        let mut scope = scope();
        let expr = parse("k * x + tau", &mut scope).unwrap();

        let deps = extract_dependencies(&expr);
        assert_eq!(deps.variables, names(&["x"]));
    }

    #[test]
    fn test_extract_calls_and_their_arguments() {
        let mut scope = scope();
        let expr = parse("f(y) + |x|", &mut scope).unwrap();

        let deps = extract_dependencies(&expr);
        assert_eq!(deps.functions, names(&["abs", "f"]));
        assert_eq!(deps.variables, names(&["x", "y"]));
        assert!(deps.calls("f"));
        assert!(deps.reads("y"));
        assert!(!deps.reads("k"));
    }

    #[test]
    fn test_conditional_reports_all_branches() {
        let mut scope = scope();
        let expr = parse("x > 0 ? y : 0", &mut scope).unwrap();

        let deps = extract_dependencies(&expr);
        assert_eq!(deps.variables, names(&["x", "y"]));
        assert_eq!(deps.functions, names(&["if"]));
    }

    #[test]
    fn test_dependencies_serialize() {
        let mut scope = scope();
        let expr = parse("f(x)", &mut scope).unwrap();

        let json = serde_json::to_value(extract_dependencies(&expr)).unwrap();
        assert_eq!(json["variables"][0], "x");
        assert_eq!(json["functions"][0], "f");
    }
}
