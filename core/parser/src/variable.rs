//! FILENAME: core/parser/src/variable.rs
//! PURPOSE: Named numeric slots shared between a scope and the trees that read them.
//! CONTEXT: A `Variable` lives behind an `Rc` and is referenced, never copied,
//! by every expression node that names it. Writes from the host between
//! evaluations are visible to all of those nodes. Single-threaded by design.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub struct Variable {
    name: String,
    value: Cell<f64>,
    constant: Cell<bool>,
}

impl Variable {
    /// Creates a mutable variable with value 0.
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            value: Cell::new(0.0),
            constant: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn set_value(&self, value: f64) {
        self.value.set(value);
    }

    pub fn is_constant(&self) -> bool {
        self.constant.get()
    }

    /// Freezes the variable with `value`. Constants are folded into trees at
    /// parse time, so later writes are not seen by already parsed trees.
    pub fn make_constant(&self, value: f64) {
        self.constant.set(true);
        self.value.set(value);
    }

    /// Detached copy carrying `value`.
    pub fn with_value(&self, value: f64) -> Variable {
        Variable {
            name: self.name.clone(),
            value: Cell::new(value),
            constant: Cell::new(self.is_constant()),
        }
    }

    /// Two bindings are the same when they are the same cell, or when both
    /// are constants holding the same value.
    pub fn same_binding(a: &Rc<Variable>, b: &Rc<Variable>) -> bool {
        Rc::ptr_eq(a, b) || (a.is_constant() && b.is_constant() && a.value() == b.value())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value())
    }
}
