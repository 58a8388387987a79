//! FILENAME: core/parser/src/scope.rs
//! PURPOSE: Symbol table mapping names to variables and functions.
//! CONTEXT: The parser resolves identifiers here at parse time. A scope may
//! chain to a parent, which is consulted on a local miss. There is no hidden
//! global root: a root scope is any scope created without a parent, and hosts
//! pass it around explicitly (typically as the parent holding builtins).

use crate::function::Function;
use crate::variable::Variable;
use log::warn;
use rustc_hash::FxHashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<Rc<Scope>>,
    variables: FxHashMap<String, Rc<Variable>>,
    functions: FxHashMap<String, Rc<Function>>,
}

impl Scope {
    /// Creates a root scope with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    /// Creates a scope that falls back to `parent` on lookup misses.
    pub fn with_parent(parent: Rc<Scope>) -> Self {
        Scope {
            parent: Some(parent),
            ..Scope::default()
        }
    }

    pub fn parent(&self) -> Option<&Rc<Scope>> {
        self.parent.as_ref()
    }

    /// Binds an immutable value. An existing local binding of the same name
    /// is turned into a constant in place so references to it stay valid.
    pub fn create_constant(&mut self, name: &str, value: f64) -> Rc<Variable> {
        if let Some(existing) = self.variables.get(name) {
            if !existing.is_constant() {
                warn!(target: "SCOPE", "variable '{}' is now a constant", name);
            }
            existing.make_constant(value);
            return Rc::clone(existing);
        }

        let variable = Rc::new(Variable::new(name));
        variable.make_constant(value);
        self.variables.insert(name.to_string(), Rc::clone(&variable));
        variable
    }

    /// Binds a mutable slot initialised to 0, or returns the existing local one.
    pub fn create_variable(&mut self, name: &str) -> Rc<Variable> {
        Rc::clone(
            self.variables
                .entry(name.to_string())
                .or_insert_with(|| Rc::new(Variable::new(name))),
        )
    }

    /// Binds a function. If the name is already bound locally the existing
    /// function is kept and returned.
    pub fn create_function(&mut self, name: &str, function: Function) -> Rc<Function> {
        Rc::clone(
            self.functions
                .entry(name.to_string())
                .or_insert_with(|| Rc::new(function)),
        )
    }

    pub fn get_variable(&self, name: &str) -> Option<Rc<Variable>> {
        match self.variables.get(name) {
            Some(variable) => Some(Rc::clone(variable)),
            None => self.parent.as_ref()?.get_variable(name),
        }
    }

    pub fn get_function(&self, name: &str) -> Option<Rc<Function>> {
        match self.functions.get(name) {
            Some(function) => Some(Rc::clone(function)),
            None => self.parent.as_ref()?.get_function(name),
        }
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<Rc<Variable>> {
        self.variables.remove(name)
    }

    pub fn remove_function(&mut self, name: &str) -> Option<Rc<Function>> {
        self.functions.remove(name)
    }

    /// Names bound in this scope only, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .variables
            .keys()
            .chain(self.functions.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Local names followed by the names of every ancestor.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.local_names();
        if let Some(parent) = &self.parent {
            names.extend(parent.names());
        }
        names
    }

    /// Local variables followed by those of every ancestor.
    pub fn variables(&self) -> Vec<Rc<Variable>> {
        let mut variables: Vec<Rc<Variable>> = self.variables.values().cloned().collect();
        if let Some(parent) = &self.parent {
            variables.extend(parent.variables());
        }
        variables
    }

    /// Local functions followed by those of every ancestor.
    pub fn functions(&self) -> Vec<Rc<Function>> {
        let mut functions: Vec<Rc<Function>> = self.functions.values().cloned().collect();
        if let Some(parent) = &self.parent {
            functions.extend(parent.functions());
        }
        functions
    }
}
