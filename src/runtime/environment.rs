use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lexer::Token;
use crate::runtime::Value;

/// Environment for variable scoping
///
/// Scopes live in an arena and point at their parent by index. Index 0 is the
/// global scope, which is never removed.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Arena of nested scopes; the innermost scope is the last one
    scopes: Vec<Scope>,
}

/// Single scope in the environment
#[derive(Debug, Clone, Default)]
struct Scope {
    /// Variables defined in this scope
    variables: HashMap<String, Value>,
    /// Index of parent scope (None for global scope)
    parent: Option<usize>,
}

impl Environment {
    /// Creates a new environment with a global scope
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    /// Enters a new nested scope
    pub fn enter_scope(&mut self) {
        let parent_idx = self.scopes.len() - 1;
        self.scopes.push(Scope {
            variables: HashMap::new(),
            parent: Some(parent_idx),
        });
        tracing::trace!(depth = self.scopes.len(), "entered scope");
    }

    /// Exits the current scope and returns to parent scope
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            tracing::trace!(depth = self.scopes.len(), "exited scope");
        }
    }

    /// Defines a variable in the current scope, overwriting any previous
    /// binding of the same name in that scope
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let idx = self.innermost();
        self.scopes[idx].variables.insert(name.into(), value);
    }

    /// Gets the value of a variable, walking from the innermost scope outward
    pub fn get(&self, name: &Token) -> Result<Value> {
        self.lookup(&name.lexeme)
            .cloned()
            .ok_or_else(|| undefined(name))
    }

    /// Assigns to an existing variable in the nearest scope that defines it.
    ///
    /// Assignment never declares: an unknown name is an error.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        match self.resolve(&name.lexeme) {
            Some(idx) => {
                self.scopes[idx]
                    .variables
                    .insert(name.lexeme.clone(), value);
                Ok(())
            }
            None => Err(undefined(name)),
        }
    }

    /// Looks a variable up by name without producing a diagnostic
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.resolve(name)
            .and_then(|idx| self.scopes[idx].variables.get(name))
    }

    /// Checks if a variable exists in any enclosing scope
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Returns the current scope depth (1 for global scope)
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    fn innermost(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Index of the innermost scope that defines `name`
    fn resolve(&self, name: &str) -> Option<usize> {
        let mut scope_idx = self.innermost();
        loop {
            let scope = &self.scopes[scope_idx];
            if scope.variables.contains_key(name) {
                return Some(scope_idx);
            }
            scope_idx = scope.parent?;
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn undefined(name: &Token) -> Error {
    Error::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}
