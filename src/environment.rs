use crate::ast::Expression;
use crate::object::Object;
use indexmap::IndexMap;
use std::fmt;

/// Environment maps variable names to the expression that last defined them (written while
/// parsing) and to their current value (written while evaluating). Both tables keep insertion
/// order. Reads during evaluation only consult the values.
#[derive(Default, Debug, Clone)]
pub struct Environment {
    expressions: IndexMap<String, Expression>,
    values: IndexMap<String, Object>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn define_expression(&mut self, name: &str, expression: Expression) {
        self.expressions.insert(name.to_string(), expression);
    }

    pub fn expression(&self, name: &str) -> Option<&Expression> {
        self.expressions.get(name)
    }

    pub fn set(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        self.values.get(name).cloned()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.expressions.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.expressions.clear();
        self.values.clear();
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Variable expressions :")?;
        for (name, expression) in &self.expressions {
            writeln!(f, "{} | {}", name, expression)?;
        }
        writeln!(f)?;
        writeln!(f, "Value of variables :")?;
        for (name, value) in &self.values {
            writeln!(f, "{} | {}", name, value.inspect())?;
        }
        Ok(())
    }
}
