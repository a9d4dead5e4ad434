use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexer::Literal;

/// Runtime value representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Nil value
    Nil,
    /// Boolean value
    Boolean(bool),
    /// 64-bit floating-point value
    Number(f64),
    /// String value
    String(String),
}

impl Value {
    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    /// Returns true if the value is truthy in a boolean context.
    ///
    /// Only `nil` and `false` are falsy; `0` and `""` are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Number(_) | Value::String(_) => true,
        }
    }

    /// Returns the number if this is a `Number`
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a `String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

// Values of different types are never equal
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Boolean(true).type_name(), "boolean");
        assert_eq!(Value::Number(2.71).type_name(), "number");
        assert_eq!(Value::String("test".to_string()).type_name(), "string");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::Number(42.0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
        assert!(Value::String("test".to_string()).is_truthy());
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Boolean(true), Value::Boolean(false));
        assert_eq!(Value::from("a"), Value::from("a"));
        assert_eq!(Value::Number(1.5), Value::Number(1.5));

        // Mismatched types compare unequal rather than erroring
        assert_ne!(Value::Nil, Value::Boolean(false));
        assert_ne!(Value::Number(0.0), Value::Boolean(false));
        assert_ne!(Value::String("1".to_string()), Value::Number(1.0));

        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.125).to_string(), "-0.125");
        assert_eq!(Value::String("hi there".to_string()).to_string(), "hi there");
    }

    #[test]
    fn test_from_literal() {
        assert_eq!(Value::from(&Literal::Number(3.0)), Value::Number(3.0));
        assert_eq!(
            Value::from(&Literal::String("s".to_string())),
            Value::String("s".to_string())
        );
    }
}
