//! Typed store values and error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No value has ever been written at the path.
    #[error("no value at path '{0}'")]
    Missing(String),

    /// A value exists but has the wrong type for the requested access.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// A value stored at a path.
///
/// The wire protocol knows integers, booleans, and free text; row
/// numbers, enum discriminants, and fault codes all travel as `Int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Name of the contained type, for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
        }
    }

    /// Integer content.
    pub fn as_int(&self) -> Result<i64, StoreError> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(StoreError::TypeMismatch {
                expected: "int",
                found: other.type_name(),
            }),
        }
    }

    /// Boolean content.
    pub fn as_bool(&self) -> Result<bool, StoreError> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(StoreError::TypeMismatch {
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }

    /// Text content.
    pub fn as_text(&self) -> Result<&str, StoreError> {
        match self {
            Self::Text(v) => Ok(v),
            other => Err(StoreError::TypeMismatch {
                expected: "text",
                found: other.type_name(),
            }),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        assert_eq!(Value::Int(42).as_int().unwrap(), 42);
        assert!(Value::Bool(true).as_bool().unwrap());
        assert_eq!(Value::Text("hi".into()).as_text().unwrap(), "hi");
    }

    #[test]
    fn type_mismatch_reports_both_types() {
        let err = Value::Bool(false).as_int().unwrap_err();
        assert_eq!(
            err,
            StoreError::TypeMismatch {
                expected: "int",
                found: "bool"
            }
        );
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(7u16), Value::Int(7));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("x"), Value::Text("x".to_string()));
    }
}
