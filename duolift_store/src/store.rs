//! The `VarStore` trait and the in-process `MemoryStore`.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use crate::value::{StoreError, Value};

/// Path-addressed read/write variable store.
///
/// The core holds a shared handle and touches only this trait; tests
/// and the simulator binary inject a [`MemoryStore`], a networked
/// deployment fronts the same trait with its protocol server.
pub trait VarStore: Send + Sync {
    /// Read the value at `path`.
    ///
    /// # Errors
    ///
    /// `StoreError::Missing` if nothing was ever written at `path`.
    fn read(&self, path: &str) -> Result<Value, StoreError>;

    /// Write `value` at `path`, creating the path if needed.
    fn write(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Read an integer, treating a missing path as `default`.
    ///
    /// A present-but-mistyped value still errors: the client wrote
    /// something, just not what the core expects.
    fn read_int_or(&self, path: &str, default: i64) -> Result<i64, StoreError> {
        match self.read(path) {
            Ok(value) => value.as_int(),
            Err(StoreError::Missing(_)) => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Read a boolean, treating a missing path as `default`.
    fn read_bool_or(&self, path: &str, default: bool) -> Result<bool, StoreError> {
        match self.read(path) {
            Ok(value) => value.as_bool(),
            Err(StoreError::Missing(_)) => Ok(default),
            Err(e) => Err(e),
        }
    }
}

/// Process-local store backed by a map.
///
/// Interior mutability so the core and an external client (another
/// thread, or test code) can share one instance behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vars: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths that have been written.
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.vars.read().is_empty()
    }
}

impl VarStore for MemoryStore {
    fn read(&self, path: &str) -> Result<Value, StoreError> {
        self.vars
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::Missing(path.to_string()))
    }

    fn write(&self, path: &str, value: Value) -> Result<(), StoreError> {
        trace!(path, ?value, "store write");
        self.vars.write().insert(path.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let store = MemoryStore::new();
        store.write("lift_a/out/row", Value::Int(42)).unwrap();
        assert_eq!(store.read("lift_a/out/row").unwrap(), Value::Int(42));
    }

    #[test]
    fn missing_path_errors() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.read("nope"),
            Err(StoreError::Missing(p)) if p == "nope"
        ));
    }

    #[test]
    fn overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.write("x", Value::Int(1)).unwrap();
        store.write("x", Value::Int(2)).unwrap();
        assert_eq!(store.read("x").unwrap(), Value::Int(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn defaults_cover_missing_but_not_mistyped() {
        let store = MemoryStore::new();
        assert_eq!(store.read_int_or("absent", 7).unwrap(), 7);
        assert!(!store.read_bool_or("absent", false).unwrap());

        store.write("present", Value::Text("oops".into())).unwrap();
        assert!(store.read_int_or("present", 7).is_err());
        assert!(store.read_bool_or("present", false).is_err());
    }

    #[test]
    fn store_is_shareable() {
        use std::sync::Arc;
        let store = Arc::new(MemoryStore::new());
        let clone = Arc::clone(&store);
        clone.write("shared", Value::Bool(true)).unwrap();
        assert!(store.read("shared").unwrap().as_bool().unwrap());
    }
}
