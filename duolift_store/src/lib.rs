//! Duolift variable store.
//!
//! The lift core communicates with the outside world exclusively
//! through a path-addressed read/write variable store: the external
//! job-issuing client writes task requests and control flags to input
//! paths, the core publishes lift state and fault text to output
//! paths. In production the store is fronted by a networked protocol
//! server; that transport is out of scope here and the core depends
//! only on the [`VarStore`] trait.
//!
//! # Module Structure
//!
//! - [`value`] - Typed values and store errors
//! - [`store`] - The `VarStore` trait and the in-process `MemoryStore`
//! - [`paths`] - Canonical path names for every input and output

pub mod paths;
pub mod store;
pub mod value;

pub use store::{MemoryStore, VarStore};
pub use value::{StoreError, Value};
