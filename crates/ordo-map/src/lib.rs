//! Ordo Map - ordered associative container over an external store
//!
//! This crate implements the sorted map layer:
//! - Entry store contract and an in-memory store
//! - Binary search under the universal order
//! - Lookup, insert, update and delete by key
//! - Lock-protected shared handle

pub mod error;
pub mod map;
pub mod shared;
pub mod store;

pub use error::*;
pub use map::*;
pub use shared::*;
pub use store::*;
