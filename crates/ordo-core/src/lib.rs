//! ORDO Core - Dynamic values and their universal order
//!
//! This crate defines:
//! - The dynamic [`Value`] model (scalars, strings, containers, numeric arrays,
//!   opaque values)
//! - The upcast lattice relating kinds of one family
//! - The [`Comparator`], a strict total order over every value
//! - Comparator configuration and errors

pub mod config;
pub mod error;
pub mod lattice;
pub mod order;
pub mod value;

pub use config::*;
pub use error::*;
pub use lattice::{common_kind, Position};
pub use order::*;
pub use value::*;
