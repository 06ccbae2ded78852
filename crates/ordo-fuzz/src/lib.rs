//! ORDO Fuzz - Structured inputs for the cargo-fuzz targets
//!
//! - `FuzzValue`: arbitrary-derived dynamic values
//! - Order-law checks over value triples
//! - Sorted map op replay against a linear-scan model

pub mod replay;
pub mod value;

pub use replay::*;
pub use value::*;
