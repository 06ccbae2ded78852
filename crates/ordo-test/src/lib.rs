//! ORDO Test Harness - Randomized model testing and order-law checks
//!
//! This crate provides:
//! - Seeded heterogeneous key generation
//! - Sorted map fuzzing against an independent sort
//! - Order-law property helpers

pub mod map_fuzzer;

pub use map_fuzzer::*;
