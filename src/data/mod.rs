//! Input data production.
//!
//! - synthetic per-building readings CSVs (`sample`)

pub mod sample;

pub use sample::*;
