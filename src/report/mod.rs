//! Report formatting.
//!
//! Kept separate from file writing so output changes stay localized and
//! the report text is testable as a plain string.

pub mod format;

pub use format::*;
