//! Dashboard rendering.
//!
//! - three-panel PNG dashboard (`dashboard`)

pub mod dashboard;

pub use dashboard::*;
