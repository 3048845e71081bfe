//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the unified-table row (`Reading`) and its aggregate views
//! - structured ingest error records (`FileError`)
//! - the run-wide configuration (`PipelineConfig`)

pub mod types;

pub use types::*;
