//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main".
//! There is no CLI surface: a single no-argument invocation runs the whole
//! pipeline against the default locations.

use crate::domain::PipelineConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `campus-energy` binary.
pub fn run() -> Result<(), AppError> {
    let config = PipelineConfig::default();
    pipeline::run_pipeline(&config)?;
    Ok(())
}
