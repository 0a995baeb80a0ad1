//! Domain layer for the coverage gate
//!
//! This module contains the profile/outcome models, the error taxonomy and
//! the port traits implemented by adapters.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ConfigError, ExecutionError, PipelineError, PipelineResult, ReportingError};
