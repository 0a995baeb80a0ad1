//! covgate - coverage gate for build pipelines
//!
//! Runs a project's test suite with coverage instrumentation, drops records
//! whose source path matches an exclusion pattern, aggregates one coverage
//! percentage and fails the build when it falls below a configured minimum.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): profile and outcome models, errors, port traits
//! - **Service Layer** (`services`): the pipeline stages and their composition
//! - **Adapters** (`adapters`): test runner and reporter implementations
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use covgate::{ConfigLoader, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::from_config(ConfigLoader::load()?)?;
//!     let report = pipeline.run(std::future::pending()).await?;
//!     println!("{}", report.outcome.status_line());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ExecutionError, PipelineError, PipelineResult, ReportingError};
pub use domain::models::{
    Config, CoverMode, CoverageProfile, CoverageRecord, CoverageSummary, ExclusionPolicy,
    RunOutcome, Verdict,
};
pub use domain::ports::{CoverageReporter, TestRunRequest, TestRunner};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Pipeline, PipelineReport};
