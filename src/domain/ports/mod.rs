//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - TestRunner: runs the instrumented test suite and writes a raw profile
//! - CoverageReporter: derives statistics and HTML from a profile
//!
//! These traits keep the pipeline services independent of the concrete
//! toolchain being driven.

pub mod coverage_reporter;
pub mod test_runner;

pub use coverage_reporter::CoverageReporter;
pub use test_runner::{TestRunRequest, TestRunner};
