//! Domain models for the coverage gate.

pub mod config;
pub mod outcome;
pub mod policy;
pub mod profile;
pub mod summary;

pub use config::{
    Config, ConfigOverrides, LoggingConfig, ReporterConfig, ReporterKind, TestRunnerConfig,
};
pub use outcome::{RunOutcome, Verdict};
pub use policy::ExclusionPolicy;
pub use profile::{CoverMode, CoverageProfile, CoverageRecord, Position};
pub use summary::{CoverageSummary, StatementTotals, UnitCoverage};
