//! Domain errors for the coverage gate.
//!
//! Errors fall into three families that must never be confused with each
//! other or with a low-coverage verdict:
//!
//! - [`ConfigError`]: the invocation itself is malformed.
//! - [`ExecutionError`]: the instrumented test run failed or was interrupted.
//! - [`ReportingError`]: a profile exists but no aggregate could be derived.
//!
//! A threshold miss is not an error at all; it is a
//! [`Verdict::Fail`](crate::domain::models::Verdict) outcome.

use std::path::PathBuf;

use thiserror::Error;

/// Render the captured stderr tail as an indented block, or nothing.
fn format_tail(tail: &str) -> String {
    let tail = tail.trim_end();
    if tail.is_empty() {
        String::new()
    } else {
        let indented = tail
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\n{indented}")
    }
}

#[allow(clippy::ref_option)]
fn format_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("exit code {c}"))
}

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid minimum coverage: {0}. Must be a finite percentage between 0 and 100")]
    InvalidMinimum(f64),

    #[error("No target packages configured")]
    NoPackages,

    #[error("Target package specifier at position {0} is empty")]
    EmptyPackage(usize),

    #[error("Exclusion pattern at position {0} is empty")]
    EmptyPattern(usize),

    #[error("{0} program cannot be empty")]
    EmptyProgram(&'static str),

    #[error("{0} path cannot be empty")]
    EmptyPath(&'static str),

    #[error("Raw and filtered profile paths must differ (both are {})", .0.display())]
    ProfilePathCollision(PathBuf),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid timeout: 0 seconds")]
    ZeroTimeout,
}

/// Failures of the instrumented test run. Always fatal; no coverage
/// judgment is made after one of these.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to spawn test runner `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for test runner: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Test run failed with {}{}", format_exit_code(.code), format_tail(.output_tail))]
    TestsFailed {
        code: Option<i32>,
        output_tail: String,
    },

    #[error("Could not remove stale artifact {}: {source}", .path.display())]
    StaleArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Test run cancelled")]
    Cancelled,

    #[error("Test run exceeded the {0}s timeout")]
    TimedOut(u64),

    #[error("Test runner succeeded but wrote no coverage profile at {}", .0.display())]
    MissingProfile(PathBuf),
}

/// Failures deriving an aggregate from a coverage profile.
#[derive(Error, Debug)]
pub enum ReportingError {
    #[error("Coverage profile has no statements left after exclusions; aggregate is undefined")]
    EmptyProfile,

    #[error("Malformed coverage profile at line {line}: {message}")]
    ProfileParse { line: usize, message: String },

    #[error("Failed to spawn coverage reporter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Coverage reporter `{program}` failed with {}{}", format_exit_code(.code), format_tail(.stderr))]
    ReporterFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Could not read coverage reporter output: {0}")]
    Parse(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any fatal pipeline failure.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Reporting error: {0}")]
    Reporting(#[from] ReportingError),
}

impl PipelineError {
    /// Short machine-readable category, used in JSON output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Execution(_) => "execution",
            Self::Reporting(_) => "reporting",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tests_failed_message_includes_code_and_tail() {
        let err = ExecutionError::TestsFailed {
            code: Some(1),
            output_tail: "--- FAIL: TestParse\nFAIL\n".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Test run failed with exit code 1"));
        assert!(msg.contains("\n  --- FAIL: TestParse"));
        assert!(msg.ends_with("  FAIL"));
    }

    #[test]
    fn tests_failed_by_signal_without_tail() {
        let err = ExecutionError::TestsFailed {
            code: None,
            output_tail: "  \n".to_string(),
        };
        assert_eq!(err.to_string(), "Test run failed with a signal");
    }

    #[test]
    fn pipeline_error_kinds_are_distinct() {
        let config = PipelineError::from(ConfigError::NoPackages);
        let exec = PipelineError::from(ExecutionError::Cancelled);
        let report = PipelineError::from(ReportingError::EmptyProfile);

        assert_eq!(config.kind(), "config");
        assert_eq!(exec.kind(), "execution");
        assert_eq!(report.kind(), "reporting");
        assert!(report.to_string().contains("aggregate is undefined"));
    }
}
