//! Test runner port - interface for the instrumented test executor.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::ExecutionError;

/// One instrumented test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunRequest {
    /// Package/module specifiers to instrument.
    pub packages: Vec<String>,
    /// Where the runner must write the raw coverage profile.
    pub profile: PathBuf,
}

/// Trait for test executors that produce a raw coverage profile.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Human-readable runner name, used in logs.
    fn name(&self) -> &str;

    /// Run the full suite with coverage instrumentation.
    ///
    /// Returns once the runner has exited. Any non-zero exit must surface as
    /// an [`ExecutionError`]; the profile is only trusted after `Ok(())`.
    /// Dropping the returned future must stop the underlying process.
    async fn run(&self, request: &TestRunRequest) -> Result<(), ExecutionError>;
}
