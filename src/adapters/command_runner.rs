//! Test runner adapter that shells out to a configurable command.
//!
//! The default configuration runs
//! `go test -coverprofile={profile} -coverpkg={packages} ./...`.

use std::time::Duration;

use async_trait::async_trait;

use super::process;
use crate::domain::errors::ExecutionError;
use crate::domain::models::TestRunnerConfig;
use crate::domain::ports::{TestRunRequest, TestRunner};

/// Runs the configured test command and checks its exit status.
pub struct CommandTestRunner {
    config: TestRunnerConfig,
}

impl CommandTestRunner {
    pub const fn new(config: TestRunnerConfig) -> Self {
        Self { config }
    }

    /// `go test` with coverage over the requested packages.
    pub fn go_test() -> Self {
        Self::new(TestRunnerConfig::default())
    }

    fn build_args(&self, request: &TestRunRequest) -> Vec<String> {
        let profile = request.profile.to_string_lossy();
        let packages = request.packages.join(",");
        process::expand_args(
            &self.config.args,
            &[("{profile}", profile.as_ref()), ("{packages}", packages.as_str())],
        )
    }

    async fn execute(&self, request: &TestRunRequest) -> Result<(), ExecutionError> {
        let args = self.build_args(request);
        tracing::debug!(program = %self.config.program, args = ?args, "Spawning test runner");

        let child = process::command(
            &self.config.program,
            &args,
            self.config.working_dir.as_deref(),
        )
        .spawn()
        .map_err(|source| {
            tracing::error!(program = %self.config.program, error = %source, "Failed to spawn test runner");
            ExecutionError::Spawn {
                program: self.config.program.clone(),
                source,
            }
        })?;

        let (status, output_tail) = if self.config.stream_output {
            process::wait_streaming(child)
                .await
                .map_err(ExecutionError::Wait)?
        } else {
            let (status, stdout, stderr) = process::wait_captured(child)
                .await
                .map_err(ExecutionError::Wait)?;
            let combined = format!("{stdout}{stderr}");
            (status, process::tail_lines(&combined, process::OUTPUT_TAIL_LINES))
        };

        if status.success() {
            Ok(())
        } else {
            Err(ExecutionError::TestsFailed {
                code: status.code(),
                output_tail,
            })
        }
    }
}

#[async_trait]
impl TestRunner for CommandTestRunner {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn run(&self, request: &TestRunRequest) -> Result<(), ExecutionError> {
        tracing::info!(
            runner = self.name(),
            packages = ?request.packages,
            profile = %request.profile.display(),
            "Running instrumented test suite"
        );

        match self.config.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), self.execute(request))
                .await
                .map_err(|_| ExecutionError::TimedOut(secs))?,
            None => self.execute(request).await,
        }
    }
}
