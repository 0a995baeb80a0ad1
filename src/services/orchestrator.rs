//! Run orchestrator: drives the instrumented test run and loads the raw
//! profile it produced.
//!
//! The run is raced against a shutdown future (Ctrl-C in the CLI). If the
//! shutdown wins, the runner future is dropped, which kills the child
//! process, and nothing downstream ever sees a partial profile.

use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::errors::{ConfigError, ExecutionError, PipelineResult};
use crate::domain::models::CoverageProfile;
use crate::domain::ports::{TestRunRequest, TestRunner};

/// Reject an empty target set or empty specifiers before spawning anything.
pub fn validate_packages(packages: &[String]) -> Result<(), ConfigError> {
    if packages.is_empty() {
        return Err(ConfigError::NoPackages);
    }
    if let Some(idx) = packages.iter().position(|p| p.trim().is_empty()) {
        return Err(ConfigError::EmptyPackage(idx));
    }
    Ok(())
}

/// Delete an artifact left by an earlier run. A missing file is not an error.
pub async fn remove_stale(path: &Path) -> Result<(), ExecutionError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(stage = "run", path = %path.display(), "Removed stale artifact");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ExecutionError::StaleArtifact {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Runs the test suite through a [`TestRunner`].
pub struct RunOrchestrator {
    runner: Arc<dyn TestRunner>,
}

impl RunOrchestrator {
    pub fn new(runner: Arc<dyn TestRunner>) -> Self {
        Self { runner }
    }

    /// Run the suite and parse the resulting raw profile.
    ///
    /// Any stale profile at the output path is removed first, so a profile is
    /// only ever read if this run wrote it.
    pub async fn run<F>(&self, request: &TestRunRequest, shutdown: F) -> PipelineResult<CoverageProfile>
    where
        F: Future<Output = ()> + Send,
    {
        validate_packages(&request.packages)?;

        remove_stale(&request.profile).await?;

        let started = Instant::now();
        tokio::select! {
            biased;
            () = shutdown => {
                tracing::warn!(stage = "run", runner = self.runner.name(), "Interrupted, stopping test run");
                return Err(ExecutionError::Cancelled.into());
            }
            result = self.runner.run(request) => {
                if let Err(err) = result {
                    tracing::error!(stage = "run", runner = self.runner.name(), error = %err, "Test run failed");
                    return Err(err.into());
                }
            }
        }

        tracing::info!(
            stage = "run",
            runner = self.runner.name(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Test run complete"
        );

        if !matches!(tokio::fs::try_exists(&request.profile).await, Ok(true)) {
            return Err(ExecutionError::MissingProfile(request.profile.clone()).into());
        }

        let profile = CoverageProfile::read(&request.profile).await?;
        tracing::debug!(stage = "run", records = profile.len(), mode = %profile.mode, "Loaded raw profile");
        Ok(profile)
    }
}
