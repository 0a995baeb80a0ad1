//! The coverage-verification pipeline.
//!
//! Orchestrator → raw profile → exclusion filter → filtered profile →
//! aggregator → threshold gate. Each stage consumes the previous stage's
//! value; a fatal error at any stage stops everything after it.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::aggregator::{Aggregator, HtmlReport};
use super::exclusion_filter::{PatternHits, filter_profile};
use super::orchestrator::{RunOrchestrator, remove_stale};
use super::threshold_gate::decide;
use crate::adapters::{CommandReporter, CommandTestRunner, StatementReporter};
use crate::domain::errors::{ConfigError, PipelineResult};
use crate::domain::models::{
    Config, CoverageProfile, CoverageSummary, ExclusionPolicy, ReporterKind, RunOutcome,
};
use crate::domain::ports::{CoverageReporter, TestRunRequest, TestRunner};
use crate::infrastructure::config::ConfigLoader;

/// Everything a finished pipeline run knows.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub outcome: RunOutcome,
    pub summary: CoverageSummary,
    /// Records in the raw profile.
    pub records_total: usize,
    /// Records left after exclusions.
    pub records_kept: usize,
    pub pattern_hits: Vec<PatternHits>,
    pub raw_profile: PathBuf,
    pub filtered_profile: PathBuf,
    pub html: HtmlReport,
}

/// A configured pipeline. Configuration is fixed at construction.
pub struct Pipeline {
    config: Config,
    policy: ExclusionPolicy,
    orchestrator: RunOrchestrator,
    aggregator: Aggregator,
    profile: PathBuf,
    filtered_profile: PathBuf,
    html: Option<PathBuf>,
}

impl Pipeline {
    /// Validate `config` and wire the given runner and reporter.
    ///
    /// Artifact paths are made absolute against the current directory, so a
    /// runner with its own working directory still writes where we read.
    pub fn new(
        config: Config,
        runner: Arc<dyn TestRunner>,
        reporter: Arc<dyn CoverageReporter>,
    ) -> Result<Self, ConfigError> {
        ConfigLoader::validate(&config)?;
        let policy = ExclusionPolicy::new(config.exclude.iter())?;

        Ok(Self {
            profile: absolute(&config.profile),
            filtered_profile: absolute(&config.filtered_profile),
            html: config.html_report.as_deref().map(absolute),
            policy,
            orchestrator: RunOrchestrator::new(runner),
            aggregator: Aggregator::new(reporter),
            config,
        })
    }

    /// Pipeline driving the configured external commands.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let runner = Arc::new(CommandTestRunner::new(config.test_runner.clone()));
        let command =
            CommandReporter::new(&config.reporter, config.test_runner.working_dir.clone());
        let reporter: Arc<dyn CoverageReporter> = match config.reporter.kind {
            ReporterKind::Command => Arc::new(command),
            ReporterKind::Builtin => Arc::new(StatementReporter::new(command)),
        };
        Self::new(config, runner, reporter)
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    /// Full pipeline: run the tests, then evaluate the fresh profile.
    ///
    /// The filtered profile and HTML report of an earlier run are deleted
    /// before the tests start, so a failed run leaves no report behind.
    /// Resolving `shutdown` while the tests run cancels the run.
    pub async fn run<F>(&self, shutdown: F) -> PipelineResult<PipelineReport>
    where
        F: Future<Output = ()> + Send,
    {
        let request = TestRunRequest {
            packages: self.config.packages.clone(),
            profile: self.profile.clone(),
        };
        tracing::info!(
            stage = "run",
            packages = ?request.packages,
            profile = %request.profile.display(),
            "Running instrumented tests"
        );

        remove_stale(&self.filtered_profile).await?;
        if let Some(html) = &self.html {
            remove_stale(html).await?;
        }

        let raw = self.orchestrator.run(&request, shutdown).await?;
        self.evaluate(&raw, self.profile.clone()).await
    }

    /// Evaluate an existing raw profile without running the tests.
    pub async fn check(&self, profile: &Path) -> PipelineResult<PipelineReport> {
        let profile = absolute(profile);
        if profile == self.filtered_profile {
            return Err(ConfigError::ProfilePathCollision(profile).into());
        }
        let raw = CoverageProfile::read(&profile).await?;
        self.evaluate(&raw, profile).await
    }

    async fn evaluate(&self, raw: &CoverageProfile, raw_path: PathBuf) -> PipelineResult<PipelineReport> {
        let filtered = filter_profile(raw, &self.policy);
        tracing::info!(
            stage = "filter",
            records_in = raw.len(),
            records_out = filtered.profile.len(),
            excluded = filtered.excluded,
            "Applied exclusion policy"
        );
        for hit in &filtered.pattern_hits {
            tracing::debug!(stage = "filter", pattern = %hit.pattern, records = hit.records, "Pattern matches");
        }
        for pattern in filtered.unused_patterns() {
            tracing::warn!(stage = "filter", pattern, "Exclusion pattern matched no records");
        }

        filtered.profile.write(&self.filtered_profile).await?;

        let aggregate = self
            .aggregator
            .aggregate(&filtered.profile, &self.filtered_profile, self.html.as_deref())
            .await?;

        let outcome = decide(aggregate.summary.percent, self.config.minimum);
        tracing::info!(
            stage = "gate",
            reporter = self.aggregator.reporter_name(),
            observed = outcome.observed,
            minimum = outcome.minimum,
            verdict = %outcome.verdict,
            "Threshold decided"
        );

        Ok(PipelineReport {
            outcome,
            summary: aggregate.summary,
            records_total: raw.len(),
            records_kept: filtered.profile.len(),
            pattern_hits: filtered.pattern_hits,
            raw_profile: raw_path,
            filtered_profile: self.filtered_profile.clone(),
            html: aggregate.html,
        })
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
