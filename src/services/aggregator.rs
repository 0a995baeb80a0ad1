//! Coverage aggregator.
//!
//! Hands the filtered profile to a [`CoverageReporter`] for the aggregate
//! percentage, then asks for the HTML report. The HTML report is a side
//! artifact: its failure is recorded and logged, never propagated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::adapters::StatementReporter;
use crate::domain::errors::ReportingError;
use crate::domain::models::{CoverageProfile, CoverageSummary};
use crate::domain::ports::CoverageReporter;

/// What happened to the HTML report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HtmlReport {
    /// No output path configured.
    Disabled,
    Written { path: PathBuf },
    Failed { path: PathBuf, error: String },
}

impl HtmlReport {
    pub const fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Disabled => None,
            Self::Written { path } | Self::Failed { path, .. } => Some(path),
        }
    }
}

/// Output of [`Aggregator::aggregate`].
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub summary: CoverageSummary,
    pub html: HtmlReport,
}

/// Derives the aggregate percentage from a filtered profile.
pub struct Aggregator {
    reporter: Arc<dyn CoverageReporter>,
}

impl Aggregator {
    pub fn new(reporter: Arc<dyn CoverageReporter>) -> Self {
        Self { reporter }
    }

    pub fn reporter_name(&self) -> &str {
        self.reporter.name()
    }

    /// Summarize `filtered` (already written at `filtered_path`).
    ///
    /// The reporter supplies the units. When it reports no statement totals
    /// the aggregate is recomputed from `filtered`, so the percentage is
    /// never the reporter's rounded figure.
    ///
    /// A profile with no statements is rejected before the reporter is
    /// invoked: 0/0 has no percentage, and reporting 0% or 100% for it would
    /// be a guess.
    pub async fn aggregate(
        &self,
        filtered: &CoverageProfile,
        filtered_path: &Path,
        html: Option<&Path>,
    ) -> Result<Aggregate, ReportingError> {
        if filtered.records.iter().all(|r| r.statements == 0) {
            return Err(ReportingError::EmptyProfile);
        }

        let mut summary = self.reporter.summarize(filtered_path).await?;
        if summary.statements.is_none() {
            // The reporter only printed a rounded total; the gate needs the
            // exact ratio, which the profile in hand already determines.
            let exact = StatementReporter::summarize_profile(filtered)?;
            tracing::debug!(
                stage = "aggregate",
                reporter = self.reporter.name(),
                reported = summary.percent,
                exact = exact.percent,
                "Replacing rounded aggregate with exact statement totals"
            );
            summary.percent = exact.percent;
            summary.statements = exact.statements;
        }
        tracing::debug!(
            stage = "aggregate",
            reporter = self.reporter.name(),
            percent = summary.percent,
            units = summary.units.len(),
            "Aggregate computed"
        );

        let html = match html {
            None => HtmlReport::Disabled,
            Some(output) => match self.reporter.render_html(filtered_path, output).await {
                Ok(()) => {
                    tracing::info!(stage = "aggregate", html = %output.display(), "HTML report written");
                    HtmlReport::Written {
                        path: output.to_path_buf(),
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        stage = "aggregate",
                        html = %output.display(),
                        error = %err,
                        "HTML report failed; continuing"
                    );
                    HtmlReport::Failed {
                        path: output.to_path_buf(),
                        error: err.to_string(),
                    }
                }
            },
        };

        Ok(Aggregate { summary, html })
    }
}
