//! In-process reporter that totals statements straight from the profile.
//!
//! Unlike `go tool cover -func`, which prints one decimal, the aggregate here
//! is the exact ratio `covered / total * 100`. HTML rendering is still
//! delegated to the reporter command.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use super::CommandReporter;
use crate::domain::errors::ReportingError;
use crate::domain::models::{
    CoverMode, CoverageProfile, CoverageSummary, Position, StatementTotals, UnitCoverage,
};
use crate::domain::ports::CoverageReporter;

type BlockKey<'a> = (&'a str, Position, Position);

/// Statement-counting reporter.
pub struct StatementReporter {
    html: CommandReporter,
}

impl StatementReporter {
    pub const fn new(html: CommandReporter) -> Self {
        Self { html }
    }

    /// Summarize an in-memory profile: per-file units plus exact totals.
    ///
    /// Blocks listed more than once (one copy per test binary under
    /// `-coverpkg`) are merged first: `set` profiles keep the block covered
    /// if any copy was, `count`/`atomic` profiles add the counts.
    pub fn summarize_profile(profile: &CoverageProfile) -> Result<CoverageSummary, ReportingError> {
        let mut blocks: BTreeMap<BlockKey<'_>, (u64, u64)> = BTreeMap::new();
        for record in &profile.records {
            blocks
                .entry((record.path.as_str(), record.start, record.end))
                .and_modify(|(_, count)| {
                    *count = match profile.mode {
                        CoverMode::Set => (*count).max(record.count),
                        CoverMode::Count | CoverMode::Atomic => count.saturating_add(record.count),
                    };
                })
                .or_insert((record.statements, record.count));
        }

        let mut files: BTreeMap<&str, StatementTotals> = BTreeMap::new();
        let mut totals = StatementTotals::default();
        for ((path, _, _), (statements, count)) in blocks {
            let file = files.entry(path).or_default();
            file.total += statements;
            totals.total += statements;
            if count > 0 {
                file.covered += statements;
                totals.covered += statements;
            }
        }

        let percent = totals.percent().ok_or(ReportingError::EmptyProfile)?;
        let units = files
            .into_iter()
            .map(|(path, file)| UnitCoverage {
                location: path.to_string(),
                name: None,
                percent: file.percent().unwrap_or(0.0),
            })
            .collect();

        CoverageSummary::new(percent, units, Some(totals))
    }
}

#[async_trait]
impl CoverageReporter for StatementReporter {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn summarize(&self, profile: &Path) -> Result<CoverageSummary, ReportingError> {
        let profile = CoverageProfile::read(profile).await?;
        Self::summarize_profile(&profile)
    }

    async fn render_html(&self, profile: &Path, output: &Path) -> Result<(), ReportingError> {
        self.html.render_html(profile, output).await
    }
}
