//! Coverage reporter port - interface for profile statistics and rendering.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::ReportingError;
use crate::domain::models::CoverageSummary;

/// Trait for tools that turn a coverage profile into statistics.
#[async_trait]
pub trait CoverageReporter: Send + Sync {
    /// Human-readable reporter name, used in logs.
    fn name(&self) -> &str;

    /// Per-unit statistics and the aggregate percentage for `profile`.
    async fn summarize(&self, profile: &Path) -> Result<CoverageSummary, ReportingError>;

    /// Render a browsable report for `profile` at `output`.
    async fn render_html(&self, profile: &Path, output: &Path) -> Result<(), ReportingError>;
}
