//! Mock runner and reporter for testing.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::StatementReporter;
use crate::domain::errors::{ExecutionError, ReportingError};
use crate::domain::models::{CoverageProfile, CoverageSummary};
use crate::domain::ports::{CoverageReporter, TestRunRequest, TestRunner};

/// What a [`MockTestRunner`] does when asked to run.
#[derive(Debug, Clone)]
pub enum MockRun {
    /// Write this profile text and succeed.
    Profile(String),
    /// Succeed without writing anything.
    NoProfile,
    /// Fail as if tests failed.
    Fail { code: i32, output: String },
    /// Never finish (for cancellation tests).
    Hang,
}

impl MockRun {
    pub fn profile(text: impl Into<String>) -> Self {
        Self::Profile(text.into())
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self::Fail {
            code: 1,
            output: output.into(),
        }
    }
}

/// Test runner double that records its requests.
#[derive(Debug)]
pub struct MockTestRunner {
    behavior: MockRun,
    requests: Mutex<Vec<TestRunRequest>>,
}

impl MockTestRunner {
    pub const fn new(behavior: MockRun) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<TestRunRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TestRunner for MockTestRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, request: &TestRunRequest) -> Result<(), ExecutionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.behavior {
            MockRun::Profile(text) => tokio::fs::write(&request.profile, text)
                .await
                .map_err(ExecutionError::Wait),
            MockRun::NoProfile => Ok(()),
            MockRun::Fail { code, output } => Err(ExecutionError::TestsFailed {
                code: Some(*code),
                output_tail: output.clone(),
            }),
            MockRun::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

/// Reporter double: exact statement totals, with a stub HTML renderer that
/// can be told to fail.
#[derive(Debug, Default)]
pub struct MockReporter {
    fail_html: bool,
    rounded: bool,
    summaries: AtomicUsize,
    rendered: Mutex<Vec<PathBuf>>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter whose HTML rendering always fails.
    pub fn failing_html() -> Self {
        Self {
            fail_html: true,
            ..Self::default()
        }
    }

    /// A reporter that behaves like `go tool cover -func`: one decimal and
    /// no statement totals.
    pub fn rounded() -> Self {
        Self {
            rounded: true,
            ..Self::default()
        }
    }

    pub fn summarize_calls(&self) -> usize {
        self.summaries.load(Ordering::SeqCst)
    }

    /// HTML outputs written so far.
    pub fn rendered(&self) -> Vec<PathBuf> {
        self.rendered
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CoverageReporter for MockReporter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn summarize(&self, profile: &Path) -> Result<CoverageSummary, ReportingError> {
        self.summaries.fetch_add(1, Ordering::SeqCst);
        let profile = CoverageProfile::read(profile).await?;
        let exact = StatementReporter::summarize_profile(&profile)?;
        if self.rounded {
            return CoverageSummary::new((exact.percent * 10.0).round() / 10.0, exact.units, None);
        }
        Ok(exact)
    }

    async fn render_html(&self, profile: &Path, output: &Path) -> Result<(), ReportingError> {
        if self.fail_html {
            return Err(ReportingError::ReporterFailed {
                program: "mock".to_string(),
                code: Some(1),
                stderr: "html rendering disabled".to_string(),
            });
        }
        tokio::fs::write(output, format!("<html>{}</html>\n", profile.display()))
            .await
            .map_err(|e| ReportingError::io(output, e))?;
        if let Ok(mut rendered) = self.rendered.lock() {
            rendered.push(output.to_path_buf());
        }
        Ok(())
    }
}
