//! Coverage reporter adapter around `go tool cover`.
//!
//! `-func` output is one line per function plus a closing total:
//!
//! ```text
//! github.com/org/project/vm/vm.go:52:      Run             93.1%
//! github.com/org/project/vm/vm.go:410:     push            100.0%
//! total:                                   (statements)    91.7%
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::process;
use crate::domain::errors::ReportingError;
use crate::domain::models::{CoverageSummary, ReporterConfig, UnitCoverage};
use crate::domain::ports::CoverageReporter;

const TOTAL_LABEL: &str = "total:";

/// Runs the configured reporter program for statistics and HTML.
#[derive(Debug, Clone)]
pub struct CommandReporter {
    program: String,
    func_args: Vec<String>,
    html_args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandReporter {
    pub fn new(config: &ReporterConfig, working_dir: Option<PathBuf>) -> Self {
        Self {
            program: config.program.clone(),
            func_args: config.func_args.clone(),
            html_args: config.html_args.clone(),
            working_dir,
        }
    }

    /// `go tool cover` in the current directory.
    pub fn go_tool_cover() -> Self {
        Self::new(&ReporterConfig::default(), None)
    }

    /// Run the reporter with `args`, returning its stdout.
    async fn invoke(&self, args: Vec<String>) -> Result<String, ReportingError> {
        tracing::debug!(program = %self.program, args = ?args, "Invoking coverage reporter");

        let child = process::command(&self.program, &args, self.working_dir.as_deref())
            .spawn()
            .map_err(|source| ReportingError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let (status, stdout, stderr) = process::wait_captured(child).await.map_err(|source| {
            ReportingError::Spawn {
                program: self.program.clone(),
                source,
            }
        })?;

        if status.success() {
            Ok(stdout)
        } else {
            Err(ReportingError::ReporterFailed {
                program: self.program.clone(),
                code: status.code(),
                stderr: process::tail_lines(&stderr, process::OUTPUT_TAIL_LINES),
            })
        }
    }

    /// Parse `-func` output into a summary.
    pub fn parse_func_output(text: &str) -> Result<CoverageSummary, ReportingError> {
        let mut units = Vec::new();
        let mut total = None;

        for line in text.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let Some((last, rest)) = fields.split_last() else {
                continue;
            };
            let percent = parse_percent(last)
                .ok_or_else(|| ReportingError::Parse(format!("no percentage in line '{line}'")))?;

            match rest {
                [label, ..] if *label == TOTAL_LABEL => total = Some(percent),
                [location, name @ ..] if !name.is_empty() => units.push(UnitCoverage {
                    location: location.trim_end_matches(':').to_string(),
                    name: Some(name.join(" ")),
                    percent,
                }),
                _ => {
                    return Err(ReportingError::Parse(format!(
                        "unrecognized reporter line '{line}'"
                    )))
                }
            }
        }

        let percent = total
            .ok_or_else(|| ReportingError::Parse("reporter output has no total line".to_string()))?;
        CoverageSummary::new(percent, units, None)
    }
}

fn parse_percent(field: &str) -> Option<f64> {
    field.strip_suffix('%')?.parse().ok()
}

#[async_trait]
impl CoverageReporter for CommandReporter {
    fn name(&self) -> &str {
        &self.program
    }

    async fn summarize(&self, profile: &Path) -> Result<CoverageSummary, ReportingError> {
        let profile = profile.to_string_lossy();
        let args = process::expand_args(&self.func_args, &[("{profile}", profile.as_ref())]);
        let stdout = self.invoke(args).await?;
        Self::parse_func_output(&stdout)
    }

    async fn render_html(&self, profile: &Path, output: &Path) -> Result<(), ReportingError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ReportingError::io(parent, e))?;
        }
        let profile = profile.to_string_lossy();
        let html = output.to_string_lossy();
        let args = process::expand_args(
            &self.html_args,
            &[("{profile}", profile.as_ref()), ("{html}", html.as_ref())],
        );
        self.invoke(args).await.map(|_| ())
    }
}
