//! Implementation of the `covgate run` command.

use std::fmt::Write as _;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::ExcludeArgs;
use crate::cli::display::{
    CommandOutput, action_failure, action_success, action_warning, colorize_percent,
    colorize_verdict, create_spinner, label, output, unit_table,
};
use crate::cli::{GlobalOptions, init_logging, load_config};
use crate::domain::models::{ConfigOverrides, Verdict};
use crate::services::{HtmlReport, Pipeline, PipelineReport};

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Minimum aggregate coverage percentage
    #[arg(short, long, value_name = "PERCENT")]
    pub min: Option<f64>,

    /// Target package specifier; repeatable, replaces the configured list
    #[arg(short, long = "package", value_name = "SPEC")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub exclusions: ExcludeArgs,

    /// Skip the HTML report
    #[arg(long)]
    pub no_html: bool,

    /// Print the per-unit coverage table
    #[arg(long)]
    pub units: bool,
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            minimum: self.min,
            packages: self.packages.clone(),
            no_html: self.no_html,
            ..self.exclusions.overrides()
        }
    }
}

/// Result of `run` and `check`.
#[derive(Debug, Serialize)]
pub struct GateOutput {
    pub success: bool,
    pub status: String,
    #[serde(flatten)]
    pub report: PipelineReport,
    #[serde(skip)]
    pub show_units: bool,
}

impl GateOutput {
    pub fn new(report: PipelineReport, show_units: bool) -> Self {
        Self {
            success: report.outcome.passed(),
            status: report.outcome.status_line(),
            report,
            show_units,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.report.outcome.verdict {
            Verdict::Pass => ExitCode::SUCCESS,
            Verdict::Fail => ExitCode::FAILURE,
        }
    }
}

impl CommandOutput for GateOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} {} ({} records, {} excluded)",
            label("Profile"),
            report.raw_profile.display(),
            report.records_total,
            report.records_total - report.records_kept
        );
        let hits: Vec<String> = report
            .pattern_hits
            .iter()
            .map(|hit| format!("{} ({})", hit.pattern, hit.records))
            .collect();
        if !hits.is_empty() {
            let _ = writeln!(out, "{} {}", label("Excluded"), hits.join(", "));
        }
        let _ = writeln!(
            out,
            "{} {}",
            label("Filtered"),
            report.filtered_profile.display()
        );
        match &report.html {
            HtmlReport::Disabled => {}
            HtmlReport::Written { path } => {
                let _ = writeln!(out, "{} {}", label("HTML"), path.display());
            }
            HtmlReport::Failed { path, error } => {
                let _ = writeln!(
                    out,
                    "{}",
                    action_warning(&format!("HTML report {} not written: {error}", path.display()))
                );
            }
        }
        if let Some(totals) = report.summary.statements {
            let _ = writeln!(
                out,
                "{} {}/{} covered",
                label("Statements"),
                totals.covered,
                totals.total
            );
        }

        if self.show_units && !report.summary.units.is_empty() {
            let _ = writeln!(out, "\n{}\n", unit_table(&report.summary.units));
        }

        let outcome = &report.outcome;
        let (observed, minimum) = outcome.display_percentages();
        let status = format!(
            "coverage {} (minimum {minimum}%): {}",
            colorize_percent(format!("{observed}%"), outcome.observed, outcome.minimum),
            colorize_verdict(outcome.verdict)
        );
        out.push_str(&if outcome.passed() {
            action_success(&status)
        } else {
            action_failure(&status)
        });
        out
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

pub async fn execute(args: RunArgs, global: &GlobalOptions) -> Result<ExitCode> {
    let config = load_config(global, args.overrides())?;
    let _logger = init_logging(&config.logging)?;

    let spinner = (!config.test_runner.stream_output && !global.json)
        .then(|| create_spinner("Running tests with coverage..."));

    let pipeline = Pipeline::from_config(config)?;
    let result = pipeline.run(shutdown_signal()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let gate = GateOutput::new(result?, args.units);
    output(&gate, global.json);
    Ok(gate.exit_code())
}
