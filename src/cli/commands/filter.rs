//! Implementation of the `covgate filter` command.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::ExcludeArgs;
use crate::cli::display::{CommandOutput, action_success, output};
use crate::cli::{GlobalOptions, init_logging, load_config};
use crate::domain::errors::ConfigError;
use crate::domain::models::{CoverageProfile, ExclusionPolicy};
use crate::services::{PatternHits, filter_profile};

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Raw coverage profile to filter
    pub input: PathBuf,

    /// Where to write the filtered profile (defaults to the configured filtered_profile)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub exclusions: ExcludeArgs,
}

#[derive(Debug, Serialize)]
pub struct FilterOutput {
    pub success: bool,
    pub input: PathBuf,
    pub output: PathBuf,
    pub records_in: usize,
    pub records_out: usize,
    pub pattern_hits: Vec<PatternHits>,
}

impl CommandOutput for FilterOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![action_success(&format!(
            "Kept {} of {} records: {} -> {}",
            self.records_out,
            self.records_in,
            self.input.display(),
            self.output.display()
        ))];
        for hit in &self.pattern_hits {
            lines.push(format!("  - {}: {} record(s)", hit.pattern, hit.records));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: FilterArgs, global: &GlobalOptions) -> Result<ExitCode> {
    let config = load_config(global, args.exclusions.overrides())?;
    let _logger = init_logging(&config.logging)?;

    let output_path = args.output.unwrap_or_else(|| config.filtered_profile.clone());
    if std::path::absolute(&output_path).ok() == std::path::absolute(&args.input).ok() {
        return Err(ConfigError::ProfilePathCollision(output_path).into());
    }

    let policy = ExclusionPolicy::new(config.exclude.iter())?;
    let raw = CoverageProfile::read(&args.input)
        .await
        .with_context(|| format!("Failed to load profile {}", args.input.display()))?;

    let filtered = filter_profile(&raw, &policy);
    tracing::info!(
        stage = "filter",
        records_in = raw.len(),
        records_out = filtered.profile.len(),
        "Applied exclusion policy"
    );
    for pattern in filtered.unused_patterns() {
        tracing::warn!(stage = "filter", pattern, "Exclusion pattern matched no records");
    }
    filtered.profile.write(&output_path).await?;

    let result = FilterOutput {
        success: true,
        input: args.input,
        output: output_path,
        records_in: raw.len(),
        records_out: filtered.profile.len(),
        pattern_hits: filtered.pattern_hits,
    };
    output(&result, global.json);
    Ok(ExitCode::SUCCESS)
}
