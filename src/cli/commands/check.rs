//! Implementation of the `covgate check` command.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use super::ExcludeArgs;
use super::run::GateOutput;
use crate::cli::display::output;
use crate::cli::{GlobalOptions, init_logging, load_config};
use crate::domain::models::ConfigOverrides;
use crate::services::Pipeline;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Raw coverage profile to evaluate
    pub profile: PathBuf,

    /// Minimum aggregate coverage percentage
    #[arg(short, long, value_name = "PERCENT")]
    pub min: Option<f64>,

    #[command(flatten)]
    pub exclusions: ExcludeArgs,

    /// Skip the HTML report
    #[arg(long)]
    pub no_html: bool,

    /// Print the per-unit coverage table
    #[arg(long)]
    pub units: bool,
}

impl CheckArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            minimum: self.min,
            no_html: self.no_html,
            ..self.exclusions.overrides()
        }
    }
}

pub async fn execute(args: CheckArgs, global: &GlobalOptions) -> Result<ExitCode> {
    let config = load_config(global, args.overrides())?;
    let _logger = init_logging(&config.logging)?;

    let pipeline = Pipeline::from_config(config)?;
    let report = pipeline.check(&args.profile).await?;

    let gate = GateOutput::new(report, args.units);
    output(&gate, global.json);
    Ok(gate.exit_code())
}
