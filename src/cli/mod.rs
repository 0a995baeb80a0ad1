//! Command-line interface.
//!
//! clap derive structures, per-command handlers and output rendering.

pub mod commands;
pub mod display;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::errors::{ConfigError, PipelineError};
use crate::domain::models::{Config, ConfigOverrides, LoggingConfig};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;

pub use commands::check::CheckArgs;
pub use commands::filter::FilterArgs;
pub use commands::init::InitArgs;
pub use commands::run::RunArgs;

/// Exit status when the pipeline itself is broken (as opposed to coverage
/// being too low, which exits 1).
pub const EXIT_PIPELINE_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "covgate")]
#[command(about = "Run tests with coverage, drop excluded paths and fail below a minimum", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Use this config file instead of .covgate/config.yaml and .covgate/local.yaml
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the test suite with coverage and enforce the minimum
    Run(RunArgs),

    /// Enforce the minimum on an existing raw profile
    Check(CheckArgs),

    /// Only filter a profile by the exclusion patterns
    Filter(FilterArgs),

    /// Write a default .covgate/config.yaml
    Init(InitArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub json: bool,
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            json: self.json,
            config: self.config.clone(),
        }
    }
}

/// Load configuration, apply CLI overrides and validate the result.
pub fn load_config(global: &GlobalOptions, overrides: ConfigOverrides) -> Result<Config> {
    let config = match &global.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let config = config.with_overrides(overrides);
    ConfigLoader::validate(&config)?;
    Ok(config)
}

/// Install the global subscriber for a command.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggerImpl> {
    LoggerImpl::init(config)
}

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> Result<ExitCode> {
    let global = cli.global_options();
    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &global).await,
        Commands::Check(args) => commands::check::execute(args, &global).await,
        Commands::Filter(args) => commands::filter::execute(args, &global).await,
        Commands::Init(args) => commands::init::execute(args, &global).await,
    }
}

/// Report a fatal error and map it to the pipeline-error exit status.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ExitCode {
    let kind = match (err.downcast_ref::<PipelineError>(), err.downcast_ref::<ConfigError>()) {
        (Some(pipeline), _) => pipeline.kind(),
        (None, Some(_)) => "config",
        (None, None) => "error",
    };

    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let value = serde_json::json!({
            "success": false,
            "kind": kind,
            "error": err.to_string(),
            "causes": chain,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_default()
        );
    } else {
        eprintln!("{}", display::action_failure(&format!("{err:#}")));
    }
    ExitCode::from(EXIT_PIPELINE_ERROR)
}
