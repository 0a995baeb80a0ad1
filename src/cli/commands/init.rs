//! Implementation of the `covgate init` command.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tokio::fs;

use crate::cli::GlobalOptions;
use crate::cli::display::{CommandOutput, action_failure, action_success, output};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;

const CONFIG_HEADER: &str = "\
# covgate configuration
#
# Precedence (lowest to highest): these defaults, this file, .covgate/local.yaml,
# COVGATE_* environment variables (COVGATE_REPORTER__KIND=command), CLI flags.
";

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing configuration
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let line = format!("{} ({})", self.message, self.config_path.display());
        if self.success {
            action_success(&line)
        } else {
            action_failure(&line)
        }
    }
}

/// Default configuration file contents.
pub fn default_config_yaml() -> Result<String> {
    let body = serde_yaml::to_string(&Config::default())
        .context("Failed to serialize default configuration")?;
    Ok(format!("{CONFIG_HEADER}{body}"))
}

pub async fn execute(args: InitArgs, global: &GlobalOptions) -> Result<ExitCode> {
    let config_dir = args.path.join(CONFIG_DIR);
    let config_path = config_dir.join("config.yaml");

    if fs::try_exists(&config_path).await.unwrap_or(false) && !args.force {
        let result = InitOutput {
            success: false,
            message: "Configuration already exists. Use --force to overwrite.".to_string(),
            config_path,
        };
        output(&result, global.json);
        return Ok(ExitCode::FAILURE);
    }

    fs::create_dir_all(&config_dir)
        .await
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    fs::write(&config_path, default_config_yaml()?)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let result = InitOutput {
        success: true,
        message: if args.force {
            "Configuration rewritten.".to_string()
        } else {
            "Configuration initialized.".to_string()
        },
        config_path,
    };
    output(&result, global.json);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> GlobalOptions {
        GlobalOptions {
            json: true,
            config: None,
        }
    }

    #[test]
    fn default_yaml_round_trips() {
        let yaml = default_config_yaml().unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.exclude, Config::default().exclude);
        assert_eq!(parsed.html_report, Config::default().html_report);
    }

    #[tokio::test]
    async fn init_writes_and_respects_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            force: false,
            path: dir.path().to_path_buf(),
        };
        let path = dir.path().join(CONFIG_DIR).join("config.yaml");

        execute(args.clone(), &global()).await.unwrap();
        assert!(path.is_file());

        std::fs::write(&path, "minimum: 50\n").unwrap();
        execute(args, &global()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "minimum: 50\n");

        let forced = InitArgs {
            force: true,
            path: dir.path().to_path_buf(),
        };
        execute(forced, &global()).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("minimum: 90"));
    }
}
