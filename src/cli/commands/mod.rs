//! CLI command implementations.

pub mod check;
pub mod filter;
pub mod init;
pub mod run;

use clap::Args;

use crate::domain::models::ConfigOverrides;

/// Exclusion flags shared by `run`, `check` and `filter`.
#[derive(Args, Debug, Clone, Default)]
pub struct ExcludeArgs {
    /// Additional exclusion pattern (substring of the source path); repeatable
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Ignore the configured exclusion patterns
    #[arg(long)]
    pub no_default_excludes: bool,
}

impl ExcludeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            exclude: self.exclude.clone(),
            no_default_excludes: self.no_default_excludes,
            ..ConfigOverrides::default()
        }
    }
}
