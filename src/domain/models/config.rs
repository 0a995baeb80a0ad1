use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for covgate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Minimum aggregate coverage percentage (0-100)
    #[serde(default = "default_minimum")]
    pub minimum: f64,

    /// Target package specifiers handed to the test runner
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,

    /// Exclusion patterns (substring match against record source paths)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Where the test runner writes the raw profile
    #[serde(default = "default_profile")]
    pub profile: PathBuf,

    /// Where the filtered profile is written
    #[serde(default = "default_filtered_profile")]
    pub filtered_profile: PathBuf,

    /// HTML report output; `None` disables rendering
    #[serde(default = "default_html_report")]
    pub html_report: Option<PathBuf>,

    /// Test runner invocation
    #[serde(default)]
    pub test_runner: TestRunnerConfig,

    /// Coverage reporter invocation
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_minimum() -> f64 {
    90.0
}

fn default_packages() -> Vec<String> {
    vec!["./...".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["cmd".to_string(), "generate".to_string()]
}

fn default_profile() -> PathBuf {
    PathBuf::from("coverage.out")
}

fn default_filtered_profile() -> PathBuf {
    PathBuf::from("coverage.filtered.out")
}

#[allow(clippy::unnecessary_wraps)]
fn default_html_report() -> Option<PathBuf> {
    Some(PathBuf::from("coverage.html"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minimum: default_minimum(),
            packages: default_packages(),
            exclude: default_exclude(),
            profile: default_profile(),
            filtered_profile: default_filtered_profile(),
            html_report: default_html_report(),
            test_runner: TestRunnerConfig::default(),
            reporter: ReporterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Overrides supplied on the command line; applied after all config layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub minimum: Option<f64>,
    /// Replaces the configured package list when non-empty
    pub packages: Vec<String>,
    /// Appended to the configured exclusion patterns
    pub exclude: Vec<String>,
    /// Drop the configured exclusion patterns before appending `exclude`
    pub no_default_excludes: bool,
    pub no_html: bool,
}

impl Config {
    /// Apply command-line overrides, consuming the loaded config.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(minimum) = overrides.minimum {
            self.minimum = minimum;
        }
        if !overrides.packages.is_empty() {
            self.packages = overrides.packages;
        }
        if overrides.no_default_excludes {
            self.exclude.clear();
        }
        self.exclude.extend(overrides.exclude);
        if overrides.no_html {
            self.html_report = None;
        }
        self
    }
}

/// Test runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TestRunnerConfig {
    /// Program to execute
    #[serde(default = "default_runner_program")]
    pub program: String,

    /// Arguments; `{profile}` and `{packages}` are substituted
    #[serde(default = "default_runner_args")]
    pub args: Vec<String>,

    /// Working directory (defaults to the current directory)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Abort the run after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Forward runner output to the terminal while it runs
    #[serde(default = "default_true")]
    pub stream_output: bool,
}

fn default_runner_program() -> String {
    "go".to_string()
}

fn default_runner_args() -> Vec<String> {
    ["test", "-coverprofile={profile}", "-coverpkg={packages}", "./..."]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_true() -> bool {
    true
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        Self {
            program: default_runner_program(),
            args: default_runner_args(),
            working_dir: None,
            timeout_secs: None,
            stream_output: default_true(),
        }
    }
}

/// Which reporter computes the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// External reporter command (`go tool cover -func`), one decimal
    Command,
    /// In-process statement totals from the profile itself
    #[default]
    Builtin,
}

/// Coverage reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReporterConfig {
    #[serde(default)]
    pub kind: ReporterKind,

    /// Program to execute
    #[serde(default = "default_reporter_program")]
    pub program: String,

    /// Arguments producing per-function output; `{profile}` is substituted
    #[serde(default = "default_func_args")]
    pub func_args: Vec<String>,

    /// Arguments rendering HTML; `{profile}` and `{html}` are substituted
    #[serde(default = "default_html_args")]
    pub html_args: Vec<String>,
}

fn default_reporter_program() -> String {
    "go".to_string()
}

fn default_func_args() -> Vec<String> {
    ["tool", "cover", "-func={profile}"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_html_args() -> Vec<String> {
    ["tool", "cover", "-html={profile}", "-o", "{html}"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            kind: ReporterKind::default(),
            program: default_reporter_program(),
            func_args: default_func_args(),
            html_args: default_html_args(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for a JSON log file in addition to stderr
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
