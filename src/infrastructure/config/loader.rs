use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};

pub use crate::domain::errors::ConfigError;
use crate::domain::models::config::Config;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".covgate";

/// Environment variable prefix; `__` separates nested keys.
pub const ENV_PREFIX: &str = "COVGATE_";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .covgate/config.yaml (project config, created by init)
    /// 3. .covgate/local.yaml (project local overrides, optional)
    /// 4. Environment variables (COVGATE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`load`](Self::load), reading the project files under `root`.
    pub fn load_from(root: &Path) -> Result<Config> {
        let dir = root.join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// The project files are skipped; environment variables still apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if !config.minimum.is_finite() || !(0.0..=100.0).contains(&config.minimum) {
            return Err(ConfigError::InvalidMinimum(config.minimum));
        }

        crate::services::orchestrator::validate_packages(&config.packages)?;

        if let Some(idx) = config.exclude.iter().position(String::is_empty) {
            return Err(ConfigError::EmptyPattern(idx));
        }

        if config.test_runner.program.trim().is_empty() {
            return Err(ConfigError::EmptyProgram("Test runner"));
        }
        if config.reporter.program.trim().is_empty() {
            return Err(ConfigError::EmptyProgram("Coverage reporter"));
        }
        if config.test_runner.timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        if config.profile.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("Raw profile"));
        }
        if config.filtered_profile.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("Filtered profile"));
        }
        if config.profile == config.filtered_profile {
            return Err(ConfigError::ProfilePathCollision(config.profile.clone()));
        }
        if config
            .html_report
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyPath("HTML report"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ReporterKind;
    use std::path::PathBuf;

    fn write_project_file(root: &Path, name: &str, yaml: &str) {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), yaml).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_validate_minimum_bounds() {
        for minimum in [-0.1, 100.1, f64::NAN, f64::INFINITY] {
            let config = Config {
                minimum,
                ..Default::default()
            };
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidMinimum(_))
            ));
        }
        for minimum in [0.0, 100.0] {
            let config = Config {
                minimum,
                ..Default::default()
            };
            assert!(ConfigLoader::validate(&config).is_ok());
        }
    }

    #[test]
    fn test_validate_packages() {
        let mut config = Config::default();
        config.packages.clear();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::NoPackages)
        ));

        config.packages = vec!["./...".to_string(), String::new()];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyPackage(1))
        ));
    }

    #[test]
    fn test_validate_empty_pattern() {
        let mut config = Config::default();
        config.exclude.push(String::new());
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyPattern(2))
        ));
    }

    #[test]
    fn test_validate_programs_and_timeout() {
        let mut config = Config::default();
        config.reporter.program = " ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyProgram("Coverage reporter"))
        ));

        let mut config = Config::default();
        config.test_runner.timeout_secs = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_validate_profile_paths() {
        let mut config = Config::default();
        config.filtered_profile = config.profile.clone();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ProfilePathCollision(_))
        ));

        let mut config = Config::default();
        config.profile = PathBuf::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyPath("Raw profile"))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_hierarchical_merging() {
        let root = tempfile::tempdir().unwrap();
        write_project_file(
            root.path(),
            "config.yaml",
            "minimum: 85\nexclude: [cmd]\nlogging:\n  level: info\n  format: json\n",
        );
        write_project_file(root.path(), "local.yaml", "minimum: 70\nlogging:\n  level: debug\n");

        temp_env::with_var_unset("COVGATE_MINIMUM", || {
            let config = ConfigLoader::load_from(root.path()).unwrap();
            assert!((config.minimum - 70.0).abs() < f64::EPSILON, "local.yaml should win");
            assert_eq!(config.exclude, vec!["cmd"]);
            assert_eq!(config.logging.level, "debug", "Override should win for nested fields");
            assert_eq!(config.logging.format, "json", "Base value should persist");
        });
    }

    #[test]
    fn test_env_override() {
        let root = tempfile::tempdir().unwrap();
        write_project_file(root.path(), "config.yaml", "minimum: 85\n");

        temp_env::with_vars(
            [
                ("COVGATE_MINIMUM", Some("95.5")),
                ("COVGATE_REPORTER__KIND", Some("command")),
                ("COVGATE_LOGGING__LEVEL", Some("warn")),
            ],
            || {
                let config = ConfigLoader::load_from(root.path()).unwrap();
                assert!((config.minimum - 95.5).abs() < f64::EPSILON);
                assert_eq!(config.reporter.kind, ReporterKind::Command);
                assert_eq!(config.logging.level, "warn");
            },
        );
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        write_project_file(root.path(), "config.yaml", "minimum: 150\n");

        temp_env::with_var_unset("COVGATE_MINIMUM", || {
            let err = ConfigLoader::load_from(root.path()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ConfigError>(),
                Some(ConfigError::InvalidMinimum(_))
            ));
        });
    }

    #[test]
    fn test_load_from_file_skips_project_files() {
        let root = tempfile::tempdir().unwrap();
        write_project_file(root.path(), "config.yaml", "minimum: 10\n");
        let explicit = root.path().join("ci.yaml");
        std::fs::write(&explicit, "packages: [\"./parser/...\"]\nfiltered_profile: ci.filtered.out\n").unwrap();

        temp_env::with_var_unset("COVGATE_MINIMUM", || {
            let config = ConfigLoader::load_from_file(&explicit).unwrap();
            assert!((config.minimum - 90.0).abs() < f64::EPSILON);
            assert_eq!(config.packages, vec!["./parser/..."]);
            assert_eq!(config.filtered_profile, PathBuf::from("ci.filtered.out"));
        });
    }

    #[test]
    fn test_load_from_missing_file() {
        let root = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load_from_file(root.path().join("nope.yaml")).is_err());
    }
}
