use std::path::PathBuf;

use clap::Parser;
use covgate::cli::{Cli, Commands};

#[test]
fn test_parse_run_with_overrides() {
    let cli = Cli::try_parse_from([
        "covgate",
        "run",
        "--min",
        "85.5",
        "-x",
        "mock",
        "--exclude",
        "testdata",
        "--package",
        "github.com/org/proj/...",
        "--no-html",
    ])
    .unwrap();

    match cli.command {
        Commands::Run(args) => {
            let overrides = args.overrides();
            assert_eq!(overrides.minimum, Some(85.5));
            assert_eq!(overrides.exclude, vec!["mock", "testdata"]);
            assert_eq!(overrides.packages, vec!["github.com/org/proj/..."]);
            assert!(overrides.no_html);
            assert!(!overrides.no_default_excludes);
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::try_parse_from(["covgate", "run"]).unwrap();
    assert!(!cli.json);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Run(args) => {
            assert!(args.min.is_none());
            assert!(args.packages.is_empty());
            assert!(!args.units);
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "covgate",
        "check",
        "coverage.out",
        "--json",
        "--config",
        "ci/covgate.yaml",
        "--no-default-excludes",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("ci/covgate.yaml")));
    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.profile, PathBuf::from("coverage.out"));
            assert!(args.overrides().no_default_excludes);
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_parse_filter() {
    let cli =
        Cli::try_parse_from(["covgate", "filter", "coverage.out", "-o", "kept.out", "-x", "cmd"])
            .unwrap();
    match cli.command {
        Commands::Filter(args) => {
            assert_eq!(args.input, PathBuf::from("coverage.out"));
            assert_eq!(args.output, Some(PathBuf::from("kept.out")));
            assert_eq!(args.exclusions.exclude, vec!["cmd"]);
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_parse_init() {
    let cli = Cli::try_parse_from(["covgate", "init", "--force", "some/dir"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert!(args.force);
            assert_eq!(args.path, PathBuf::from("some/dir"));
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_check_requires_profile() {
    assert!(Cli::try_parse_from(["covgate", "check"]).is_err());
}

#[test]
fn test_min_must_be_numeric() {
    assert!(Cli::try_parse_from(["covgate", "run", "--min", "ninety"]).is_err());
}
