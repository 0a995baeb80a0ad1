//! Common test utilities for integration tests
//!
//! Provides shared fixtures for building coverage profiles and pipelines
//! rooted in a temporary directory.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use covgate::adapters::{MockReporter, MockRun, MockTestRunner};
use covgate::{Config, Pipeline};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// One profile block: source path, statement count, hit count.
pub type Block<'a> = (&'a str, u64, u64);

/// Render a `mode: set` profile; each block gets its own line range.
pub fn profile_text(blocks: &[Block<'_>]) -> String {
    let mut text = String::from("mode: set\n");
    for (idx, (path, statements, count)) in blocks.iter().enumerate() {
        let line = idx * 10 + 1;
        text.push_str(&format!(
            "{path}:{line}.2,{}.3 {statements} {count}\n",
            line + 5
        ));
    }
    text
}

/// `n` blocks of `statements` each, all in `path`, the first `covered` hit.
pub fn blocks<'a>(path: &'a str, n: usize, statements: u64, covered: usize) -> Vec<Block<'a>> {
    (0..n)
        .map(|i| (path, statements, u64::from(i < covered)))
        .collect()
}

/// Config whose artifacts all live under `dir`.
pub fn config_in(dir: &Path, minimum: f64, exclude: &[&str]) -> Config {
    Config {
        minimum,
        exclude: exclude.iter().map(ToString::to_string).collect(),
        profile: dir.join("coverage.out"),
        filtered_profile: dir.join("coverage.filtered.out"),
        html_report: Some(dir.join("coverage.html")),
        ..Config::default()
    }
}

/// Pipeline over mock collaborators, returning them for inspection.
pub fn mock_pipeline(
    config: Config,
    run: MockRun,
    reporter: MockReporter,
) -> (Pipeline, Arc<MockTestRunner>, Arc<MockReporter>) {
    let runner = Arc::new(MockTestRunner::new(run));
    let reporter = Arc::new(reporter);
    let pipeline = Pipeline::new(config, runner.clone(), reporter.clone())
        .expect("test config should be valid");
    (pipeline, runner, reporter)
}
