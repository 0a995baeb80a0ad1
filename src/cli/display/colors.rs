//! Verdict and percentage coloring for CLI output.
//!
//! `console` drops styling automatically when the stream is not a terminal
//! or `NO_COLOR`/`CLICOLOR=0` is set.

use console::{StyledObject, style};

use crate::domain::models::Verdict;

/// Green for PASS, red for FAIL.
pub fn colorize_verdict(verdict: Verdict) -> StyledObject<&'static str> {
    match verdict {
        Verdict::Pass => style(verdict.as_str()).green().bold(),
        Verdict::Fail => style(verdict.as_str()).red().bold(),
    }
}

/// Color a rendered percentage relative to the minimum.
///
/// Green at or above the minimum, yellow within ten points below it, red
/// further down.
pub fn colorize_percent(text: String, percent: f64, minimum: f64) -> StyledObject<String> {
    if percent >= minimum {
        style(text).green()
    } else if percent >= minimum - 10.0 {
        style(text).yellow()
    } else {
        style(text).red()
    }
}

/// Styled label for summary lines (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", style(name).bold(), style(":").dim())
}
