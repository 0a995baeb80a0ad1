use serde::{Deserialize, Serialize};

use crate::domain::errors::ReportingError;

/// Coverage of a single reporting unit (a function or a file, depending on
/// the reporter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCoverage {
    /// `file.go:12:` for functions, the file path for files.
    pub location: String,
    /// Function name; `None` for file-level units.
    pub name: Option<String>,
    pub percent: f64,
}

/// Covered and total statement counts after duplicate blocks are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub covered: u64,
    pub total: u64,
}

impl StatementTotals {
    /// Covered ratio in percent, or `None` when there are no statements.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(self) -> Option<f64> {
        (self.total > 0).then(|| self.covered as f64 * 100.0 / self.total as f64)
    }
}

/// Result of asking a reporter about a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Aggregate statement coverage, unrounded as far as the reporter allows.
    pub percent: f64,
    pub units: Vec<UnitCoverage>,
    /// Present when the reporter counted statements itself.
    pub statements: Option<StatementTotals>,
}

impl CoverageSummary {
    /// Build a summary, rejecting aggregates outside `[0, 100]`.
    pub fn new(
        percent: f64,
        units: Vec<UnitCoverage>,
        statements: Option<StatementTotals>,
    ) -> Result<Self, ReportingError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(ReportingError::Parse(format!(
                "aggregate coverage {percent} is outside 0..=100"
            )));
        }
        Ok(Self {
            percent,
            units,
            statements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_percent_is_unrounded() {
        let totals = StatementTotals {
            covered: 65,
            total: 80,
        };
        assert!((totals.percent().unwrap() - 81.25).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_statements_have_no_percent() {
        assert_eq!(StatementTotals::default().percent(), None);
    }

    #[test]
    fn out_of_range_aggregate_is_rejected() {
        assert!(CoverageSummary::new(100.1, vec![], None).is_err());
        assert!(CoverageSummary::new(-0.5, vec![], None).is_err());
        assert!(CoverageSummary::new(f64::NAN, vec![], None).is_err());
        assert!(CoverageSummary::new(0.0, vec![], None).is_ok());
        assert!(CoverageSummary::new(100.0, vec![], None).is_ok());
    }
}
