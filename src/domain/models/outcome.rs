use std::fmt;

use serde::{Deserialize, Serialize};

/// Digits shown by default when printing percentages.
const BASE_PRECISION: usize = 2;
/// Upper bound when widening precision to separate two close values.
const MAX_PRECISION: usize = 6;

/// Pass/fail decision of the threshold gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal value of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub verdict: Verdict,
    /// Aggregate coverage, unrounded.
    pub observed: f64,
    /// Configured minimum.
    pub minimum: f64,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Observed and minimum rendered at a common precision that keeps
    /// distinct values visibly distinct (89.96 never prints as 90.00).
    ///
    /// Values too close to separate within [`MAX_PRECISION`] digits get a
    /// `<` or `>` prefix on the observed side.
    pub fn display_percentages(&self) -> (String, String) {
        let mut precision = BASE_PRECISION;
        loop {
            let observed = format!("{:.*}", precision, self.observed);
            let minimum = format!("{:.*}", precision, self.minimum);
            if observed != minimum || self.observed.total_cmp(&self.minimum).is_eq() {
                return (observed, minimum);
            }
            if precision >= MAX_PRECISION {
                let marker = if self.observed < self.minimum { '<' } else { '>' };
                return (format!("{marker}{observed}"), minimum);
            }
            precision += 1;
        }
    }

    /// `coverage 81.25% (minimum 90.00%): FAIL`
    pub fn status_line(&self) -> String {
        let (observed, minimum) = self.display_percentages();
        format!("coverage {observed}% (minimum {minimum}%): {}", self.verdict)
    }
}
