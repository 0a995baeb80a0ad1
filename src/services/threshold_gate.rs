//! Threshold gate: the pass/fail decision.

use crate::domain::models::{RunOutcome, Verdict};

/// Pass iff `observed >= minimum`. The bound is inclusive and the comparison
/// uses the unrounded values; rounding happens only for display.
pub fn decide(observed: f64, minimum: f64) -> RunOutcome {
    let verdict = if observed >= minimum {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    RunOutcome {
        verdict,
        observed,
        minimum,
    }
}
