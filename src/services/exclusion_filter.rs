//! Exclusion filter.
//!
//! Removes every record whose source path contains one of the policy's
//! patterns. The filter is a pure function of its inputs: same profile and
//! policy, same output, records kept in their original order.

use serde::Serialize;

use crate::domain::models::{CoverageProfile, ExclusionPolicy};

/// How many records a single pattern matched.
///
/// A record matching several patterns counts toward each of them, but is
/// removed only once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternHits {
    pub pattern: String,
    pub records: usize,
}

/// Output of [`filter_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// The filtered profile (same mode as the input).
    pub profile: CoverageProfile,
    /// Number of records removed.
    pub excluded: usize,
    /// Per-pattern match counts, in policy order.
    pub pattern_hits: Vec<PatternHits>,
}

impl FilterResult {
    /// Patterns that matched nothing. Not an error; patterns are advisory.
    pub fn unused_patterns(&self) -> impl Iterator<Item = &str> {
        self.pattern_hits
            .iter()
            .filter(|hit| hit.records == 0)
            .map(|hit| hit.pattern.as_str())
    }
}

/// Drop records whose path contains any pattern of `policy`.
pub fn filter_profile(profile: &CoverageProfile, policy: &ExclusionPolicy) -> FilterResult {
    let mut hits = vec![0usize; policy.patterns().len()];
    let mut records = Vec::with_capacity(profile.records.len());

    for record in &profile.records {
        let mut excluded = false;
        for idx in policy.matching(&record.path) {
            hits[idx] += 1;
            excluded = true;
        }
        if !excluded {
            records.push(record.clone());
        }
    }

    let excluded = profile.records.len() - records.len();
    let pattern_hits = policy
        .patterns()
        .iter()
        .zip(hits)
        .map(|(pattern, records)| PatternHits {
            pattern: pattern.clone(),
            records,
        })
        .collect();

    FilterResult {
        profile: CoverageProfile::new(profile.mode, records),
        excluded,
        pattern_hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CoverMode;

    const RAW: &str = "mode: set
github.com/expr-lang/expr/vm/vm.go:10.1,12.2 2 1
github.com/expr-lang/expr/cmd/exe/main.go:5.1,9.2 4 0
github.com/expr-lang/expr/checker/generate/gen.go:1.1,3.2 1 1
github.com/expr-lang/expr/parser/parser.go:7.1,8.2 3 0
";

    fn raw() -> CoverageProfile {
        CoverageProfile::parse(RAW).unwrap()
    }

    fn policy(patterns: &[&str]) -> ExclusionPolicy {
        ExclusionPolicy::new(patterns.iter().copied()).unwrap()
    }

    #[test]
    fn removes_matching_records_in_order() {
        let result = filter_profile(&raw(), &policy(&["cmd", "generate"]));

        assert_eq!(result.excluded, 2);
        assert_eq!(result.profile.mode, CoverMode::Set);
        let paths: Vec<&str> = result.profile.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "github.com/expr-lang/expr/vm/vm.go",
                "github.com/expr-lang/expr/parser/parser.go"
            ]
        );
    }

    #[test]
    fn empty_policy_is_identity() {
        let result = filter_profile(&raw(), &ExclusionPolicy::none());
        assert_eq!(result.profile, raw());
        assert_eq!(result.excluded, 0);
        assert!(result.pattern_hits.is_empty());
    }

    #[test]
    fn record_matching_many_patterns_is_removed_once() {
        let result = filter_profile(&raw(), &policy(&["cmd", "exe", "main.go"]));

        assert_eq!(result.excluded, 1);
        assert_eq!(result.profile.len(), 3);
        assert!(result.pattern_hits.iter().all(|hit| hit.records == 1));
    }

    #[test]
    fn unmatched_pattern_is_a_no_op() {
        let result = filter_profile(&raw(), &policy(&["mock", "cmd"]));

        assert_eq!(result.excluded, 1);
        assert_eq!(result.unused_patterns().collect::<Vec<_>>(), vec!["mock"]);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let p = policy(&["cmd", "generate"]);
        let once = filter_profile(&raw(), &p);
        let twice = filter_profile(&once.profile, &p);
        assert_eq!(once.profile, twice.profile);
        assert_eq!(twice.excluded, 0);
    }

    #[test]
    fn kept_records_render_byte_identical() {
        let result = filter_profile(&raw(), &policy(&["cmd", "generate"]));
        let expected: String = RAW
            .lines()
            .filter(|line| !line.contains("cmd") && !line.contains("generate"))
            .map(|line| format!("{line}\n"))
            .collect();
        assert_eq!(result.profile.render(), expected);
    }

    #[test]
    fn everything_excluded_leaves_header_only() {
        let result = filter_profile(&raw(), &policy(&["github.com"]));
        assert!(result.profile.is_empty());
        assert_eq!(result.profile.render(), "mode: set\n");
    }
}
