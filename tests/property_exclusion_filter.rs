//! Property tests for the exclusion filter.

use covgate::domain::models::{CoverMode, CoverageProfile, CoverageRecord, Position};
use covgate::services::filter_profile;
use covgate::ExclusionPolicy;
use proptest::prelude::*;

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["vm", "cmd", "parser", "generate", "checker", "ast", "x"]),
        1..4,
    )
    .prop_map(|parts| format!("github.com/org/proj/{}.go", parts.join("/")))
}

fn record_strategy() -> impl Strategy<Value = CoverageRecord> {
    (path_strategy(), 1u32..500, 0u64..20, 0u64..3).prop_map(|(path, line, statements, count)| {
        CoverageRecord::new(
            path,
            Position::new(line, 1),
            Position::new(line + 2, 5),
            statements,
            count,
        )
    })
}

fn profile_strategy() -> impl Strategy<Value = CoverageProfile> {
    prop::collection::vec(record_strategy(), 0..40)
        .prop_map(|records| CoverageProfile::new(CoverMode::Set, records))
}

fn policy_strategy() -> impl Strategy<Value = ExclusionPolicy> {
    prop::collection::vec(
        prop::sample::select(vec!["cmd", "generate", "vm/", "ast", "nothing-matches"]),
        0..4,
    )
    .prop_map(|patterns| ExclusionPolicy::new(patterns).unwrap())
}

proptest! {
    #[test]
    fn filter_is_idempotent(profile in profile_strategy(), policy in policy_strategy()) {
        let once = filter_profile(&profile, &policy);
        let twice = filter_profile(&once.profile, &policy);
        prop_assert_eq!(&once.profile, &twice.profile);
        prop_assert_eq!(twice.excluded, 0);
    }

    #[test]
    fn empty_policy_is_identity(profile in profile_strategy()) {
        let result = filter_profile(&profile, &ExclusionPolicy::none());
        prop_assert_eq!(result.profile, profile);
    }

    #[test]
    fn kept_records_match_no_pattern(profile in profile_strategy(), policy in policy_strategy()) {
        let result = filter_profile(&profile, &policy);
        for record in &result.profile.records {
            for pattern in policy.patterns() {
                prop_assert!(!record.path.contains(pattern.as_str()));
            }
        }
    }

    #[test]
    fn every_record_is_kept_or_excluded(profile in profile_strategy(), policy in policy_strategy()) {
        let result = filter_profile(&profile, &policy);
        let mut kept = result.profile.records.iter();
        let mut next_kept = kept.next();
        for record in &profile.records {
            if next_kept == Some(record) {
                next_kept = kept.next();
            } else {
                prop_assert!(policy.excludes(&record.path));
            }
        }
        prop_assert!(next_kept.is_none(), "kept records are an ordered subsequence");
        prop_assert_eq!(result.excluded + result.profile.len(), profile.len());
        prop_assert_eq!(result.profile.mode, profile.mode);
    }
}
