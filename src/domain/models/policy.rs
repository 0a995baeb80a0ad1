use serde::Serialize;

use crate::domain::errors::ConfigError;

/// Source-path patterns whose coverage records do not count toward the
/// aggregate.
///
/// Matching is plain, case-sensitive substring containment; a path is
/// excluded when it contains *any* pattern. Pattern order only affects
/// reporting, never the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExclusionPolicy {
    patterns: Vec<String>,
}

impl ExclusionPolicy {
    /// Build a policy, rejecting empty patterns (they would match every path).
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if let Some(idx) = patterns.iter().position(String::is_empty) {
            return Err(ConfigError::EmptyPattern(idx));
        }
        Ok(Self { patterns })
    }

    /// A policy that excludes nothing.
    pub const fn none() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if `path` contains at least one pattern.
    pub fn excludes(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| path.contains(p.as_str()))
    }

    /// Indices of every pattern contained in `path`.
    pub fn matching<'a>(&'a self, path: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.patterns
            .iter()
            .enumerate()
            .filter(move |(_, p)| path.contains(p.as_str()))
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_is_case_sensitive() {
        let policy = ExclusionPolicy::new(["cmd"]).unwrap();
        assert!(policy.excludes("github.com/org/expr/cmd/main.go"));
        assert!(policy.excludes("pkg/cmdline.go"));
        assert!(!policy.excludes("pkg/CMD/main.go"));
    }

    #[test]
    fn any_pattern_excludes() {
        let policy = ExclusionPolicy::new(["cmd", "generate"]).unwrap();
        assert!(policy.excludes("x/checker/generate.go"));
        assert!(policy.excludes("x/cmd/a.go"));
        assert!(!policy.excludes("x/vm/vm.go"));
    }

    #[test]
    fn matching_reports_every_hit() {
        let policy = ExclusionPolicy::new(["cmd", "gen", "nope"]).unwrap();
        let hits: Vec<usize> = policy.matching("tools/cmd/gen.go").collect();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let err = ExclusionPolicy::new(["ok", ""]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPattern(1)));
    }

    #[test]
    fn none_excludes_nothing() {
        let policy = ExclusionPolicy::none();
        assert!(policy.is_empty());
        assert!(!policy.excludes("anything.go"));
    }
}
