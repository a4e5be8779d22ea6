//! Pluggable equality predicates over normalized title keys.
//!
//! The merge loop asks a [`TitleMatcher`] whether a candidate key names the
//! same work as an already-seen key, so stricter or fuzzier strategies can be
//! swapped without touching the merge logic itself.

use serde::{Deserialize, Serialize};

/// Decides whether two normalized keys refer to the same work.
///
/// Both arguments are outputs of [`super::normalize`]; implementations never
/// see raw display titles.
pub trait TitleMatcher: Send + Sync {
    /// Short identifier used in logs and config.
    fn name(&self) -> &'static str;

    /// `true` when `seen` and `candidate` name the same work.
    fn matches(&self, seen: &str, candidate: &str) -> bool;
}

/// Keys must be exactly equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl TitleMatcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn matches(&self, seen: &str, candidate: &str) -> bool {
        seen == candidate
    }
}

/// Keys match when equal or when either is a substring of the other.
///
/// Catches listings like `"Dune"` vs `"Dune: Part Two"` collapsing to the
/// same franchise entry across sources; the looser of the two shipped modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl TitleMatcher for SubstringMatcher {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn matches(&self, seen: &str, candidate: &str) -> bool {
        if seen.is_empty() || candidate.is_empty() {
            return false;
        }
        seen == candidate || seen.contains(candidate) || candidate.contains(seen)
    }
}

/// Matching strategy selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// [`ExactMatcher`].
    Exact,
    /// [`SubstringMatcher`].
    #[default]
    Substring,
}

impl MatchMode {
    /// Instantiate the matcher for this mode.
    pub fn matcher(self) -> Box<dyn TitleMatcher> {
        match self {
            Self::Exact => Box::new(ExactMatcher),
            Self::Substring => Box::new(SubstringMatcher),
        }
    }
}
