//! Multi-source title aggregation: the merge/dedup core of marquee.
//!
//! Fetchers hand this module per-source title lists in a fixed priority
//! order; it produces one deduplicated, length-bounded list per media type.
//!
//! # Module layout
//!
//! - [`normalize`] -- Title canonicalization into dedup keys.
//! - [`matcher`] -- Pluggable same-work predicates over those keys.
//! - [`merge`] -- The merge loop itself.

pub mod matcher;
pub mod merge;
pub mod normalize;

pub use matcher::{ExactMatcher, MatchMode, SubstringMatcher, TitleMatcher};
pub use merge::merge_sources;
pub use normalize::normalize;
