//! Cross-source merge of ranked title lists.
//!
//! Source lists arrive in fixed priority order (most authoritative first, an
//! editorial configuration choice). The first source to list a work supplies
//! its display title and position; later sources that list the same work
//! back-fill their rating into the existing entry instead of appending a
//! duplicate.

use std::collections::HashMap;

use crate::types::{MergedEntry, SourceRecords};

use super::matcher::TitleMatcher;
use super::normalize::normalize;

/// Merge per-source title lists into one deduplicated, length-bounded list.
///
/// Invariants on the output:
/// - at most `max_items` entries;
/// - normalized keys of entries are pairwise distinct under `matcher`;
/// - entry order follows first appearance in priority order.
///
/// Records with titles that normalize to the empty string are dropped. A
/// source with an empty record list simply contributes nothing; all sources
/// empty yields an empty result. Once the list is full, remaining records are
/// still scanned so lower-priority sources can back-fill ratings into entries
/// that already made the cut.
pub fn merge_sources(
    sources: &[SourceRecords],
    matcher: &dyn TitleMatcher,
    max_items: usize,
) -> Vec<MergedEntry> {
    let mut entries: Vec<MergedEntry> = Vec::new();
    // Seen keys, index-aligned with `entries`.
    let mut keys: Vec<String> = Vec::new();

    for source in sources {
        for record in &source.records {
            let key = normalize(&record.title);
            if key.is_empty() {
                continue;
            }

            if let Some(idx) = keys.iter().position(|seen| matcher.matches(seen, &key)) {
                // Same work already captured from a higher-priority source:
                // back-fill whatever this record adds. First rating per
                // source wins.
                let entry = &mut entries[idx];
                if let Some(rating) = &record.rating {
                    entry
                        .ratings
                        .entry(source.source.clone())
                        .or_insert_with(|| rating.clone());
                }
                if entry.year.is_none() {
                    entry.year = record.year;
                }
                if entry.link.is_none() {
                    entry.link = record.link.clone();
                }
                continue;
            }

            if entries.len() >= max_items {
                // List is full; keep scanning for back-fill only.
                continue;
            }

            let mut ratings = HashMap::new();
            if let Some(rating) = &record.rating {
                ratings.insert(source.source.clone(), rating.clone());
            }
            entries.push(MergedEntry {
                title: record.title.clone(),
                year: record.year,
                link: record.link.clone(),
                ratings,
            });
            keys.push(key);
        }
    }

    entries.truncate(max_items);
    entries
}
