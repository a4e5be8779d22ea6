//! Stateless rendering of a snapshot for the terminal or as JSON.
//!
//! Formatting only; no inputs flow back into the aggregation from here.

use std::fmt::Write as _;

use crate::cache::Snapshot;
use crate::types::{MediaType, MergedEntry};

/// Render one snapshot as a plain-text report.
///
/// `media` limits the output to one list; `None` renders both. Empty lists
/// get a placeholder line instead of vanishing.
pub fn render_text(snapshot: &Snapshot, media: Option<MediaType>) -> String {
    let mut out = String::new();

    let sections = match media {
        Some(m) => vec![m],
        None => vec![MediaType::Movies, MediaType::Series],
    };

    for (i, media_type) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let heading = match media_type {
            MediaType::Movies => format!("Top {} Movies", snapshot.genre),
            MediaType::Series => format!("Top {} TV Series", snapshot.genre),
        };
        let _ = writeln!(out, "{heading}");
        let _ = writeln!(out, "{}", "=".repeat(heading.len()));

        let list = snapshot.lists.list(*media_type);
        if list.is_empty() {
            let placeholder = match media_type {
                MediaType::Movies => "No movies found.",
                MediaType::Series => "No series found.",
            };
            let _ = writeln!(out, "{placeholder}");
            continue;
        }

        for (rank, entry) in list.iter().enumerate() {
            render_entry(&mut out, rank + 1, entry, &snapshot.sources);
        }
    }

    let _ = writeln!(
        out,
        "\nLast updated: {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    out
}

fn render_entry(out: &mut String, rank: usize, entry: &MergedEntry, sources: &[String]) {
    match entry.year {
        Some(year) => {
            let _ = writeln!(out, "{rank:>3}. {} ({year})", entry.title);
        }
        None => {
            let _ = writeln!(out, "{rank:>3}. {}", entry.title);
        }
    }
    for source in sources {
        let _ = writeln!(out, "     {source}: {}", entry.rating_for(source));
    }
    if let Some(link) = &entry.link {
        let _ = writeln!(out, "     {link}");
    }
}

/// Render one snapshot as pretty-printed JSON.
pub fn render_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}
