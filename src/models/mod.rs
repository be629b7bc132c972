//! Core data models for the paper research assistant.
//!
//! This module contains the fundamental data structures used across the
//! application: normalized paper metadata, the temporal direction of a
//! neighbor search, and the entries pushed into vector-store collections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Earliest submission date considered by a temporal neighbor search.
///
/// The remote `submittedDate` filter requires a concrete lower bound.
pub fn epoch_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid epoch floor date")
}

/// Normalized metadata for a single paper.
///
/// Built from one Atom feed entry by the metadata normalizer; immutable
/// after creation. The `published` timestamp is reduced to its date
/// component, which is the granularity every downstream consumer (date
/// windows, index metadata) operates at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Collaborator-assigned identifier URI (e.g. `http://arxiv.org/abs/1706.03762v7`)
    pub id: String,

    /// Paper title, whitespace-normalized
    pub title: String,

    /// Abstract text, whitespace-normalized
    pub summary: String,

    /// Author names in feed order
    pub authors: Vec<String>,

    /// Taxonomy category codes (e.g. `cs.CL`), in feed order
    pub categories: Vec<String>,

    /// Publication date (date component of the feed's `published` timestamp)
    pub published: NaiveDate,
}

impl PaperRecord {
    /// The text used to probe a collection for papers similar to this one:
    /// title and summary joined by a single space.
    pub fn probe_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

/// Temporal direction of a neighbor search relative to a seed paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Papers published up to the seed's publication date
    Before,
    /// Papers published from the seed's publication date onward
    After,
    /// No temporal constraint beyond the epoch floor and today
    All,
}

impl Direction {
    /// Resolve this direction into an inclusive `[from, to]` date window.
    ///
    /// `Before` spans from the epoch floor to the seed date, `After` from
    /// the seed date to `today`, and `All` the full range. The seed date
    /// itself lies inside both the `Before` and `After` windows; keeping
    /// the seed paper out of its own neighbor sets is done by id, not by
    /// date.
    pub fn date_window(self, seed: NaiveDate, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Direction::Before => (epoch_floor(), seed),
            Direction::After => (seed, today),
            Direction::All => (epoch_floor(), today),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Before => write!(f, "before"),
            Direction::After => write!(f, "after"),
            Direction::All => write!(f, "all"),
        }
    }
}

/// Metadata stored alongside each document in a collection.
///
/// A flat, serializable subset of [`PaperRecord`]: authors are joined into
/// one comma-separated string and the publication date is kept as
/// `YYYY-MM-DD` text, which is what result tables print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub id: String,
    pub title: String,
    /// Author names joined by `", "`
    pub authors: String,
    /// Publication date as `YYYY-MM-DD`
    pub published: String,
}

/// The unit pushed into a vector-store collection, one-to-one with a
/// [`PaperRecord`]. Ids must be unique within a collection; the store
/// treats a repeated id as an overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique id within a collection (the paper's id URI)
    pub id: String,

    /// Document text that gets embedded: `title: summary`
    pub document: String,

    /// Flat metadata returned verbatim by queries
    pub metadata: EntryMetadata,
}

impl From<&PaperRecord> for IndexEntry {
    fn from(paper: &PaperRecord) -> Self {
        Self {
            id: paper.id.clone(),
            document: format!("{}: {}", paper.title, paper.summary),
            metadata: EntryMetadata {
                id: paper.id.clone(),
                title: paper.title.clone(),
                authors: paper.authors.join(", "),
                published: paper.published.format("%Y-%m-%d").to_string(),
            },
        }
    }
}

/// Ordered mapping from an extracted keyword to the video found for it
/// (`None` when the lookup came up empty).
pub type KeywordVideoMap = Vec<(String, Option<String>)>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PaperRecord {
        PaperRecord {
            id: "http://arxiv.org/abs/1706.03762v7".to_string(),
            title: "Attention Is All You Need".to_string(),
            summary: "The dominant sequence transduction models.".to_string(),
            authors: vec!["Ashish Vaswani".to_string(), "Noam Shazeer".to_string()],
            categories: vec!["cs.CL".to_string(), "cs.LG".to_string()],
            published: NaiveDate::from_ymd_opt(2017, 6, 12).unwrap(),
        }
    }

    #[test]
    fn index_entry_derivation() {
        let entry = IndexEntry::from(&record());
        assert_eq!(entry.id, "http://arxiv.org/abs/1706.03762v7");
        assert_eq!(
            entry.document,
            "Attention Is All You Need: The dominant sequence transduction models."
        );
        assert_eq!(entry.metadata.authors, "Ashish Vaswani, Noam Shazeer");
        assert_eq!(entry.metadata.published, "2017-06-12");
    }

    #[test]
    fn date_windows_per_direction() {
        let seed = NaiveDate::from_ymd_opt(2017, 6, 12).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        assert_eq!(
            Direction::Before.date_window(seed, today),
            (epoch_floor(), seed)
        );
        assert_eq!(Direction::After.date_window(seed, today), (seed, today));
        assert_eq!(
            Direction::All.date_window(seed, today),
            (epoch_floor(), today)
        );
    }

    #[test]
    fn probe_text_joins_title_and_summary() {
        assert_eq!(
            record().probe_text(),
            "Attention Is All You Need The dominant sequence transduction models."
        );
    }
}
