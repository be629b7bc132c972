//! arXiv search client: paper lookup and temporal neighbor search.
//!
//! Wraps the export API's `query` endpoint. Two operations are exposed:
//! [`ArxivClient::find_paper`] resolves a title to exactly one normalized
//! record, and [`ArxivClient::find_neighbors`] gathers comparison sets
//! constrained by the seed paper's categories, title keywords, and a
//! publication-date window.
//!
//! Remote failures surface as [`ArxivError::Remote`] from both operations.
//! (The systems this replaces silently returned an empty neighbor set on
//! remote failure while treating the same failure as fatal for the seed
//! lookup; the policy here is uniformly hard.)

pub mod atom;

use chrono::{NaiveDate, Utc};
use reqwest::Url;
use thiserror::Error;
use tracing::debug;

use crate::models::{Direction, PaperRecord};

/// Default export API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://export.arxiv.org/api/query";

/// Default per-request timeout.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Errors from the search API client.
#[derive(Debug, Error)]
pub enum ArxivError {
    /// The API answered with a non-success status
    #[error("remote error: HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// The search yielded zero results
    #[error("paper not found")]
    NotFound,

    /// A required feed-entry field was absent or empty
    #[error("feed entry missing required field `{0}`")]
    MissingField(&'static str),

    /// The feed body could not be parsed
    #[error("feed parse error: {0}")]
    Parse(String),

    /// Transport-level failure (connect, timeout, body read)
    #[error("http error: {0}")]
    Http(String),
}

/// Result type for client operations.
pub type ArxivResult<T> = Result<T, ArxivError>;

/// Client for the bibliographic search API.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ArxivClient {
    /// Create a client against the default endpoint.
    pub fn new() -> ArxivResult<Self> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).map_err(|e| ArxivError::Http(e.to_string()))?;
        Self::with_endpoint(endpoint)
    }

    /// Create a client against a specific endpoint (tests point this at a
    /// local server).
    pub fn with_endpoint(endpoint: Url) -> ArxivResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("paperlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ArxivError::Http(e.to_string()))?;
        Ok(Self { http, endpoint })
    }

    /// Look up a single paper by title.
    ///
    /// The query is constrained to title-field match and requests at most
    /// one result.
    ///
    /// # Errors
    /// [`ArxivError::Remote`] on non-success HTTP status,
    /// [`ArxivError::NotFound`] when the result set is empty.
    pub async fn find_paper(&self, title: &str) -> ArxivResult<PaperRecord> {
        let search_query = title_query(title);
        let body = self.fetch_feed(&search_query, 1).await?;
        let entries = atom::parse_feed(&body)?;
        let entry = entries.into_iter().next().ok_or(ArxivError::NotFound)?;
        atom::normalize(entry)
    }

    /// Gather papers similar to `seed` within a temporal direction.
    ///
    /// The query ANDs a category-membership clause, a title-keyword clause
    /// (words longer than 3 characters), and an inclusive submitted-date
    /// window resolved from `direction`. Entries whose id equals the
    /// seed's are excluded from the result.
    ///
    /// # Errors
    /// [`ArxivError::Remote`] on non-success HTTP status. An empty result
    /// set is not an error here: no neighbors is a legitimate answer.
    pub async fn find_neighbors(
        &self,
        seed: &PaperRecord,
        direction: Direction,
        limit: usize,
    ) -> ArxivResult<Vec<PaperRecord>> {
        let today = Utc::now().date_naive();
        let search_query = neighbor_query(seed, direction, today);
        debug!(%direction, query = %search_query, "neighbor search");

        let body = self.fetch_feed(&search_query, limit).await?;
        neighbors_from_feed(&body, &seed.id)
    }

    /// Issue one GET against the endpoint and return the feed body.
    async fn fetch_feed(&self, search_query: &str, max_results: usize) -> ArxivResult<String> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("search_query", search_query)
            .append_pair("start", "0")
            .append_pair("max_results", &max_results.to_string());

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ArxivError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ArxivError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ArxivError::Remote {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Normalize a neighbor feed, dropping the entry whose id equals the
/// seed's: a paper is never its own neighbor, and the remote date windows
/// are inclusive at the seed date.
fn neighbors_from_feed(body: &str, seed_id: &str) -> ArxivResult<Vec<PaperRecord>> {
    let entries = atom::parse_feed(body)?;

    let mut neighbors = Vec::with_capacity(entries.len());
    for entry in entries {
        let record = atom::normalize(entry)?;
        if record.id != seed_id {
            neighbors.push(record);
        }
    }
    Ok(neighbors)
}

/// Build the title-constrained query for a seed lookup: `ti:"..."`.
///
/// Embedded double quotes would terminate the phrase early, so they are
/// dropped from the title.
pub fn title_query(title: &str) -> String {
    format!("ti:\"{}\"", title.replace('"', ""))
}

/// Build the boolean neighbor query for a seed paper and date window.
///
/// Shape: `(cat:a OR cat:b) AND (kw1 AND kw2) AND submittedDate:[from TO to]`.
/// The category clause is omitted when the seed carries no categories, and
/// the keyword clause when no title word survives the length filter.
pub fn neighbor_query(seed: &PaperRecord, direction: Direction, today: NaiveDate) -> String {
    let mut clauses = Vec::with_capacity(3);

    if !seed.categories.is_empty() {
        let cats = seed
            .categories
            .iter()
            .map(|c| format!("cat:{c}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({cats})"));
    }

    let keywords = title_keywords(&seed.title);
    if !keywords.is_empty() {
        clauses.push(format!("({})", keywords.join(" AND ")));
    }

    let (from, to) = direction.date_window(seed.published, today);
    clauses.push(format!(
        "submittedDate:[{} TO {}]",
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d")
    ));

    clauses.join(" AND ")
}

/// Title words longer than 3 characters, stripped of surrounding
/// punctuation so they stay valid bare query terms.
fn title_keywords(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.len() > 3)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::epoch_floor;

    fn seed() -> PaperRecord {
        PaperRecord {
            id: "http://arxiv.org/abs/1706.03762v7".to_string(),
            title: "Attention Is All You Need".to_string(),
            summary: "The dominant sequence transduction models.".to_string(),
            authors: vec!["Ashish Vaswani".to_string()],
            categories: vec!["cs.CL".to_string(), "cs.LG".to_string()],
            published: NaiveDate::from_ymd_opt(2017, 6, 12).unwrap(),
        }
    }

    #[test]
    fn title_query_is_phrase_constrained() {
        assert_eq!(
            title_query("Attention Is All You Need"),
            "ti:\"Attention Is All You Need\""
        );
        assert_eq!(title_query("so \"called\""), "ti:\"so called\"");
    }

    #[test]
    fn keywords_keep_only_words_longer_than_three_chars() {
        assert_eq!(
            title_keywords("Attention Is All You Need"),
            vec!["Attention", "Need"]
        );
        // Surrounding punctuation is stripped before the length check.
        assert_eq!(title_keywords("BERT: Pre-training"), vec!["BERT", "Pre-training"]);
    }

    #[test]
    fn neighbor_query_before_window_ends_at_seed_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let q = neighbor_query(&seed(), Direction::Before, today);
        assert_eq!(
            q,
            "(cat:cs.CL OR cat:cs.LG) AND (Attention AND Need) AND \
             submittedDate:[1990-01-01 TO 2017-06-12]"
        );
    }

    #[test]
    fn neighbor_query_after_window_starts_at_seed_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let q = neighbor_query(&seed(), Direction::After, today);
        assert!(q.ends_with("submittedDate:[2017-06-12 TO 2026-08-06]"));
    }

    #[test]
    fn neighbor_query_all_window_spans_epoch_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let q = neighbor_query(&seed(), Direction::All, today);
        assert!(q.contains(&format!(
            "submittedDate:[{} TO 2026-08-06]",
            epoch_floor().format("%Y-%m-%d")
        )));
    }

    #[test]
    fn neighbors_exclude_the_seed_itself() {
        let body = r#"
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You Need</title>
    <summary>The seed itself.</summary>
    <author><name>Ashish Vaswani</name></author>
    <category term="cs.CL"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1409.0473v7</id>
    <published>2014-09-01T16:33:02Z</published>
    <title>Neural Machine Translation by Jointly Learning to Align and Translate</title>
    <summary>A genuine neighbor.</summary>
    <author><name>Dzmitry Bahdanau</name></author>
    <category term="cs.CL"/>
  </entry>
</feed>
"#;
        let neighbors = neighbors_from_feed(body, "http://arxiv.org/abs/1706.03762v7").unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].id, "http://arxiv.org/abs/1409.0473v7");
    }

    #[test]
    fn neighbor_query_without_categories_drops_the_clause() {
        let mut paper = seed();
        paper.categories.clear();
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let q = neighbor_query(&paper, Direction::All, today);
        assert!(q.starts_with("(Attention AND Need) AND submittedDate:"));
    }
}
