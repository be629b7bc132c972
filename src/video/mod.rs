//! Video lookup for extracted keywords.
//!
//! The lookup sits behind the [`VideoLookup`] capability trait so the
//! scraping strategy can be swapped for an API-based one without touching
//! keyword extraction. The default implementation fetches a results page
//! and scans the raw body for the fixed-width video-identifier token.
//!
//! Lookup failures never propagate: a network or parse error is logged
//! and yields no video, because a missing video link should not sink the
//! rest of the keyword map.

use std::path::Path;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use tracing::warn;

use crate::keywords::{self, clean_keyword, KeywordResult};
use crate::models::KeywordVideoMap;

/// Default base URL of the video-search page.
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);

/// Trait for keyword-to-video lookups.
#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// Find at most one embeddable video URL for the keyword. `None` on
    /// no match or on any lookup failure.
    async fn find_video(&self, keyword: &str) -> Option<String>;
}

/// Normalize a keyword into a search-query string: strip punctuation,
/// collapse whitespace, join words with `+`.
pub fn normalize_query(keyword: &str) -> String {
    clean_keyword(keyword).replace(' ', "+")
}

/// Scan a results-page body for the first 11-character video identifier.
pub fn scan_video_id(body: &str) -> Option<String> {
    // The identifier alphabet is base64-url; the token is fixed-width.
    static PATTERN: &str = r"watch\?v=([A-Za-z0-9_-]{11})";
    let re = Regex::new(PATTERN).ok()?;
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Build the embeddable URL for a video identifier.
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

/// Results-page scraping [`VideoLookup`] implementation.
#[derive(Debug, Clone)]
pub struct ScrapedVideoSearch {
    http: reqwest::Client,
    base_url: Url,
}

impl ScrapedVideoSearch {
    /// Create a lookup against the default results page.
    pub fn new() -> Self {
        Self::with_base_url(Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"))
    }

    /// Create a lookup against a specific base URL (tests point this at a
    /// local server).
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

impl Default for ScrapedVideoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoLookup for ScrapedVideoSearch {
    async fn find_video(&self, keyword: &str) -> Option<String> {
        let query = normalize_query(keyword);
        if query.is_empty() {
            return None;
        }

        let mut url = match self.base_url.join("results") {
            Ok(url) => url,
            Err(e) => {
                warn!(keyword, error = %e, "bad video-search URL");
                return None;
            }
        };
        url.query_pairs_mut().append_pair("search_query", &query);

        let body = match self.http.get(url).timeout(REQUEST_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(keyword, error = %e, "video-search body read failed");
                    return None;
                }
            },
            Ok(response) => {
                warn!(keyword, status = %response.status(), "video-search request rejected");
                return None;
            }
            Err(e) => {
                warn!(keyword, error = %e, "video-search request failed");
                return None;
            }
        };

        scan_video_id(&body).map(|id| embed_url(&id))
    }
}

/// Extract keywords from a PDF and look up one video per keyword, in
/// keyword order.
pub async fn map_keywords_to_videos<L: VideoLookup>(
    pdf_path: &Path,
    lookup: &L,
    num_keywords: usize,
) -> KeywordResult<KeywordVideoMap> {
    let keywords = keywords::extract_keywords(pdf_path, num_keywords)?;

    let mut map = KeywordVideoMap::with_capacity(keywords.len());
    for keyword in keywords {
        let video = lookup.find_video(&keyword).await;
        map.push((keyword, video));
    }
    Ok(map)
}
