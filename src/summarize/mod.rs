//! Paper summarization via the hosted generative-language API.
//!
//! Used by the `process_pdf` endpoint: the extracted document text goes
//! to the collaborator with a fixed prompt and the plain-text summary
//! comes back. The API key is read from the `GEMINI_API_KEY` environment
//! variable, the one key this system requires.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the generative-language API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Document text beyond this many characters is not sent to the
/// collaborator; abstracts and section text fit comfortably below it.
const INPUT_BUDGET: usize = 20_000;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Errors from the summarizer.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The API-key environment variable is unset
    #[error("missing API key: set {API_KEY_ENV}")]
    MissingApiKey,

    /// The API answered with a non-success status
    #[error("generative API error: HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// Transport-level failure
    #[error("http error: {0}")]
    Http(String),

    /// The API answered success but carried no generated text
    #[error("generative API returned no text")]
    EmptyResponse,
}

/// Result type for summarizer operations.
pub type SummarizeResult<T> = Result<T, SummarizeError>;

/// Trait for text summarizers.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a concise plain-text summary of `text`.
    async fn summarize(&self, text: &str) -> SummarizeResult<String>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Generative-language API summarizer.
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSummarizer {
    /// Create a summarizer with an explicit API key.
    pub fn new(api_key: String, model: Option<String>) -> SummarizeResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SummarizeError::Http(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: API_BASE.to_string(),
        })
    }

    /// Create a summarizer from the environment.
    ///
    /// # Errors
    /// [`SummarizeError::MissingApiKey`] when `GEMINI_API_KEY` is unset.
    pub fn from_env() -> SummarizeResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| SummarizeError::MissingApiKey)?;
        Self::new(api_key, None)
    }
}

/// Truncate text to the input budget on a character boundary.
fn truncate_to_budget(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Pull the generated text out of a response body.
fn extract_text(response: GenerateResponse) -> SummarizeResult<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, text: &str) -> SummarizeResult<String> {
        let prompt = format!(
            "Summarize the following research paper concisely, at a high level, \
             for a reader with no prior knowledge of the topic:\n\n{}",
            truncate_to_budget(text, INPUT_BUDGET)
        );

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizeError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Http(e.to_string()))?;
        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_to_budget("hello", 10), "hello");
        assert_eq!(truncate_to_budget("hello", 3), "hel");
        // Multi-byte characters must not be split.
        assert_eq!(truncate_to_budget("héllo", 2), "hé");
    }

    #[test]
    fn extracts_text_from_response_body() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Part one. " }, { "text": "Part two." } ] } }
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "Part one. Part two.");
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(SummarizeError::EmptyResponse)
        ));
    }
}
