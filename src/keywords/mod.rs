//! Keyword extraction from paper PDFs.
//!
//! The pipeline: extract the document text, slice out the Methods,
//! Introduction, and Conclusion sections, pull multi-word candidate
//! phrases from the concatenation, clean and filter them, then rank their
//! terms by tf-idf with the phrases as pseudo-documents.
//!
//! Candidate phrases approximate noun chunks: a phrase is a maximal run
//! of tokens uninterrupted by punctuation or English stopwords. That is a
//! coarser cut than a real syntactic parse, but noun phrases in technical
//! prose overwhelmingly take exactly this shape ("deep convolutional
//! network", "gradient descent step").

pub mod sections;
pub mod tfidf;

use std::path::Path;

use thiserror::Error;

use crate::pdf::{self, PdfError};

/// Domain words that never count as candidate phrases, regardless of
/// frequency: paper scaffolding rather than content.
const CUSTOM_STOPWORDS: &[&str] = &[
    "methods",
    "introduction",
    "related",
    "work",
    "conclusion",
    "references",
    "abstract",
    "author",
    "study",
    "figure",
    "table",
    "journal",
    "doi",
    "section",
];

/// Common English function words; phrase boundaries and scoring both
/// exclude them.
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "being", "below", "between", "both", "but", "by", "can", "could",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "itself", "just", "more", "most", "my", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours",
];

pub(crate) fn is_english_stopword(word: &str) -> bool {
    ENGLISH_STOPWORDS.contains(&word)
}

/// Errors from keyword extraction.
#[derive(Debug, Error)]
pub enum KeywordError {
    /// The PDF could not be read or parsed
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Sections produced text, but no term survived cleaning and scoring
    #[error("no usable terms survived cleaning")]
    EmptyVocabulary,
}

/// Result type for keyword operations.
pub type KeywordResult<T> = Result<T, KeywordError>;

/// Collapse whitespace and strip non-word characters from a keyword.
pub fn clean_keyword(keyword: &str) -> String {
    let collapsed = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extract multi-word candidate phrases from text, lower-cased.
///
/// Tokens run until punctuation or an English stopword breaks the phrase;
/// only runs of two or more words qualify.
fn candidate_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let mut flush = |current: &mut Vec<String>| {
        if current.len() > 1 {
            phrases.push(current.join(" "));
        }
        current.clear();
    };

    for raw in text.split(|c: char| c.is_whitespace() || ".,;:!?()[]{}\"'".contains(c)) {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect::<String>()
            .to_lowercase();

        if word.is_empty() || is_english_stopword(&word) {
            flush(&mut current);
        } else {
            current.push(word);
        }
    }
    flush(&mut current);

    phrases
}

/// Clean candidate phrases and drop the ones that carry no content:
/// custom stopwords and anything shorter than 3 characters after
/// punctuation stripping.
fn cleaned_phrases(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|p| clean_keyword(&p))
        .filter(|p| p.len() > 2 && !CUSTOM_STOPWORDS.contains(&p.as_str()))
        .collect()
}

/// Extract the top keywords from already-extracted document text.
///
/// Returns `Ok(vec![])` when the section concatenation is empty (a PDF
/// with no recognizable headers is not an error) and
/// [`KeywordError::EmptyVocabulary`] when sections produced text but
/// nothing survived cleaning and scoring.
pub fn extract_keywords_from_text(text: &str, num_keywords: usize) -> KeywordResult<Vec<String>> {
    let combined = sections::keyword_sections(text);
    if combined.is_empty() {
        return Ok(Vec::new());
    }

    let phrases = cleaned_phrases(candidate_phrases(&combined));
    let keywords = tfidf::top_terms(&phrases, num_keywords);
    if keywords.is_empty() {
        return Err(KeywordError::EmptyVocabulary);
    }
    Ok(keywords)
}

/// Extract the top keywords from a paper PDF.
///
/// # Errors
/// [`KeywordError::Pdf`] when the document cannot be read,
/// [`KeywordError::EmptyVocabulary`] when no usable term survives.
pub fn extract_keywords(pdf_path: &Path, num_keywords: usize) -> KeywordResult<Vec<String>> {
    let text = pdf::extract_text(pdf_path)?;
    extract_keywords_from_text(&text, num_keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_keyword_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(clean_keyword("deep   learning!"), "deep learning");
        assert_eq!(clean_keyword("  (attention)  "), "attention");
        assert_eq!(clean_keyword("..."), "");
    }

    #[test]
    fn phrases_are_multi_word_only() {
        let phrases = candidate_phrases("We train the deep convolutional networks on images.");
        assert_eq!(phrases, vec!["deep convolutional networks"]);
        // "train" and "images" stand alone between stopwords and are dropped.
    }

    #[test]
    fn stopwords_break_phrases() {
        let phrases = candidate_phrases("gradient descent is the optimization workhorse");
        assert!(phrases.contains(&"gradient descent".to_string()));
        assert!(phrases.contains(&"optimization workhorse".to_string()));
        assert!(!phrases.iter().any(|p| p.contains(" is ")));
    }

    #[test]
    fn custom_stopword_phrases_are_dropped() {
        let cleaned = cleaned_phrases(vec![
            "related work".to_string(),
            "neural network".to_string(),
            "ab".to_string(),
        ]);
        assert_eq!(cleaned, vec!["neural network"]);
    }

    #[test]
    fn text_without_headers_yields_no_keywords_and_no_error() {
        let keywords = extract_keywords_from_text("an abstract with no headers at all", 5).unwrap();
        assert!(keywords.is_empty());
    }

    #[test]
    fn sections_with_only_noise_are_empty_vocabulary() {
        // Sections exist, but contain nothing that survives cleaning.
        let text = "Introduction\n!!! ??? ... Methods\n-- -- Results\ndone";
        match extract_keywords_from_text(text, 5) {
            Err(KeywordError::EmptyVocabulary) => {}
            other => panic!("expected EmptyVocabulary, got {other:?}"),
        }
    }

    #[test]
    fn typical_sections_produce_ranked_keywords() {
        let text = "Introduction\n\
            We study deep convolutional networks. Deep convolutional networks \
            transformed vision research.\n\
            Methods\n\
            Our deep convolutional networks use gradient descent with momentum. \
            Gradient descent converges quickly.\n\
            Results\nnumbers\n\
            Conclusion\n\
            Deep convolutional networks with gradient descent scale well.\n\
            References\n[1]";

        let keywords = extract_keywords_from_text(text, 4).unwrap();
        assert!(!keywords.is_empty());
        assert!(keywords.len() <= 4);
        assert!(keywords.contains(&"convolutional".to_string()));
    }

    #[test]
    fn missing_pdf_propagates_pdf_error() {
        let err = extract_keywords(Path::new("/nonexistent/paper.pdf"), 5).unwrap_err();
        assert!(matches!(err, KeywordError::Pdf(_)));
    }
}
