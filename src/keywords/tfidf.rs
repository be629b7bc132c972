//! Term-frequency-inverse-document-frequency scoring over candidate
//! phrases.
//!
//! The cleaned phrase list is treated as a corpus of pseudo-documents:
//! each phrase contributes its unigram terms, term weights accumulate
//! tf-idf across the corpus, and the top terms by aggregate weight become
//! the keywords. Smoothed idf keeps terms that occur in every phrase from
//! zeroing out.

use std::collections::HashMap;

use super::is_english_stopword;

/// Tokenize one pseudo-document into scoring terms: lowercase alphanumeric
/// runs, at least two characters, minus English stopwords.
fn terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1 && !is_english_stopword(t))
        .map(str::to_string)
        .collect()
}

/// Rank all terms across the pseudo-documents and return the top
/// `num_terms` by aggregate tf-idf weight, best first. Ties break
/// lexicographically so the ranking is deterministic.
///
/// Returns an empty vector when no term survives tokenization; the caller
/// decides whether that is an error.
pub fn top_terms(documents: &[String], num_terms: usize) -> Vec<String> {
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| terms(d)).collect();

    let n_docs = tokenized.iter().filter(|t| !t.is_empty()).count();
    if n_docs == 0 {
        return Vec::new();
    }

    // Document frequency per term.
    let mut df: HashMap<&str, usize> = HashMap::new();
    for doc in &tokenized {
        let mut seen: Vec<&str> = Vec::new();
        for term in doc {
            if !seen.contains(&term.as_str()) {
                seen.push(term.as_str());
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
    }

    // Aggregate tf-idf with smoothed idf: ln((1 + n) / (1 + df)) + 1.
    let mut weights: HashMap<&str, f64> = HashMap::new();
    for doc in &tokenized {
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for term in doc {
            *tf.entry(term.as_str()).or_insert(0) += 1;
        }
        for (term, count) in tf {
            let d = df[term] as f64;
            let idf = ((1.0 + n_docs as f64) / (1.0 + d)).ln() + 1.0;
            *weights.entry(term).or_insert(0.0) += count as f64 * idf;
        }
    }

    let mut ranked: Vec<(&str, f64)> = weights.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    ranked.truncate(num_terms);

    ranked.into_iter().map(|(term, _)| term.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn frequent_terms_outrank_rare_ones() {
        let corpus = docs(&[
            "gradient descent",
            "gradient descent optimization",
            "gradient updates",
            "learning rate",
        ]);
        let top = top_terms(&corpus, 2);
        assert_eq!(top[0], "gradient");
    }

    #[test]
    fn returns_at_most_num_terms() {
        let corpus = docs(&["alpha beta", "gamma delta", "epsilon zeta"]);
        assert_eq!(top_terms(&corpus, 3).len(), 3);
        assert!(top_terms(&corpus, 100).len() >= 6);
    }

    #[test]
    fn english_stopwords_never_become_keywords() {
        let corpus = docs(&["the model of the data", "the model"]);
        let top = top_terms(&corpus, 10);
        assert!(top.contains(&"model".to_string()));
        assert!(!top.contains(&"the".to_string()));
        assert!(!top.contains(&"of".to_string()));
    }

    #[test]
    fn empty_corpus_yields_no_terms() {
        assert!(top_terms(&[], 5).is_empty());
        assert!(top_terms(&docs(&["the of a", ""]), 5).is_empty());
    }

    #[test]
    fn ranking_is_deterministic_under_ties() {
        let corpus = docs(&["alpha beta", "alpha beta"]);
        assert_eq!(top_terms(&corpus, 2), vec!["alpha", "beta"]);
    }

    #[test]
    fn single_character_tokens_are_dropped() {
        let corpus = docs(&["a b convolution c", "convolution kernels"]);
        let top = top_terms(&corpus, 5);
        assert!(top.contains(&"convolution".to_string()));
        assert!(!top.contains(&"b".to_string()));
    }
}
