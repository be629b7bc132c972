//! Header-bounded section extraction.
//!
//! Papers are sliced by searching for section headers as case-insensitive
//! whole words. A section runs from just after its header to the first
//! following bound header, or to the end of the text when no bound
//! matches. A missing header yields an empty section, never an error.

use regex::RegexBuilder;

/// Extract the section introduced by `header`.
///
/// `bounds` are the headers that terminate the section. Header matching is
/// case-insensitive and anchored at word boundaries, so "Methods" will not
/// fire inside "methodology".
pub fn extract_section(text: &str, header: &str, bounds: &[&str]) -> String {
    let header_re = match RegexBuilder::new(&format!(r"\b{}\b", regex::escape(header)))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return String::new(),
    };

    let Some(m) = header_re.find(text) else {
        return String::new();
    };
    let rest = &text[m.end()..];

    if bounds.is_empty() {
        return rest.to_string();
    }

    let alternation = bounds
        .iter()
        .map(|b| regex::escape(b))
        .collect::<Vec<_>>()
        .join("|");
    let bound_re = match RegexBuilder::new(&format!(r"\b({alternation})\b"))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return rest.to_string(),
    };

    match bound_re.find(rest) {
        Some(b) => rest[..b.start()].to_string(),
        None => rest.to_string(),
    }
}

/// Concatenate the three sections keyword extraction works over:
/// Methods, Introduction, Conclusion, in that order.
pub fn keyword_sections(text: &str) -> String {
    let methods = extract_section(text, "Methods", &["Results", "Discussion", "Conclusion"]);
    let introduction =
        extract_section(text, "Introduction", &["Methods", "Discussion", "Conclusion"]);
    let conclusion = extract_section(text, "Conclusion", &["References"]);

    format!("{methods}{introduction}{conclusion}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER: &str = "Title page\n\
        Introduction\nWe introduce the problem space here.\n\
        Methods\nWe apply gradient descent on deep networks.\n\
        Results\nNumbers improved.\n\
        Discussion\nIt works.\n\
        Conclusion\nDeep networks win.\n\
        References\n[1] Prior work.";

    #[test]
    fn section_runs_until_first_bound() {
        let methods = extract_section(PAPER, "Methods", &["Results", "Discussion", "Conclusion"]);
        assert!(methods.contains("gradient descent"));
        assert!(!methods.contains("Numbers improved"));
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let text = "INTRODUCTION\nSome text.\nMETHODS\nmore";
        let intro = extract_section(text, "Introduction", &["Methods"]);
        assert!(intro.contains("Some text."));
        assert!(!intro.contains("more"));
    }

    #[test]
    fn missing_header_yields_empty_section() {
        assert_eq!(extract_section("no sections here", "Methods", &["Results"]), "");
    }

    #[test]
    fn missing_bound_runs_to_end() {
        let text = "Conclusion\nFinal words, nothing after.";
        let conclusion = extract_section(text, "Conclusion", &["References"]);
        assert!(conclusion.contains("Final words"));
    }

    #[test]
    fn keyword_sections_concatenates_in_fixed_order() {
        let combined = keyword_sections(PAPER);
        let methods_pos = combined.find("gradient descent").unwrap();
        let intro_pos = combined.find("problem space").unwrap();
        let conclusion_pos = combined.find("networks win").unwrap();
        assert!(methods_pos < intro_pos);
        assert!(intro_pos < conclusion_pos);
        assert!(!combined.contains("Prior work"));
    }

    #[test]
    fn no_recognizable_headers_yields_empty_concatenation() {
        assert_eq!(keyword_sections("just an abstract with no headers"), "");
    }
}
