//! Atom feed parsing and entry normalization.
//!
//! The search API returns namespaced Atom XML; we use quick-xml's event
//! reader because regex parsing is brittle against namespace prefixes and
//! attribute ordering. Parsing produces raw entries; [`normalize`] turns a
//! raw entry into a [`PaperRecord`] and is total: every required field is
//! either present or the conversion fails with a missing-field error.

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ArxivError, ArxivResult};
use crate::models::PaperRecord;

/// One `<entry>` as it appears on the wire, before validation.
#[derive(Debug, Default, Clone)]
pub struct RawEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
}

/// Collapse runs of whitespace into single spaces and trim.
fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn category_term(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"term" {
            let term = attr.unescape_value().map(|v| v.to_string()).ok()?;
            if !term.trim().is_empty() {
                return Some(term);
            }
        }
    }
    None
}

/// Parse an Atom feed body into raw entries, in document order.
///
/// Feed-level elements (the feed's own `title`, opensearch counters) are
/// skipped; only content inside `<entry>` elements is collected. A
/// low-level XML error aborts with [`ArxivError::Parse`].
pub fn parse_feed(body: &str) -> ArxivResult<Vec<RawEntry>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut cur = RawEntry::default();
    let mut in_entry = false;
    let mut in_author = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name.ends_with("entry") {
                    cur = RawEntry::default();
                    in_entry = true;
                }
                if in_entry {
                    if name.ends_with("author") {
                        in_author = true;
                    }
                    // `primary_category` also ends with `category`; only the
                    // plain element carries the membership taxonomy.
                    if name.ends_with("category") && !name.ends_with("primary_category") {
                        if let Some(term) = category_term(&e) {
                            cur.categories.push(term);
                        }
                    }
                    text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if in_entry && name.ends_with("category") && !name.ends_with("primary_category") {
                    if let Some(term) = category_term(&e) {
                        cur.categories.push(term);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if in_entry {
                    let chunk = t.unescape().map(|v| v.to_string()).unwrap_or_default();
                    text.push_str(&chunk);
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if in_entry {
                    let value = normalize_ws(&text);
                    if name.ends_with("id") {
                        cur.id = Some(value);
                    } else if name.ends_with("title") {
                        cur.title = Some(value);
                    } else if name.ends_with("summary") {
                        cur.summary = Some(value);
                    } else if name.ends_with("published") {
                        cur.published = Some(value);
                    } else if in_author && name.ends_with("name") && !value.is_empty() {
                        cur.authors.push(value);
                    }
                    text.clear();

                    if name.ends_with("author") {
                        in_author = false;
                    }
                    if name.ends_with("entry") {
                        in_entry = false;
                        entries.push(std::mem::take(&mut cur));
                    }
                }
            }
            Err(e) => return Err(ArxivError::Parse(e.to_string())),
            _ => {}
        }
    }

    Ok(entries)
}

/// Validate a raw entry into a [`PaperRecord`].
///
/// # Errors
/// Returns [`ArxivError::MissingField`] when `id`, `title`, `summary`, or
/// `published` is absent or empty, and [`ArxivError::Parse`] when the
/// published timestamp has no leading `YYYY-MM-DD` date.
pub fn normalize(entry: RawEntry) -> ArxivResult<PaperRecord> {
    fn required(value: Option<String>, field: &'static str) -> ArxivResult<String> {
        match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ArxivError::MissingField(field)),
        }
    }

    let id = required(entry.id, "id")?;
    let title = required(entry.title, "title")?;
    let summary = required(entry.summary, "summary")?;
    let published_raw = required(entry.published, "published")?;
    let published = parse_published(&published_raw)?;

    Ok(PaperRecord {
        id,
        title,
        summary,
        authors: entry.authors,
        categories: entry.categories,
        published,
    })
}

/// Extract the date component of an RFC3339-ish timestamp
/// (`2017-06-12T17:57:34Z` → 2017-06-12).
fn parse_published(raw: &str) -> ArxivResult<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| ArxivError::Parse(format!("bad published timestamp {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>ArXiv Query Results</title>
  <opensearch:totalResults>2</opensearch:totalResults>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title> Attention Is
      All You Need </title>
    <summary>  The dominant sequence
      transduction models.  </summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.CL"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1409.0473v7</id>
    <published>2014-09-01T16:33:02Z</published>
    <title>Neural Machine Translation by Jointly Learning to Align and Translate</title>
    <summary>Abstract two.</summary>
    <author><name>Dzmitry Bahdanau</name></author>
    <category term="cs.CL"/>
  </entry>
</feed>
"#;

    #[test]
    fn parses_entries_with_counts_matching_subelements() {
        let entries = parse_feed(FEED).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.authors.len(), 2);
        assert_eq!(first.categories, vec!["cs.CL", "cs.LG"]);
        assert_eq!(first.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(
            first.summary.as_deref(),
            Some("The dominant sequence transduction models.")
        );

        let second = &entries[1];
        assert_eq!(second.authors.len(), 1);
        assert_eq!(second.categories.len(), 1);
    }

    #[test]
    fn primary_category_is_not_a_membership_category() {
        let entries = parse_feed(FEED).unwrap();
        // The first entry lists cs.CL once as a category and once as the
        // primary_category; only the former counts.
        assert_eq!(entries[0].categories.iter().filter(|c| *c == "cs.CL").count(), 1);
    }

    #[test]
    fn normalize_is_total_over_valid_entries() {
        let entries = parse_feed(FEED).unwrap();
        for entry in entries {
            let record = normalize(entry).unwrap();
            assert!(!record.id.is_empty());
            assert!(!record.title.is_empty());
        }
    }

    #[test]
    fn normalize_rejects_missing_fields() {
        let entry = RawEntry {
            id: Some("http://arxiv.org/abs/1706.03762v7".to_string()),
            title: Some("A Title".to_string()),
            summary: None,
            published: Some("2017-06-12T17:57:34Z".to_string()),
            authors: vec![],
            categories: vec![],
        };
        match normalize(entry) {
            Err(ArxivError::MissingField(field)) => assert_eq!(field, "summary"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn normalize_reduces_published_to_date() {
        let entries = parse_feed(FEED).unwrap();
        let record = normalize(entries[0].clone()).unwrap();
        assert_eq!(record.published.to_string(), "2017-06-12");
    }

    #[test]
    fn empty_feed_yields_no_entries() {
        let entries =
            parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#)
                .unwrap();
        assert!(entries.is_empty());
    }
}
