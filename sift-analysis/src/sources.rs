//! Post-processing of the raw grounding citations into display sources.

use crate::types::GroundingSource;
use sift_llm::traits::WebCitation;
use std::collections::HashSet;

/// Title used when the provider attaches a citation without one.
pub const UNKNOWN_SOURCE_TITLE: &str = "Unknown Source";

/// Map raw citations to [`GroundingSource`]s: entries without a `uri` are
/// dropped, duplicates collapse onto the first occurrence (first-seen
/// title wins), and first-appearance order is preserved.
pub fn dedupe_sources(citations: &[WebCitation]) -> Vec<GroundingSource> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();

    for citation in citations {
        let uri = match citation.uri.as_deref() {
            Some(uri) if !uri.is_empty() => uri,
            _ => continue,
        };
        if !seen.insert(uri) {
            continue;
        }
        let title = citation
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(UNKNOWN_SOURCE_TITLE);
        sources.push(GroundingSource {
            uri: uri.to_string(),
            title: title.to_string(),
        });
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(uri: Option<&str>, title: Option<&str>) -> WebCitation {
        WebCitation {
            uri: uri.map(str::to_string),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn first_occurrence_wins_and_order_is_preserved() {
        let citations = vec![
            citation(Some("a"), Some("A1")),
            citation(Some("b"), Some("B")),
            citation(Some("a"), Some("A2")),
        ];
        let sources = dedupe_sources(&citations);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].uri, "a");
        assert_eq!(sources[0].title, "A1");
        assert_eq!(sources[1].uri, "b");
        assert_eq!(sources[1].title, "B");
    }

    #[test]
    fn entries_without_uri_are_dropped() {
        let citations = vec![
            citation(None, Some("no uri")),
            citation(Some(""), Some("empty uri")),
            citation(Some("kept"), None),
        ];
        let sources = dedupe_sources(&citations);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].uri, "kept");
    }

    #[test]
    fn missing_or_empty_titles_get_placeholder() {
        let citations = vec![citation(Some("x"), None), citation(Some("y"), Some(""))];
        let sources = dedupe_sources(&citations);
        assert_eq!(sources[0].title, UNKNOWN_SOURCE_TITLE);
        assert_eq!(sources[1].title, UNKNOWN_SOURCE_TITLE);
    }
}
