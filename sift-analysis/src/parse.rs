//! Lenient line-based parser for the evaluator's free-text reply.
//!
//! The upstream generator is told to emit three marked sections, but it is
//! a text model and does not always comply. Parsing is therefore total:
//! every input maps to a structurally valid [`ParsedAnalysis`], and inputs
//! with no recognisable structure fall back to echoing their raw lines so
//! the user can still read the reply. Tolerance here is deliberate;
//! rejecting malformed replies would turn ordinary upstream variance into
//! spurious failures.

use crate::types::RiskLevel;

const RISK_MARKER: &str = "Risk Level:";
const SUMMARY_MARKER: &str = "Summary:";
const DETAILS_MARKER: &str = "Detailed Analysis:";

/// Shown when a reply has a recognisable structure but no `Summary:` line.
pub const UNPARSED_SUMMARY: &str = "Analysis could not be parsed correctly.";

/// Shown when a reply has no recognisable structure at all.
pub const FALLBACK_SUMMARY: &str = "The AI returned a response, but it could not be structured into a clear analysis. Please review the raw text below.";

/// Risk, summary, and bullet details extracted from one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnalysis {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub details: Vec<String>,
}

/// Parse the evaluator's reply. Total: never fails, never panics.
///
/// Markers are matched against trimmed, non-empty lines. An invalid value
/// on the `Risk Level:` line is treated as if the line were absent. The
/// summary runs from its marker to the `Detailed Analysis:` marker when
/// that appears later, otherwise to end of input. When neither a risk
/// level nor any bullet can be found the reply is considered unstructured:
/// the result carries [`FALLBACK_SUMMARY`] and every non-empty raw line,
/// verbatim and in order, as the detail list.
pub fn parse_analysis(raw: &str) -> ParsedAnalysis {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut risk_level = RiskLevel::Unknown;
    let mut summary = UNPARSED_SUMMARY.to_string();
    let mut details: Vec<String> = Vec::new();

    if let Some(line) = lines.iter().find(|line| line.starts_with(RISK_MARKER)) {
        if let Some(level) = RiskLevel::from_marker_value(&line[RISK_MARKER.len()..]) {
            risk_level = level;
        }
    }

    let summary_index = lines.iter().position(|line| line.starts_with(SUMMARY_MARKER));
    let details_index = lines.iter().position(|line| line.starts_with(DETAILS_MARKER));

    if let Some(start) = summary_index {
        let end = match details_index {
            Some(details_at) if details_at > start => details_at,
            _ => lines.len(),
        };
        summary = lines[start..end]
            .join(" ")
            .replacen(SUMMARY_MARKER, "", 1)
            .trim()
            .to_string();
    }

    if let Some(start) = details_index {
        for line in &lines[start + 1..] {
            if let Some(rest) = line.strip_prefix("- ") {
                details.push(rest.trim().to_string());
            }
        }
    }

    if risk_level == RiskLevel::Unknown && details.is_empty() {
        return ParsedAnalysis {
            risk_level: RiskLevel::Unknown,
            summary: FALLBACK_SUMMARY.to_string(),
            details: raw
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| line.to_string())
                .collect(),
        };
    }

    ParsedAnalysis {
        risk_level,
        summary,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_reply_parses_exactly() {
        let raw = "Risk Level: HIGH\nSummary: This claim is false.\nDetailed Analysis:\n- No citation provided\n- Contradicts WHO data";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.risk_level, RiskLevel::High);
        assert_eq!(parsed.summary, "This claim is false.");
        assert_eq!(
            parsed.details,
            vec!["No citation provided", "Contradicts WHO data"]
        );
    }

    #[test]
    fn risk_value_is_case_insensitive() {
        let raw = "Risk Level: medium\nDetailed Analysis:\n- point";
        assert_eq!(parse_analysis(raw).risk_level, RiskLevel::Medium);
    }

    #[test]
    fn invalid_risk_value_is_treated_as_absent() {
        let raw = "Risk Level: MAYBE\nSummary: Something.\nDetailed Analysis:\n- point one";
        let parsed = parse_analysis(raw);
        // details parsed, so no fallback; risk stays at its default
        assert_eq!(parsed.risk_level, RiskLevel::Unknown);
        assert_eq!(parsed.summary, "Something.");
        assert_eq!(parsed.details, vec!["point one"]);
    }

    #[test]
    fn unstructured_reply_falls_back_to_raw_lines() {
        let raw = "Just some unstructured text with no markers at all.";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.risk_level, RiskLevel::Unknown);
        assert_eq!(parsed.summary, FALLBACK_SUMMARY);
        assert_eq!(
            parsed.details,
            vec!["Just some unstructured text with no markers at all."]
        );
    }

    #[test]
    fn fallback_keeps_raw_lines_verbatim_and_ordered() {
        let raw = "first line\n\n  indented second  \nthird";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.summary, FALLBACK_SUMMARY);
        assert_eq!(parsed.details, vec!["first line", "  indented second  ", "third"]);
    }

    #[test]
    fn summary_without_details_marker_consumes_rest() {
        let raw = "Risk Level: LOW\nSummary: Start of summary.\nMore summary text.\nEven more.";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.risk_level, RiskLevel::Low);
        assert_eq!(
            parsed.summary,
            "Start of summary. More summary text. Even more."
        );
        assert!(parsed.details.is_empty());
    }

    #[test]
    fn details_marker_before_summary_does_not_truncate_summary() {
        // marker order inverted: summary still consumes to end of input
        let raw = "Detailed Analysis:\n- early point\nSummary: Late summary.";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.summary, "Late summary.");
        assert_eq!(parsed.details, vec!["early point"]);
    }

    #[test]
    fn non_bullet_lines_after_details_are_ignored() {
        let raw = "Risk Level: LOW\nSummary: ok\nDetailed Analysis:\nnot a bullet\n- real bullet\n* other style";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.details, vec!["real bullet"]);
    }

    #[test]
    fn explicit_unknown_with_details_is_not_fallback() {
        let raw = "Risk Level: UNKNOWN\nSummary: Could not assess.\nDetailed Analysis:\n- The page was unreachable";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.risk_level, RiskLevel::Unknown);
        assert_eq!(parsed.summary, "Could not assess.");
        assert_eq!(parsed.details, vec!["The page was unreachable"]);
    }

    #[test]
    fn parsed_risk_with_no_details_keeps_partial_result() {
        let raw = "Risk Level: HIGH\nno markers beyond this";
        let parsed = parse_analysis(raw);
        assert_eq!(parsed.risk_level, RiskLevel::High);
        assert_eq!(parsed.summary, UNPARSED_SUMMARY);
        assert!(parsed.details.is_empty());
    }

    #[test]
    fn parser_is_total_on_its_own_fallback_output() {
        let first = parse_analysis("nothing structured here");
        let again = parse_analysis(&first.details.join("\n"));
        assert_eq!(again.risk_level, RiskLevel::Unknown);
        assert_eq!(again.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn empty_input_yields_fallback_with_no_details() {
        let parsed = parse_analysis("");
        assert_eq!(parsed.risk_level, RiskLevel::Unknown);
        assert_eq!(parsed.summary, FALLBACK_SUMMARY);
        assert!(parsed.details.is_empty());
    }
}
