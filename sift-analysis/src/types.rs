use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Coarse categorical verdict on misinformation likelihood.
///
/// `Unknown` doubles as the parser default when a reply carries no usable
/// risk marker, and as a legitimate answer for URL analyses the evaluator
/// could not assess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    /// Parse the value text of a `Risk Level:` line, case-insensitively.
    /// Anything outside the enumeration is `None`; callers keep their
    /// default rather than erroring.
    pub fn from_marker_value(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of content the user submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Url,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "URL",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A web reference the evaluator consulted, deduplicated by `uri`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// The structured outcome of one analysis run.
///
/// `original_content` and `original_kind` always echo the triggering
/// submission; the follow-up chat session is seeded from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub details: Vec<String>,
    pub sources: Vec<GroundingSource>,
    pub original_content: String,
    pub original_kind: ContentKind,
}
