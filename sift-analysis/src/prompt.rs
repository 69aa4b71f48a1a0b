//! The two fixed prompt templates and the personas sent alongside them.
//!
//! Templates are parameterised only by the submitted content. Both demand
//! the exact three-section reply the parser understands and forbid
//! conversational framing; the evaluator is expected to lean on its web
//! search tool rather than answer from memory.

use crate::types::ContentKind;

/// Persona for the one-shot analysis request.
pub const ANALYST_SYSTEM_INSTRUCTION: &str = "You are a secured research assistant. Your goal is to provide a neutral, fact-based analysis of content to identify potential misinformation without making definitive judgments. Your tone should be formal, objective, and helpful.";

/// Persona for follow-up chat turns about a delivered analysis.
pub const FOLLOW_UP_SYSTEM_INSTRUCTION: &str = "You are a secured research assistant. The user has just received an analysis of a piece of content. Your role is to answer their follow-up questions about this analysis or the topic in a neutral, fact-based manner. Do not make definitive judgments. Be helpful and objective.";

/// Build the analysis prompt for the submitted content. Pure.
pub fn build_prompt(content: &str, kind: ContentKind) -> String {
    match kind {
        ContentKind::Url => format!(
            r#"Analyze the content at the following URL for credibility, safety, and potential misinformation. Assess if the source is trustworthy, authorized, and safe for users. Use the Google Search tool to investigate the website's reputation, domain age, author credibility, and to fact-check the main claims in the content. Provide your analysis in the exact format below, without any introductory or concluding remarks.

Risk Level: [Choose one: LOW, MEDIUM, HIGH, UNKNOWN]
Summary: [A brief, one-paragraph summary of your findings. Address the content's accuracy, the source's credibility, and any potential safety concerns like phishing or excessive ads.]
Detailed Analysis:
- [First specific point of analysis, e.g., "Website Reputation: The domain is well-known and generally considered reliable/unreliable..."]
- [Second specific point, e.g., "Author Credibility: The author is/is not a recognized expert in this field..."]
- [Third specific point, e.g., "Fact-Check: The central claim in the article is supported/contradicted by information from these reputable sources..."]
- [Fourth specific point, e.g., "User Experience & Safety: The site does/does not contain intrusive pop-ups, malware warnings, or signs of a phishing attempt..."]

The URL to analyze is:
"{content}""#
        ),
        ContentKind::Text => format!(
            r#"Analyze the following text for potential misinformation. Use the Google Search tool to find grounding information. Provide your analysis in the exact format below, without any introductory or concluding remarks.

Risk Level: [Choose one: LOW, MEDIUM, HIGH]
Summary: [A brief, one-paragraph summary of your findings and the main reason for your risk assessment.]
Detailed Analysis:
- [First specific point of analysis. Explain why it's a concern, e.g., "Uses emotionally charged language..."]
- [Second specific point of analysis, e.g., "Makes a factual claim without citing a credible source..."]
- [Third specific point of analysis, e.g., "The claim contradicts information from reputable news organizations..."]

The text to analyze is:
"{content}""#
        ),
    }
}
