//! One-shot analysis pipeline: prompt, grounded generation, parse,
//! source dedupe, assemble.

use crate::parse::parse_analysis;
use crate::prompt::{build_prompt, ANALYST_SYSTEM_INSTRUCTION};
use crate::sources::dedupe_sources;
use crate::types::{AnalysisResult, ContentKind};
use sift_common::{Result, SiftError};
use sift_llm::traits::LlmClient;
use uuid::Uuid;

/// Analyze one piece of content.
///
/// Issues a single grounded generation request; there is no retry and no
/// state kept between calls. The provider failure, whatever its cause, is
/// logged here and surfaced as one generic analysis failure so the UI can
/// show a retry banner without leaking transport detail.
pub async fn analyze(
    client: &dyn LlmClient,
    content: &str,
    kind: ContentKind,
) -> Result<AnalysisResult> {
    let id = Uuid::new_v4();
    let prompt = build_prompt(content, kind);

    tracing::debug!(analysis_id = %id, %kind, content_len = content.len(), "analysis.start");

    let reply = client
        .generate_grounded(&prompt, ANALYST_SYSTEM_INSTRUCTION)
        .await
        .map_err(|e| {
            tracing::error!(analysis_id = %id, error = %e, "analysis.request_failed");
            SiftError::Analysis("failed to get analysis from the AI model".to_string())
        })?;

    let parsed = parse_analysis(&reply.text);
    let sources = dedupe_sources(&reply.citations);

    tracing::info!(
        analysis_id = %id,
        risk = %parsed.risk_level,
        details = parsed.details.len(),
        sources = sources.len(),
        tokens = reply.tokens_used,
        "analysis.complete"
    );

    Ok(AnalysisResult {
        id,
        risk_level: parsed.risk_level,
        summary: parsed.summary,
        details: parsed.details,
        sources,
        original_content: content.to_string(),
        original_kind: kind,
    })
}
