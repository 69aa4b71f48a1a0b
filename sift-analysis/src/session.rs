//! Follow-up chat session seeded with a delivered analysis.

use crate::prompt::FOLLOW_UP_SYSTEM_INSTRUCTION;
use crate::types::AnalysisResult;
use async_stream::try_stream;
use futures::{Stream, StreamExt};
use sift_common::{Result, SiftError};
use sift_llm::traits::{ChatTurn, LlmClient};
use std::sync::Arc;

/// A multi-turn conversation about one analysis.
///
/// The session owns the turn history. It starts with two synthetic turns,
/// the original content restated as a user turn and the structured verdict
/// restated as a model turn, so follow-up questions have context without
/// the caller resending the analysis. One session exists per analysis and
/// is dropped, never reused, when a new analysis starts.
pub struct ChatSession {
    client: Arc<dyn LlmClient + Send + Sync>,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn from_analysis(
        client: Arc<dyn LlmClient + Send + Sync>,
        analysis: &AnalysisResult,
    ) -> Self {
        let user_seed = format!(
            "Here is the {} I analyzed:\n\n{}",
            analysis.original_kind, analysis.original_content
        );
        let model_seed = format!(
            "Understood. I have analyzed the content and provided the following assessment:\n\nRisk Level: {}\nSummary: {}\nDetails:\n- {}\n\nI am ready to answer your follow-up questions.",
            analysis.risk_level,
            analysis.summary,
            analysis.details.join("\n- ")
        );

        Self {
            client,
            history: vec![ChatTurn::user(user_seed), ChatTurn::model(model_seed)],
        }
    }

    /// Full turn history, seed turns included.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Send one user message and stream the reply as text deltas.
    ///
    /// The user turn is recorded immediately; the model turn is recorded
    /// only once the stream drains, as the concatenation of every delta in
    /// arrival order. A transport failure ends the stream with an `Err`
    /// item and records no model turn; the user turn is kept.
    pub fn send_message(
        &mut self,
        text: impl Into<String>,
    ) -> impl Stream<Item = Result<String>> + '_ {
        let text = text.into();
        try_stream! {
            self.history.push(ChatTurn::user(text));

            let mut deltas = self
                .client
                .stream_chat(&self.history, FOLLOW_UP_SYSTEM_INSTRUCTION)
                .await
                .map_err(|e| SiftError::Chat(e.to_string()))?;

            let mut reply = String::new();
            while let Some(delta) = deltas.next().await {
                let delta = delta.map_err(|e| SiftError::Chat(e.to_string()))?;
                reply.push_str(&delta);
                yield delta;
            }

            self.history.push(ChatTurn::model(reply));
        }
    }
}
