//! Application state controller for one user session.
//!
//! All displayed state lives here rather than in ambient globals: the
//! analysis phase, the active chat session, and the visible transcript.
//! The result/session pair is replaced wholesale on each new analysis,
//! never mutated in place, and at most one analysis is in flight.

use crate::orchestrate::analyze;
use crate::session::ChatSession;
use crate::transcript::Transcript;
use crate::types::{AnalysisResult, ContentKind};
use futures::StreamExt;
use sift_common::{Result, SiftError};
use sift_llm::traits::LlmClient;
use std::sync::Arc;

/// Phase of the analyze flow.
#[derive(Debug, Clone)]
pub enum AnalysisPhase {
    Idle,
    Analyzing,
    Ready(AnalysisResult),
    /// Carries the user-facing banner; the cause was already logged.
    Failed(String),
}

/// How a chat turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    /// The reply failed in transit; the transcript now ends with the
    /// fixed apology instead of a model answer.
    Degraded,
}

/// Owns the active result/session pair and drives both data flows.
pub struct Workbench {
    client: Arc<dyn LlmClient + Send + Sync>,
    phase: AnalysisPhase,
    session: Option<ChatSession>,
    transcript: Transcript,
}

impl Workbench {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self {
            client,
            phase: AnalysisPhase::Idle,
            session: None,
            transcript: Transcript::new(),
        }
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Submit content for analysis.
    ///
    /// Rejects blank input and overlapping submissions. On success the
    /// previous result, session, and transcript are all replaced; on
    /// failure the phase carries a generic retry banner and no result is
    /// shown.
    pub async fn submit(&mut self, content: &str, kind: ContentKind) -> Result<AnalysisResult> {
        if matches!(self.phase, AnalysisPhase::Analyzing) {
            return Err(SiftError::Analysis(
                "an analysis is already in progress".to_string(),
            ));
        }
        if content.trim().is_empty() {
            return Err(SiftError::Analysis(format!(
                "please enter a {kind} to analyze"
            )));
        }

        self.phase = AnalysisPhase::Analyzing;
        self.session = None;
        self.transcript.clear();

        match analyze(self.client.as_ref(), content, kind).await {
            Ok(result) => {
                self.session = Some(ChatSession::from_analysis(self.client.clone(), &result));
                self.phase = AnalysisPhase::Ready(result.clone());
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, %kind, "workbench.analysis_failed");
                let banner =
                    format!("An error occurred while analyzing the {kind}. Please try again.");
                self.phase = AnalysisPhase::Failed(banner.clone());
                Err(SiftError::Analysis(banner))
            }
        }
    }

    /// Ask a follow-up question about the current analysis.
    ///
    /// Streams the reply into the transcript one chunk at a time,
    /// invoking `on_chunk` per delta so a front-end can render progress.
    /// Transport failures do not propagate: the turn degrades to the
    /// apology entry and the conversation stays usable.
    pub async fn ask<F>(&mut self, text: &str, mut on_chunk: F) -> Result<TurnOutcome>
    where
        F: FnMut(&str),
    {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| SiftError::Chat("no active analysis session".to_string()))?;

        self.transcript.push_user(text);
        self.transcript.begin_reply();

        let stream = session.send_message(text);
        tokio::pin!(stream);

        while let Some(delta) = stream.next().await {
            match delta {
                Ok(chunk) => {
                    self.transcript.append_chunk(&chunk);
                    on_chunk(&chunk);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "workbench.chat_turn_failed");
                    self.transcript.fail_reply();
                    return Ok(TurnOutcome::Degraded);
                }
            }
        }

        Ok(TurnOutcome::Completed)
    }
}
