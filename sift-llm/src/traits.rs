use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use sift_common::Result;

/// Role of one turn in a chat history, provider-neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One turn of a multi-turn conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// A web reference the provider consulted while answering with search
/// grounding enabled. Either field may be missing in the raw metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// Reply from a grounded one-shot generation call.
#[derive(Debug, Clone)]
pub struct GroundedReply {
    pub text: String,
    pub citations: Vec<WebCitation>,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

/// Incremental text deltas of a streamed reply, in arrival order.
pub type TextStream = BoxStream<'static, Result<String>>;

/// Provider seam used by the analysis layer.
///
/// Two calls cover everything the application needs: a single blocking
/// generation with web-search grounding, and a streamed reply over an
/// explicit turn history. Implementations own transport, auth, and wire
/// formats; callers never see provider-specific types.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate one complete reply with the provider's web-search tool
    /// enabled, returning the text and any grounding citations.
    async fn generate_grounded(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<GroundedReply>;

    /// Stream the model's reply to the final user turn of `turns`.
    ///
    /// The returned stream yields text deltas as they arrive; a transport
    /// error surfaces as an `Err` item and terminates the stream.
    async fn stream_chat(&self, turns: &[ChatTurn], system_instruction: &str)
        -> Result<TextStream>;

    /// Check whether the provider is reachable with the configured key.
    async fn health_check(&self) -> Result<bool>;

    /// The model identifier requests are issued against.
    fn model_name(&self) -> &str;
}
