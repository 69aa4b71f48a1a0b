//! Visible conversation transcript with per-turn chunk accumulation.

use sift_llm::traits::{ChatTurn, TurnRole};

/// Appended in place of a reply that failed mid-turn.
pub const CHAT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Append-only message list backing the chat view.
///
/// While a reply streams, the newest model entry grows chunk by chunk;
/// after `n` chunks its text is exactly their concatenation in arrival
/// order. Earlier entries are never rewritten.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatTurn] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Discarded wholesale when a new analysis replaces the session.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatTurn::user(text));
    }

    /// Open the empty model entry that subsequent chunks grow.
    pub fn begin_reply(&mut self) {
        self.messages.push(ChatTurn::model(""));
    }

    /// Fold one streamed chunk into the entry opened by [`begin_reply`].
    ///
    /// [`begin_reply`]: Transcript::begin_reply
    pub fn append_chunk(&mut self, chunk: &str) {
        match self.messages.last_mut() {
            Some(turn) if turn.role == TurnRole::Model => turn.text.push_str(chunk),
            _ => self.messages.push(ChatTurn::model(chunk)),
        }
    }

    /// Replace the in-progress reply with the fixed apology, keeping the
    /// user's message so the conversation can continue.
    pub fn fail_reply(&mut self) {
        match self.messages.last_mut() {
            Some(turn) if turn.role == TurnRole::Model => turn.text = CHAT_APOLOGY.to_string(),
            _ => self.messages.push(ChatTurn::model(CHAT_APOLOGY)),
        }
    }
}
