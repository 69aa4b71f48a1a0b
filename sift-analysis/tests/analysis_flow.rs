use async_trait::async_trait;
use sift_analysis::{
    analyze, AnalysisPhase, ContentKind, RiskLevel, TurnOutcome, Workbench, CHAT_APOLOGY,
    FALLBACK_SUMMARY,
};
use sift_common::{Result, SiftError};
use sift_llm::traits::{ChatTurn, GroundedReply, LlmClient, TextStream, WebCitation};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted stand-in for the provider client.
#[derive(Default)]
struct FakeLlm {
    /// Reply for `generate_grounded`; `None` simulates a provider failure.
    grounded: Option<GroundedReply>,
    /// Deltas streamed per chat turn; `Err` simulates a mid-stream drop.
    chat_chunks: Vec<std::result::Result<String, String>>,
    /// Refuse the chat request before any delta is produced.
    fail_chat_connect: bool,
    generate_calls: AtomicUsize,
    /// Turn history observed by the most recent `stream_chat` call.
    seen_history: Mutex<Vec<ChatTurn>>,
}

impl FakeLlm {
    fn with_reply(text: &str, citations: Vec<WebCitation>) -> Self {
        Self {
            grounded: Some(GroundedReply {
                text: text.to_string(),
                citations,
                model: Some("fake-model".to_string()),
                tokens_used: None,
            }),
            ..Self::default()
        }
    }

    fn chunks(mut self, chunks: &[&str]) -> Self {
        self.chat_chunks = chunks.iter().map(|c| Ok(c.to_string())).collect();
        self
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn generate_grounded(
        &self,
        _prompt: &str,
        _system_instruction: &str,
    ) -> Result<GroundedReply> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        match &self.grounded {
            Some(reply) => Ok(reply.clone()),
            None => Err(SiftError::Provider("provider offline".to_string())),
        }
    }

    async fn stream_chat(
        &self,
        turns: &[ChatTurn],
        _system_instruction: &str,
    ) -> Result<TextStream> {
        *self.seen_history.lock().unwrap() = turns.to_vec();
        if self.fail_chat_connect {
            return Err(SiftError::Provider("connection refused".to_string()));
        }
        let items: Vec<Result<String>> = self
            .chat_chunks
            .iter()
            .map(|chunk| match chunk {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(SiftError::Provider(message.clone())),
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

const STRUCTURED_REPLY: &str = "Risk Level: HIGH\nSummary: This claim is false.\nDetailed Analysis:\n- No citation provided\n- Contradicts WHO data";

fn citation(uri: &str, title: &str) -> WebCitation {
    WebCitation {
        uri: Some(uri.to_string()),
        title: Some(title.to_string()),
    }
}

#[tokio::test]
async fn analyze_assembles_structured_result() {
    let fake = FakeLlm::with_reply(
        STRUCTURED_REPLY,
        vec![
            citation("https://who.int/x", "WHO"),
            citation("https://who.int/x", "WHO again"),
            citation("https://example.org", "Example"),
        ],
    );

    let result = analyze(&fake, "the claim", ContentKind::Text)
        .await
        .expect("analysis succeeds");

    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.summary, "This claim is false.");
    assert_eq!(
        result.details,
        vec!["No citation provided", "Contradicts WHO data"]
    );
    assert_eq!(result.sources.len(), 2);
    assert_eq!(result.sources[0].title, "WHO");
    assert_eq!(result.original_content, "the claim");
    assert_eq!(result.original_kind, ContentKind::Text);
}

#[tokio::test]
async fn analyze_failure_is_generic_and_hides_cause() {
    let fake = FakeLlm::default();
    let err = analyze(&fake, "anything", ContentKind::Url)
        .await
        .expect_err("analysis fails");
    let message = err.to_string();
    assert!(message.contains("failed to get analysis"));
    assert!(!message.contains("provider offline"));
}

#[tokio::test]
async fn unstructured_reply_still_yields_a_result() {
    let fake = FakeLlm::with_reply("no structure whatsoever", vec![]);
    let result = analyze(&fake, "text", ContentKind::Text)
        .await
        .expect("parser is total");
    assert_eq!(result.risk_level, RiskLevel::Unknown);
    assert_eq!(result.summary, FALLBACK_SUMMARY);
    assert_eq!(result.details, vec!["no structure whatsoever"]);
}

#[tokio::test]
async fn submit_moves_to_ready_and_opens_session() {
    let fake = Arc::new(FakeLlm::with_reply(STRUCTURED_REPLY, vec![]));
    let mut workbench = Workbench::new(fake);

    assert!(matches!(workbench.phase(), AnalysisPhase::Idle));
    let result = workbench
        .submit("the claim", ContentKind::Text)
        .await
        .expect("submit succeeds");
    assert_eq!(result.risk_level, RiskLevel::High);
    assert!(matches!(workbench.phase(), AnalysisPhase::Ready(_)));
    assert!(workbench.has_session());
    assert!(workbench.transcript().is_empty());
}

#[tokio::test]
async fn submit_rejects_blank_input() {
    let fake = Arc::new(FakeLlm::with_reply(STRUCTURED_REPLY, vec![]));
    let mut workbench = Workbench::new(fake.clone());

    let err = workbench
        .submit("   ", ContentKind::Url)
        .await
        .expect_err("blank input rejected");
    assert!(err.to_string().contains("please enter"));
    assert_eq!(fake.generate_calls.load(Ordering::SeqCst), 0);
    assert!(matches!(workbench.phase(), AnalysisPhase::Idle));
}

#[tokio::test]
async fn failed_submit_shows_banner_and_no_session() {
    let fake = Arc::new(FakeLlm::default());
    let mut workbench = Workbench::new(fake);

    let err = workbench
        .submit("the claim", ContentKind::Url)
        .await
        .expect_err("submit fails");
    assert!(err.to_string().contains("Please try again"));
    match workbench.phase() {
        AnalysisPhase::Failed(banner) => {
            assert!(banner.contains("analyzing the URL"));
        }
        other => panic!("expected Failed phase, got {other:?}"),
    }
    assert!(!workbench.has_session());
}

#[tokio::test]
async fn chat_turn_streams_into_transcript_and_history() {
    let fake = Arc::new(
        FakeLlm::with_reply(STRUCTURED_REPLY, vec![]).chunks(&["Hel", "lo ", "there"]),
    );
    let mut workbench = Workbench::new(fake.clone());
    workbench
        .submit("the claim", ContentKind::Text)
        .await
        .expect("submit");

    let mut observed = Vec::new();
    let outcome = workbench
        .ask("why high risk?", |chunk| observed.push(chunk.to_string()))
        .await
        .expect("turn runs");

    assert_eq!(outcome, TurnOutcome::Completed);
    assert_eq!(observed, vec!["Hel", "lo ", "there"]);
    let last = workbench.transcript().last().expect("reply entry");
    assert_eq!(last.text, "Hello there");

    // the session history the provider saw: two seed turns plus the question
    let seen = fake.seen_history.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].text.contains("Here is the text I analyzed"));
    assert!(seen[0].text.contains("the claim"));
    assert!(seen[1].text.contains("Risk Level: HIGH"));
    assert!(seen[1].text.contains("This claim is false."));
    assert_eq!(seen[2].text, "why high risk?");
}

#[tokio::test]
async fn drained_reply_joins_history_for_next_turn() {
    let fake = Arc::new(
        FakeLlm::with_reply(STRUCTURED_REPLY, vec![]).chunks(&["answer one"]),
    );
    let mut workbench = Workbench::new(fake.clone());
    workbench
        .submit("the claim", ContentKind::Text)
        .await
        .expect("submit");

    workbench.ask("first?", |_| {}).await.expect("first turn");
    workbench.ask("second?", |_| {}).await.expect("second turn");

    let seen = fake.seen_history.lock().unwrap().clone();
    // 2 seed turns + user + model + user
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[3].text, "answer one");
    assert_eq!(seen[4].text, "second?");
}

#[tokio::test]
async fn mid_stream_failure_degrades_to_apology() {
    let mut fake = FakeLlm::with_reply(STRUCTURED_REPLY, vec![]);
    fake.chat_chunks = vec![
        Ok("partial ".to_string()),
        Err("socket closed".to_string()),
    ];
    let mut workbench = Workbench::new(Arc::new(fake));
    workbench
        .submit("the claim", ContentKind::Text)
        .await
        .expect("submit");

    let outcome = workbench
        .ask("question", |_| {})
        .await
        .expect("turn degrades, does not error");

    assert_eq!(outcome, TurnOutcome::Degraded);
    let messages = workbench.transcript().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "question");
    assert_eq!(messages[1].text, CHAT_APOLOGY);
}

#[tokio::test]
async fn connect_failure_also_degrades_to_apology() {
    let mut fake = FakeLlm::with_reply(STRUCTURED_REPLY, vec![]);
    fake.fail_chat_connect = true;
    let mut workbench = Workbench::new(Arc::new(fake));
    workbench
        .submit("the claim", ContentKind::Text)
        .await
        .expect("submit");

    let outcome = workbench.ask("question", |_| {}).await.expect("degrades");
    assert_eq!(outcome, TurnOutcome::Degraded);
    assert_eq!(workbench.transcript().last().unwrap().text, CHAT_APOLOGY);
}

#[tokio::test]
async fn ask_without_session_is_an_error() {
    let fake = Arc::new(FakeLlm::with_reply(STRUCTURED_REPLY, vec![]));
    let mut workbench = Workbench::new(fake);
    let err = workbench
        .ask("question", |_| {})
        .await
        .expect_err("no session yet");
    assert!(err.to_string().contains("no active analysis session"));
}

#[tokio::test]
async fn new_submission_replaces_session_and_transcript() {
    let fake = Arc::new(
        FakeLlm::with_reply(STRUCTURED_REPLY, vec![]).chunks(&["reply"]),
    );
    let mut workbench = Workbench::new(fake.clone());
    workbench
        .submit("first claim", ContentKind::Text)
        .await
        .expect("first submit");
    workbench.ask("q", |_| {}).await.expect("turn");
    assert!(!workbench.transcript().is_empty());

    workbench
        .submit("second claim", ContentKind::Text)
        .await
        .expect("second submit");
    assert!(workbench.transcript().is_empty());
    assert!(workbench.has_session());

    workbench.ask("q2", |_| {}).await.expect("turn");
    let seen = fake.seen_history.lock().unwrap().clone();
    // fresh session: seeds mention the second claim only
    assert!(seen[0].text.contains("second claim"));
    assert!(!seen[0].text.contains("first claim"));
}
