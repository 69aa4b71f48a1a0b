use crate::traits::{ChatTurn, GroundedReply, LlmClient, TextStream, TurnRole, WebCitation};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use sift_common::{Result, SiftError};
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<GeminiSafetySetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct GeminiSafetySetting {
    category: String,
    threshold: String,
}

/// Enables the provider-side web search tool on a request.
#[derive(Debug, Serialize)]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    // Streaming chunks can carry usage metadata with no content.
    content: Option<GeminiResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingChunk {
    web: Option<GeminiWebSource>,
}

#[derive(Debug, Deserialize)]
struct GeminiWebSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

/// Google Gemini API client.
///
/// Requires a valid API key and internet access.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client using the provided API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, GEMINI_BASE_URL)
    }

    /// Create a client against a non-default endpoint (test servers).
    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SiftError::Provider(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn create_safety_settings() -> Vec<GeminiSafetySetting> {
        [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]
        .iter()
        .map(|category| GeminiSafetySetting {
            category: (*category).to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        })
        .collect()
    }

    fn system_instruction(text: &str) -> Option<GeminiSystemInstruction> {
        if text.is_empty() {
            return None;
        }
        Some(GeminiSystemInstruction {
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        })
    }

    fn contents_from_turns(turns: &[ChatTurn]) -> Vec<GeminiContent> {
        turns
            .iter()
            .map(|turn| GeminiContent {
                role: match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Model => "model",
                },
                parts: vec![GeminiPart {
                    text: turn.text.clone(),
                }],
            })
            .collect()
    }

    async fn post_generate(&self, request: &GeminiRequest) -> Result<GeminiResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        tracing::debug!(model = %self.model, "gemini.generate.start");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .query(&[("key", &self.api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| SiftError::Provider(format!("Gemini request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }

        resp.json()
            .await
            .map_err(|e| SiftError::Provider(format!("failed to parse Gemini response: {e}")))
    }

    async fn status_error(resp: reqwest::Response) -> SiftError {
        let status = resp.status();
        let error_text = resp.text().await.unwrap_or_default();

        match status.as_u16() {
            429 => SiftError::Provider("rate limit exceeded".to_string()),
            401 => SiftError::Provider("invalid API key".to_string()),
            403 => SiftError::Provider("API access forbidden".to_string()),
            _ => SiftError::Provider(format!("Gemini API error ({status}): {error_text}")),
        }
    }

    fn candidate_text(candidate: &GeminiCandidate) -> String {
        candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_grounded(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<GroundedReply> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
            safety_settings: Some(Self::create_safety_settings()),
            system_instruction: Self::system_instruction(system_instruction),
            tools: Some(vec![GeminiTool {
                google_search: GoogleSearch {},
            }]),
        };

        let response = self.post_generate(&request).await?;

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| SiftError::Provider("no candidates returned from Gemini".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(SiftError::Provider(
                "content blocked by Gemini safety filters".to_string(),
            ));
        }

        let text = Self::candidate_text(candidate);
        if text.is_empty() {
            return Err(SiftError::Provider(
                "no content parts in Gemini response".to_string(),
            ));
        }

        let citations = candidate
            .grounding_metadata
            .as_ref()
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .iter()
                    .map(|chunk| WebCitation {
                        uri: chunk.web.as_ref().and_then(|w| w.uri.clone()),
                        title: chunk.web.as_ref().and_then(|w| w.title.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let tokens_used = response
            .usage_metadata
            .and_then(|u| u.total_token_count);

        Ok(GroundedReply {
            text,
            citations,
            model: Some(self.model.clone()),
            tokens_used,
        })
    }

    async fn stream_chat(
        &self,
        turns: &[ChatTurn],
        system_instruction: &str,
    ) -> Result<TextStream> {
        let request = GeminiRequest {
            contents: Self::contents_from_turns(turns),
            generation_config: None,
            safety_settings: Some(Self::create_safety_settings()),
            system_instruction: Self::system_instruction(system_instruction),
            tools: None,
        };

        let url = format!(
            "{}/models/{}:streamGenerateContent",
            self.base_url, self.model
        );
        tracing::debug!(model = %self.model, turns = turns.len(), "gemini.stream.start");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .query(&[("alt", "sse"), ("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| SiftError::Provider(format!("Gemini stream request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }

        let mut byte_stream = resp.bytes_stream();

        // Server-sent events arrive as `data: <json>` records separated by
        // blank lines; chunk boundaries do not align with event boundaries,
        // so reassemble through a buffer.
        let stream = async_stream::try_stream! {
            let mut buffer = String::new();
            while let Some(next) = byte_stream.next().await {
                let bytes = next
                    .map_err(|e| SiftError::Provider(format!("stream read failed: {e}")))?;
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(boundary) = buffer.find("\n\n") {
                    let event: String = buffer.drain(..boundary + 2).collect();
                    let data = match event.trim_start().strip_prefix("data: ") {
                        Some(data) => data,
                        None => continue,
                    };
                    match serde_json::from_str::<GeminiResponse>(data.trim_end()) {
                        Ok(chunk) => {
                            let delta = chunk
                                .candidates
                                .first()
                                .map(Self::candidate_text)
                                .unwrap_or_default();
                            if !delta.is_empty() {
                                yield delta;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "gemini.stream.bad_event");
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    async fn health_check(&self) -> Result<bool> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: "Respond with just 'OK'".to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: Some(0.1),
                max_output_tokens: Some(5),
            }),
            safety_settings: None,
            system_instruction: None,
            tools: None,
        };

        match self.post_generate(&request).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
