//! Provider integration for Sift.
//!
//! This crate exposes the [`traits::LlmClient`] interface the analysis
//! layer is written against, and the concrete Gemini implementation. Use
//! [`client_from_config`] to build a client from a
//! [`sift_config::LlmConfig`].

pub mod gemini;
pub mod traits;

use gemini::GeminiClient;
use sift_common::Result;
use sift_config::LlmConfig;
use std::sync::Arc;
use traits::LlmClient;

/// Build the configured provider client.
pub fn client_from_config(config: &LlmConfig) -> Result<Arc<dyn LlmClient + Send + Sync>> {
    match config {
        LlmConfig::Gemini { api_key, model } => {
            let client = GeminiClient::new(api_key.clone(), model.clone())?;
            Ok(Arc::new(client))
        }
    }
}
