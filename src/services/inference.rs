// src/services/inference.rs

//! Bedrock inference invoker.
//!
//! Sends the prompt as a single user message in the Anthropic Messages
//! format and returns the first text block of the reply.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::InferenceConfig;

/// Trait for language-model backends.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Return the model's assessment of `prompt`.
    async fn analyze(&self, prompt: &str) -> Result<String>;
}

/// Request body for `InvokeModel`.
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub anthropic_version: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Message<'a> {
    pub role: &'static str,
    pub content: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
}

impl<'a> MessagesRequest<'a> {
    /// A single-turn request carrying `prompt` as user text.
    pub fn user_prompt(config: &'a InferenceConfig, prompt: &'a str) -> Self {
        Self {
            anthropic_version: &config.anthropic_version,
            max_tokens: config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![RequestContent {
                    kind: "text",
                    text: prompt,
                }],
            }],
        }
    }
}

/// Response body of `InvokeModel`. Only the fields read here are modeled.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub text: Option<String>,
}

/// Pull the text of the first content block out of a response body.
pub fn extract_analysis_text(body: &[u8]) -> Result<String> {
    let response: MessagesResponse = serde_json::from_slice(body)?;
    let first = response
        .content
        .into_iter()
        .next()
        .ok_or_else(|| AppError::inference("response has no content blocks"))?;
    first
        .text
        .ok_or_else(|| AppError::inference("first content block has no text"))
}

/// Invokes an Anthropic model hosted on Bedrock.
pub struct BedrockAnalyzer {
    client: Client,
    config: InferenceConfig,
}

impl BedrockAnalyzer {
    pub fn new(client: Client, config: InferenceConfig) -> Self {
        Self { client, config }
    }

    /// Create an analyzer from the shared AWS configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig, config: InferenceConfig) -> Self {
        Self::new(Client::new(sdk_config), config)
    }
}

#[async_trait]
impl Analyzer for BedrockAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<String> {
        let body = serde_json::to_vec(&MessagesRequest::user_prompt(&self.config, prompt))?;

        log::info!(
            "Invoking {} ({} prompt bytes, max_tokens={})",
            self.config.model_id,
            prompt.len(),
            self.config.max_tokens
        );

        let output = self
            .client
            .invoke_model()
            .model_id(&self.config.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| AppError::Bedrock(DisplayErrorContext(&e).to_string()))?;

        extract_analysis_text(output.body().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_body_shape() {
        let config = InferenceConfig::default();
        let request = MessagesRequest::user_prompt(&config, "analyze this");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": 1000,
                "messages": [
                    {
                        "role": "user",
                        "content": [{ "type": "text", "text": "analyze this" }]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_extract_first_text_block() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "Escaneo de directorios desde 10.0.0.5" },
                { "type": "text", "text": "ignored" }
            ],
            "stop_reason": "end_turn"
        });

        let text = extract_analysis_text(body.to_string().as_bytes()).unwrap();
        assert_eq!(text, "Escaneo de directorios desde 10.0.0.5");
    }

    #[test]
    fn test_extract_empty_content_is_malformed() {
        let err = extract_analysis_text(br#"{"content": []}"#).unwrap_err();
        assert!(matches!(err, AppError::Inference(_)));
    }

    #[test]
    fn test_extract_block_without_text_is_malformed() {
        let err = extract_analysis_text(br#"{"content": [{"type": "tool_use"}]}"#).unwrap_err();
        assert!(matches!(err, AppError::Inference(_)));
    }

    #[test]
    fn test_extract_missing_content_is_json_error() {
        let err = extract_analysis_text(br#"{"message": "throttled"}"#).unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }
}
