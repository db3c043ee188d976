//! AI client — the single point of entry for chat-completion calls.
//!
//! One request per call: no retry, no streaming, no multi-turn memory.
//! Callers feed the returned text into the recommendation parser; this
//! module performs no JSON-vs-outline interpretation of the reply.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all AI calls.
pub const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("AI client error: {0}")]
    Unknown(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completion client, constructed in `main` and carried in `AppState`.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
}

impl ChatClient {
    pub fn new(api_key: String) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_key })
    }

    /// Issues exactly one chat-completion request and returns the raw text
    /// of the first choice.
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AiError::InvalidResponse(format!(
                "status {}: {}",
                status.as_u16(),
                truncate(&body, 200)
            )));
        }

        let envelope: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::InvalidResponse(format!("unparsable envelope: {e}")))?;

        let content = extract_message_content(envelope)?;
        debug!("AI call succeeded ({} chars)", content.len());
        Ok(content)
    }
}

/// Pulls `choices[0].message.content` out of the response envelope.
fn extract_message_content(envelope: ChatResponse) -> Result<String, AiError> {
    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AiError::InvalidResponse("no completion content".to_string()))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_from_standard_envelope() {
        let envelope: ChatResponse = serde_json::from_str(
            r#"{
                "choices": [
                    {"message": {"role": "assistant", "content": "Hello there"}}
                ],
                "usage": {"total_tokens": 12}
            }"#,
        )
        .unwrap();
        assert_eq!(extract_message_content(envelope).unwrap(), "Hello there");
    }

    #[test]
    fn test_extract_content_empty_choices_fails() {
        let envelope: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_message_content(envelope).is_err());
    }

    #[test]
    fn test_extract_content_null_content_fails() {
        let envelope: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(extract_message_content(envelope).is_err());
    }

    #[test]
    fn test_envelope_missing_choices_is_parse_error() {
        assert!(serde_json::from_str::<ChatResponse>(r#"{"model": "x"}"#).is_err());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
