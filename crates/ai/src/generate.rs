//! Question generation against an OpenAI-compatible chat endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prompts::{MCQ_SYSTEM_PROMPT, mcq_user_prompt};
use crate::AiError;

/// One generated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMcq {
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
}

/// The structured payload the generation service must return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqBatch {
    pub mcqs: Vec<GeneratedMcq>,
}

/// Generates a question batch from a full lecture transcript.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_mcqs(&self, transcript: &str) -> Result<Vec<GeneratedMcq>, AiError>;
}

/// OpenAI-compatible client (`/v1/chat/completions`, JSON response mode).
#[derive(Debug, Clone)]
pub struct OpenAiQuestionGenerator {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiQuestionGenerator {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiQuestionGenerator {
    async fn generate_mcqs(&self, transcript: &str) -> Result<Vec<GeneratedMcq>, AiError> {
        let body = serde_json::json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": MCQ_SYSTEM_PROMPT },
                { "role": "user", "content": mcq_user_prompt(transcript) },
            ],
        });

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let json: serde_json::Value = response.json().await?;
        let batch = parse_mcq_response(&json)?;
        info!(count = batch.mcqs.len(), "generation service returned mcqs");
        Ok(batch.mcqs)
    }
}

/// Pull the structured batch out of a chat-completions response.
pub(crate) fn parse_mcq_response(json: &serde_json::Value) -> Result<McqBatch, AiError> {
    let content = json
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AiError::InvalidResponse("no message content in response".into()))?;

    serde_json::from_str(content)
        .map_err(|e| AiError::InvalidResponse(format!("unparseable mcq batch: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion_with(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [ { "message": { "content": content } } ]
        })
    }

    #[test]
    fn parses_well_formed_batch() {
        let content = r#"{"mcqs":[{"question":"What is inertia?","answer":"Resistance to change in motion","options":["A","B","C","Resistance to change in motion"]}]}"#;
        let batch = parse_mcq_response(&completion_with(content)).unwrap();
        assert_eq!(batch.mcqs.len(), 1);
        assert_eq!(batch.mcqs[0].options.len(), 4);
    }

    #[test]
    fn missing_content_is_invalid() {
        let err = parse_mcq_response(&serde_json::json!({"choices": []})).unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }

    #[test]
    fn unparseable_content_is_invalid() {
        let err = parse_mcq_response(&completion_with("sorry, no json today")).unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }
}
