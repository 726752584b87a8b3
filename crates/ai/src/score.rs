//! Solution scoring against an OpenAI-compatible chat endpoint.

use async_trait::async_trait;
use base64::Engine;
use tracing::info;

use crate::prompts::GRADER_SYSTEM_PROMPT;
use crate::AiError;

/// A student's submitted solution, as raw bytes plus media type.
#[derive(Debug, Clone)]
pub struct SolutionDocument {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

/// Scores one submitted solution against a rubric and reference answer.
#[async_trait]
pub trait SolutionScorer: Send + Sync {
    async fn score_solution(
        &self,
        rubric: &str,
        answer_sheet: &str,
        solution: &SolutionDocument,
    ) -> Result<String, AiError>;
}

/// OpenAI-compatible scoring client.
///
/// The solution document travels as a base64 data URL, the way the grading
/// service expects uploaded pages.
#[derive(Debug, Clone)]
pub struct OpenAiSolutionScorer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSolutionScorer {
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
impl SolutionScorer for OpenAiSolutionScorer {
    async fn score_solution(
        &self,
        rubric: &str,
        answer_sheet: &str,
        solution: &SolutionDocument,
    ) -> Result<String, AiError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&solution.bytes);
        let data_url = format!("data:{};base64,{}", solution.media_type, encoded);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": GRADER_SYSTEM_PROMPT },
                { "role": "user", "content": [
                    { "type": "text", "text": format!("Rubric for grading guidelines: {rubric}") },
                    { "type": "text", "text": format!("Correct solution for reference: {answer_sheet}") },
                    { "type": "text", "text": "Student's answer to be graded:" },
                    { "type": "image_url", "image_url": { "url": data_url } },
                ] },
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
        let score = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AiError::InvalidResponse("no score text in response".into()))?
            .to_string();

        info!(chars = score.len(), "scoring service returned grade text");
        Ok(score)
    }
}
