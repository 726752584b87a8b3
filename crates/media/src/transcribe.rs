//! Speech-to-text boundary (Uplift-compatible HTTP API).

use std::path::Path;

use async_trait::async_trait;
use tracing::{error, info};

/// Transcription error. Any failure here is fatal for the whole pipeline
/// run; there is no partial-success path.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("failed to read clip: {0}")]
    ReadClip(#[from] std::io::Error),
    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("transcription service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no transcript in response")]
    MissingTranscript,
}

/// Transcribes one extracted clip.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe_clip(&self, path: &Path) -> Result<String, TranscribeError>;
}

/// Client for the Uplift speech-to-text endpoint.
///
/// Fixed model id and source-language hint per deployment; the clip travels
/// as a multipart file field.
#[derive(Debug, Clone)]
pub struct UpliftSpeechToText {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    language: String,
}

impl UpliftSpeechToText {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.upliftai.org/v1";
    pub const DEFAULT_MODEL: &'static str = "scribe-mini";
    pub const DEFAULT_LANGUAGE: &'static str = "ur";

    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            language: language.into(),
        }
    }
}

#[async_trait]
impl SpeechToText for UpliftSpeechToText {
    async fn transcribe_clip(&self, path: &Path) -> Result<String, TranscribeError> {
        info!(clip = %path.display(), "sending clip to transcription service");

        let bytes = tokio::fs::read(path).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        let response = self
            .http
            .post(format!("{}/transcribe/speech-to-text", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "transcription service returned non-200");
            return Err(TranscribeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await?;
        let transcript = json
            .get("transcript")
            .and_then(|v| v.as_str())
            .ok_or(TranscribeError::MissingTranscript)?
            .to_string();

        info!(chars = transcript.len(), "received chunk transcript");
        Ok(transcript)
    }
}
