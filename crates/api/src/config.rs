//! Environment-driven configuration.
//!
//! Read once in `main` and passed by value into the wiring; nothing else in
//! the process touches the environment.

use std::path::PathBuf;

use sabqcha_media::UpliftSpeechToText;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    /// Root directory of the local blob store.
    pub blob_root: PathBuf,
    pub uplift_base_url: String,
    pub uplift_api_key: String,
    pub uplift_model: String,
    pub uplift_language: String,
    pub openai_base_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Required only when built with the `postgres` feature.
    pub database_url: Option<String>,
    pub max_concurrent_transcriptions: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            blob_root: PathBuf::from("blobs"),
            uplift_base_url: UpliftSpeechToText::DEFAULT_BASE_URL.to_string(),
            uplift_api_key: String::new(),
            uplift_model: UpliftSpeechToText::DEFAULT_MODEL.to_string(),
            uplift_language: UpliftSpeechToText::DEFAULT_LANGUAGE.to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            openai_api_key: String::new(),
            openai_model: "gpt-5-mini".to_string(),
            database_url: None,
            max_concurrent_transcriptions: 4,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let uplift_api_key = std::env::var("UPLIFT_API_KEY").unwrap_or_else(|_| {
            tracing::warn!("UPLIFT_API_KEY not set; transcription calls will be rejected");
            defaults.uplift_api_key.clone()
        });
        let openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
            tracing::warn!("OPENAI_API_KEY not set; generation calls will be rejected");
            defaults.openai_api_key.clone()
        });

        Self {
            bind_addr: env_or("SABQCHA_BIND_ADDR", &defaults.bind_addr),
            blob_root: PathBuf::from(env_or(
                "SABQCHA_BLOB_ROOT",
                &defaults.blob_root.display().to_string(),
            )),
            uplift_base_url: env_or("UPLIFT_BASE_URL", &defaults.uplift_base_url),
            uplift_api_key,
            uplift_model: env_or("UPLIFT_MODEL", &defaults.uplift_model),
            uplift_language: env_or("UPLIFT_LANGUAGE", &defaults.uplift_language),
            openai_base_url: env_or("OPENAI_BASE_URL", &defaults.openai_base_url),
            openai_api_key,
            openai_model: env_or("OPENAI_MODEL", &defaults.openai_model),
            database_url: std::env::var("SABQCHA_DATABASE_URL").ok(),
            max_concurrent_transcriptions: std::env::var("SABQCHA_MAX_TRANSCRIBE_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent_transcriptions),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
