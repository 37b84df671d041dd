use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::synthesis::{BackendError, SpeechBackend, SpeechMedia, TranslationBackend};
use crate::voice::VoiceStyle;

use super::api::{GenerateContentRequest, GenerateContentResponse};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(thiserror::Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("GEMINI_API_KEY is not set.")]
    MissingApiKey,
    #[error("Response had no text")]
    EmptyText,
    #[error("Invalid inline audio: {0}")]
    InvalidAudio(String),
}

/// Connection and model settings for [`GeminiEngine`].
#[derive(Debug, Clone)]
pub struct GeminiParams {
    pub api_key: String,
    /// Model used for translation.
    pub text_model: String,
    /// Model used for speech synthesis.
    pub tts_model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GeminiParams {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            text_model: "gemini-2.5-flash".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            temperature: 0.3,
            timeout: Duration::from_secs(120),
        }
    }
}

impl GeminiParams {
    /// Read `GEMINI_API_KEY`, plus optional `GEMINI_TEXT_MODEL` and
    /// `GEMINI_TTS_MODEL` overrides.
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        let mut params = Self {
            api_key,
            ..Default::default()
        };
        if let Ok(model) = std::env::var("GEMINI_TEXT_MODEL") {
            params.text_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_TTS_MODEL") {
            params.tts_model = model;
        }
        Ok(params)
    }
}

/// Google Gemini backend for both translation and speech.
pub struct GeminiEngine {
    client: Client,
    params: GeminiParams,
}

impl GeminiEngine {
    pub fn new(params: GeminiParams) -> Result<Self, GeminiError> {
        let client = Client::builder().timeout(params.timeout).build()?;
        log::info!(
            "Gemini engine ready (text: {}, tts: {})",
            params.text_model,
            params.tts_model
        );
        Ok(Self { client, params })
    }

    pub fn from_env() -> Result<Self, GeminiError> {
        Self::new(GeminiParams::from_env()?)
    }

    fn generate<R: DeserializeOwned>(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<R, GeminiError> {
        let url = format!("{API_BASE}/{model}:generateContent");
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.params.api_key)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GeminiError::Status { status, body });
        }
        Ok(response.json()?)
    }
}

impl TranslationBackend for GeminiEngine {
    fn name(&self) -> &str {
        "gemini"
    }

    fn complete(&mut self, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateContentRequest::text(prompt, self.params.temperature);
        let response: GenerateContentResponse = self.generate(&self.params.text_model, &body)?;
        Ok(response.text().ok_or(GeminiError::EmptyText)?)
    }
}

impl SpeechBackend for GeminiEngine {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate_speech(
        &mut self,
        prompt: &str,
        voice: VoiceStyle,
    ) -> Result<Option<SpeechMedia>, BackendError> {
        let body = GenerateContentRequest::speech(prompt, voice.voice_name());
        let response: GenerateContentResponse = self.generate(&self.params.tts_model, &body)?;

        let Some(inline) = response.inline_audio() else {
            log::warn!("Gemini response carried no inline audio");
            return Ok(None);
        };
        let media = SpeechMedia::from_base64(inline.mime_type.as_str(), &inline.data)
            .map_err(|e| GeminiError::InvalidAudio(e.to_string()))?;
        Ok(Some(media))
    }
}
