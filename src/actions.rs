//! UI-facing actions that report success or failure as data.
//!
//! The UI layer never sees an `Err` or a panic from these calls; it gets an
//! [`ActionOutcome`] it can serialize and show as a toast.

use serde::Serialize;

use crate::error::Result;
use crate::synthesis::{
    synthesize_song, translate_lyrics, SongRequest, SpeechBackend, TranslationBackend,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    fn from_result(result: Result<T>, action: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                log::error!("{action} failed: {e}");
                Self::failed(e.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateOutput {
    pub malayalam_lyrics: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeOutput {
    pub audio_data_uri: String,
}

/// Translate and wrap the result for the UI.
pub fn handle_translate<T>(backend: &mut T, english_lyrics: &str) -> ActionOutcome<TranslateOutput>
where
    T: TranslationBackend + ?Sized,
{
    let result = translate_lyrics(backend, english_lyrics)
        .map(|malayalam_lyrics| TranslateOutput { malayalam_lyrics });
    ActionOutcome::from_result(result, "Translation")
}

/// Synthesize and wrap the playable data URI for the UI.
pub fn handle_synthesize<S>(
    backend: &mut S,
    request: &SongRequest,
) -> ActionOutcome<SynthesizeOutput>
where
    S: SpeechBackend + ?Sized,
{
    let result = synthesize_song(backend, request).map(|song| SynthesizeOutput {
        audio_data_uri: song.data_uri(),
    });
    ActionOutcome::from_result(result, "Synthesis")
}
