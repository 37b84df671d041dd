//! Google Gemini backend.
//!
//! Translation goes through a text model, singing through a TTS model that
//! returns 16-bit mono PCM as base64 inline data.
//!
//! # Configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `GEMINI_API_KEY` | required |
//! | `GEMINI_TEXT_MODEL` | `gemini-2.5-flash` |
//! | `GEMINI_TTS_MODEL` | `gemini-2.5-flash-preview-tts` |
//!
//! # Example
//!
//! ```rust,no_run
//! use melodia_lingua::engines::gemini::GeminiEngine;
//! use melodia_lingua::synthesis::{synthesize_song, translate_lyrics, SongRequestBuilder};
//!
//! let mut engine = GeminiEngine::from_env()?;
//! let malayalam = translate_lyrics(&mut engine, "Row, row, row your boat")?;
//! let request = SongRequestBuilder::default()
//!     .lyrics(malayalam)
//!     .voice("MaleTenor")
//!     .build()?;
//! let song = synthesize_song(&mut engine, &request)?;
//! song.write_wav(std::path::Path::new("song.wav"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod engine;

pub use engine::{GeminiEngine, GeminiError, GeminiParams};
