//! Hosted model backends.
//!
//! Enable backends via Cargo features:
//! - `gemini` - Google Gemini text and TTS models over HTTPS

#[cfg(feature = "gemini")]
pub mod gemini;
