//! # melodia-lingua
//!
//! Translate English song lyrics to Malayalam, have a hosted model sing them,
//! and follow along karaoke-style.
//!
//! ## Features
//!
//! - **WAV packaging**: wrap the raw PCM a TTS model returns in a canonical
//!   WAV container, ready for an `<audio>` tag
//! - **Duet prompts**: SSML with a two second rest after every line, so a
//!   second singer can answer
//! - **Karaoke sync**: map playback time to the highlighted lyric line
//! - **Hosted backends**: Google Gemini behind the `gemini` feature
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! melodia-lingua = { version = "2026.10", features = ["gemini"] }
//! ```
//!
//! ```ignore
//! use melodia_lingua::engines::gemini::GeminiEngine;
//! use melodia_lingua::synthesis::{synthesize_song, translate_lyrics, SongRequestBuilder};
//!
//! let mut engine = GeminiEngine::from_env()?;
//! let lyrics = translate_lyrics(&mut engine, "Twinkle, twinkle, little star")?;
//! let request = SongRequestBuilder::default()
//!     .lyrics(lyrics)
//!     .voice("aoede")
//!     .make_duet(true)
//!     .build()?;
//! let song = synthesize_song(&mut engine, &request)?;
//! println!("{}", song.data_uri());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Karaoke without any backend:
//!
//! ```
//! use melodia_lingua::karaoke::KaraokeSynchronizer;
//! use melodia_lingua::playback::{PlaybackClock, PlaybackEvent};
//!
//! let mut sync = KaraokeSynchronizer::new(4);
//! sync.handle(&PlaybackEvent::Play);
//! let scroll = sync.handle(&PlaybackEvent::TimeUpdate(PlaybackClock::new(7.5, Some(10.0))));
//! assert_eq!(scroll.map(|r| r.line), Some(3));
//! ```

pub mod actions;
pub mod app;
pub mod duet;
pub mod engines;
pub mod error;
pub mod karaoke;
pub mod lyrics;
pub mod playback;
pub mod songs;
pub mod synthesis;
pub mod voice;
pub mod wav;

pub use error::{Error, Result};
pub use karaoke::{KaraokeState, KaraokeSynchronizer};
pub use lyrics::LyricDocument;
pub use synthesis::{SongAudio, SongRequest, SpeechBackend, TranslationBackend};
pub use voice::VoiceStyle;
pub use wav::{encode_wav, PcmFormat};
