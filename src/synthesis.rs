//! Translation and song synthesis pipelines.
//!
//! Both steps are delegated to hosted models behind [`TranslationBackend`] and
//! [`SpeechBackend`]. This module shapes the requests (prompt template, voice
//! resolution, duet markup) and the responses (inline audio to WAV).

use std::path::Path;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use derive_builder::Builder;

use crate::duet::synthesis_prompt;
use crate::error::{Error, Result};
use crate::voice::VoiceStyle;
use crate::wav::{encode_wav, wav_data_uri, PcmFormat};

/// Error type returned by hosted backends.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Prompt template for lyric translation.
pub const TRANSLATION_PROMPT: &str = "Translate the following English song lyrics to Malayalam:";

/// Build the translation prompt for `english_lyrics`.
pub fn translation_prompt(english_lyrics: &str) -> String {
    format!("{TRANSLATION_PROMPT}\n\n{english_lyrics}")
}

/// A hosted text model used for translation.
pub trait TranslationBackend {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Complete `prompt` and return the model's text.
    fn complete(&mut self, prompt: &str) -> std::result::Result<String, BackendError>;
}

/// A hosted speech model.
pub trait SpeechBackend {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Speak `prompt` (plain text or SSML) with `voice`.
    ///
    /// `Ok(None)` means the call succeeded but no audio came back.
    fn generate_speech(
        &mut self,
        prompt: &str,
        voice: VoiceStyle,
    ) -> std::result::Result<Option<SpeechMedia>, BackendError>;
}

/// Raw audio returned by a speech backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechMedia {
    /// e.g. `audio/L16;codec=pcm;rate=24000`
    pub mime_type: String,
    /// Headerless little-endian PCM.
    pub data: Vec<u8>,
}

impl SpeechMedia {
    /// Decode base64 inline data.
    pub fn from_base64(mime_type: impl Into<String>, data: &str) -> Result<Self> {
        let data = STANDARD
            .decode(data.trim())
            .map_err(|e| Error::InvalidMedia(format!("bad base64 audio: {e}")))?;
        Ok(Self {
            mime_type: mime_type.into(),
            data,
        })
    }

    /// PCM layout advertised by the MIME type.
    ///
    /// Hosted TTS returns 16-bit mono; only `rate=` is read from the
    /// parameters, everything else keeps the default.
    pub fn pcm_format(&self) -> PcmFormat {
        let mut format = PcmFormat::default();
        for param in self.mime_type.split(';').skip(1) {
            if let Some(rate) = param.trim().strip_prefix("rate=") {
                match rate.parse() {
                    Ok(rate) => format.sample_rate = rate,
                    Err(_) => log::warn!("Ignoring malformed rate in {:?}", self.mime_type),
                }
            }
        }
        format
    }
}

/// A song synthesis request.
///
/// ```
/// use melodia_lingua::synthesis::SongRequestBuilder;
///
/// let request = SongRequestBuilder::default()
///     .lyrics("മിന്നും താരമേ")
///     .voice("aoede")
///     .make_duet(true)
///     .build()
///     .unwrap();
/// assert!(request.make_duet);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct SongRequest {
    /// Lyrics to sing, usually the Malayalam translation.
    pub lyrics: String,
    /// Voice identifier in either vocabulary; validated at synthesis time.
    #[builder(default = "VoiceStyle::default().voice_name().to_string()")]
    pub voice: String,
    /// Leave a rest after every line for a second singer.
    #[builder(default)]
    pub make_duet: bool,
}

/// A synthesized song packaged as WAV.
#[derive(Debug, Clone)]
pub struct SongAudio {
    /// Complete WAV file.
    pub wav: Vec<u8>,
    pub format: PcmFormat,
    pub voice: VoiceStyle,
}

impl SongAudio {
    /// `data:audio/wav;base64,...` for direct playback.
    pub fn data_uri(&self) -> String {
        wav_data_uri(&self.wav)
    }

    pub fn duration_secs(&self) -> f64 {
        self.format
            .duration_secs(self.wav.len().saturating_sub(crate::wav::HEADER_LEN))
    }

    /// Write the WAV file to disk.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.wav)?;
        Ok(())
    }
}

/// Translate English lyrics to Malayalam.
pub fn translate_lyrics<T>(backend: &mut T, english_lyrics: &str) -> Result<String>
where
    T: TranslationBackend + ?Sized,
{
    if english_lyrics.trim().is_empty() {
        return Err(Error::EmptyLyrics);
    }

    let start = Instant::now();
    let text = backend
        .complete(&translation_prompt(english_lyrics))
        .map_err(Error::Backend)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Backend("model returned an empty translation".into()));
    }

    log::info!(
        "Translated {} chars with '{}' in {:.2?}",
        english_lyrics.len(),
        backend.name(),
        start.elapsed()
    );
    Ok(text.to_string())
}

/// Sing `request.lyrics` and package the result as WAV.
///
/// The voice is resolved before the backend is called, so an unknown voice
/// never costs a network round trip.
pub fn synthesize_song<S>(backend: &mut S, request: &SongRequest) -> Result<SongAudio>
where
    S: SpeechBackend + ?Sized,
{
    if request.lyrics.trim().is_empty() {
        return Err(Error::EmptyLyrics);
    }
    let voice: VoiceStyle = request.voice.parse()?;
    let prompt = synthesis_prompt(&request.lyrics, request.make_duet);

    let start = Instant::now();
    let media = backend
        .generate_speech(&prompt, voice)
        .map_err(Error::Backend)?
        .filter(|m| !m.data.is_empty())
        .ok_or(Error::NoMedia)?;

    let format = media.pcm_format();
    let wav = encode_wav(&media.data, format)?;
    let song = SongAudio { wav, format, voice };

    log::info!(
        "Synthesized {:.2}s of audio with '{}' ({}, duet={}) in {:.2?}",
        song.duration_secs(),
        backend.name(),
        voice,
        request.make_duet,
        start.elapsed()
    );
    Ok(song)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::WavHeader;

    struct ScriptedSpeech {
        reply: Option<Vec<u8>>,
        calls: Vec<(String, VoiceStyle)>,
    }

    impl ScriptedSpeech {
        fn returning(reply: Option<Vec<u8>>) -> Self {
            Self {
                reply,
                calls: Vec::new(),
            }
        }
    }

    impl SpeechBackend for ScriptedSpeech {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate_speech(
            &mut self,
            prompt: &str,
            voice: VoiceStyle,
        ) -> std::result::Result<Option<SpeechMedia>, BackendError> {
            self.calls.push((prompt.to_string(), voice));
            Ok(self.reply.clone().map(|data| SpeechMedia {
                mime_type: "audio/L16;codec=pcm;rate=24000".to_string(),
                data,
            }))
        }
    }

    struct EchoTranslator(Vec<String>);

    impl TranslationBackend for EchoTranslator {
        fn name(&self) -> &str {
            "echo"
        }

        fn complete(&mut self, prompt: &str) -> std::result::Result<String, BackendError> {
            self.0.push(prompt.to_string());
            Ok("  നമസ്കാരം\n".to_string())
        }
    }

    fn request(lyrics: &str, voice: &str, duet: bool) -> SongRequest {
        SongRequestBuilder::default()
            .lyrics(lyrics)
            .voice(voice)
            .make_duet(duet)
            .build()
            .unwrap()
    }

    #[test]
    fn wraps_returned_pcm_in_wav() {
        let mut backend = ScriptedSpeech::returning(Some(vec![1, 0, 2, 0]));
        let song = synthesize_song(&mut backend, &request("പാട്ട്", "charon", false)).unwrap();

        let header = WavHeader::parse(&song.wav).unwrap();
        assert_eq!(header.data_len, 4);
        assert_eq!(header.sample_rate, 24000);
        assert_eq!(&song.wav[44..], &[1, 0, 2, 0]);
        assert_eq!(song.voice, VoiceStyle::Charon);
        assert!(song.data_uri().starts_with("data:audio/wav;base64,"));
        assert_eq!(backend.calls, vec![("പാട്ട്".to_string(), VoiceStyle::Charon)]);
    }

    #[test]
    fn duet_requests_send_markup() {
        let mut backend = ScriptedSpeech::returning(Some(vec![0, 0]));
        synthesize_song(&mut backend, &request("one\n\ntwo", "FemaleAlto", true)).unwrap();

        let (prompt, voice) = &backend.calls[0];
        assert_eq!(
            prompt,
            "<speak><p>one</p><break time=\"2s\"/><p>two</p><break time=\"2s\"/></speak>"
        );
        assert_eq!(*voice, VoiceStyle::Achird);
    }

    #[test]
    fn unknown_voice_skips_the_backend() {
        let mut backend = ScriptedSpeech::returning(Some(vec![0, 0]));
        let err = synthesize_song(&mut backend, &request("la la", "MaleBass", false)).unwrap_err();
        assert!(matches!(err, Error::UnknownVoice(_)));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn missing_or_empty_media_is_reported() {
        for reply in [None, Some(Vec::new())] {
            let mut backend = ScriptedSpeech::returning(reply);
            let err = synthesize_song(&mut backend, &request("la", "puck", false)).unwrap_err();
            assert!(matches!(err, Error::NoMedia));
            assert_eq!(err.to_string(), "no media returned");
        }
    }

    #[test]
    fn empty_lyrics_are_rejected() {
        let mut backend = ScriptedSpeech::returning(Some(vec![0, 0]));
        let err = synthesize_song(&mut backend, &request(" \n ", "puck", false)).unwrap_err();
        assert!(matches!(err, Error::EmptyLyrics));

        let mut translator = EchoTranslator(Vec::new());
        assert!(matches!(translate_lyrics(&mut translator, ""), Err(Error::EmptyLyrics)));
        assert!(translator.0.is_empty());
    }

    #[test]
    fn translation_uses_prompt_template() {
        let mut translator = EchoTranslator(Vec::new());
        let text = translate_lyrics(&mut translator, "Hello").unwrap();
        assert_eq!(text, "നമസ്കാരം");
        assert_eq!(
            translator.0,
            vec!["Translate the following English song lyrics to Malayalam:\n\nHello".to_string()]
        );
    }

    #[test]
    fn decodes_inline_base64_and_rate() {
        let media = SpeechMedia::from_base64("audio/L16;codec=pcm;rate=16000", "AAEC\n").unwrap();
        assert_eq!(media.data, vec![0, 1, 2]);
        assert_eq!(media.pcm_format().sample_rate, 16000);
        assert_eq!(media.pcm_format().channels, 1);

        let no_rate = SpeechMedia::from_base64("audio/L16;rate=fast", "AAA=").unwrap();
        assert_eq!(no_rate.pcm_format(), PcmFormat::default());
        assert!(matches!(
            SpeechMedia::from_base64("audio/L16", "!!!"),
            Err(Error::InvalidMedia(_))
        ));
    }

    #[test]
    fn builder_defaults() {
        let request = SongRequestBuilder::default().lyrics("x").build().unwrap();
        assert_eq!(request.voice, "alnilam");
        assert!(!request.make_duet);
        assert!(SongRequestBuilder::default().build().is_err());
    }
}
