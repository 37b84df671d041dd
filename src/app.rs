//! Application controller.
//!
//! All UI state lives in [`AppState`], owned by [`MelodiaLingua`] and changed
//! only through its methods. Each method returns a [`Notice`] for the host to
//! display.

use serde::Serialize;

use crate::actions::{handle_synthesize, handle_translate};
use crate::karaoke::{KaraokeSynchronizer, ScrollRequest};
use crate::lyrics::LyricDocument;
use crate::playback::PlaybackEvent;
use crate::songs::find_song;
use crate::synthesis::{SongRequest, SpeechBackend, TranslationBackend};
use crate::voice::VoiceStyle;
use crate::wav::{probe_track, wav_data_uri, TrackInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LyricsTab {
    #[default]
    Translated,
    Original,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn success(title: &str, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.to_string(),
            description: description.into(),
        }
    }

    fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// A user-supplied backing track.
#[derive(Debug, Clone)]
pub struct CustomTrack {
    pub name: String,
    pub data_uri: String,
    pub info: TrackInfo,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub english_lyrics: String,
    pub malayalam_lyrics: String,
    pub selected_voice: VoiceStyle,
    pub make_duet: bool,
    /// Data URI of the last synthesized song.
    pub audio_data_uri: Option<String>,
    pub custom_track: Option<CustomTrack>,
    pub show_player: bool,
    pub active_tab: LyricsTab,
}

impl AppState {
    /// Audio the player should load; an uploaded track wins.
    pub fn player_source(&self) -> Option<&str> {
        self.custom_track
            .as_ref()
            .map(|t| t.data_uri.as_str())
            .or(self.audio_data_uri.as_deref())
    }

    /// Lyrics shown in the karaoke view for the active tab.
    pub fn displayed_lyrics(&self) -> LyricDocument<'_> {
        match self.active_tab {
            LyricsTab::Translated => LyricDocument::parse(&self.malayalam_lyrics),
            LyricsTab::Original => LyricDocument::parse(&self.english_lyrics),
        }
    }
}

pub struct MelodiaLingua<T, S> {
    translator: T,
    speech: S,
    state: AppState,
    karaoke: KaraokeSynchronizer,
}

impl<T, S> MelodiaLingua<T, S>
where
    T: TranslationBackend,
    S: SpeechBackend,
{
    pub fn new(translator: T, speech: S) -> Self {
        Self {
            translator,
            speech,
            state: AppState::default(),
            karaoke: KaraokeSynchronizer::new(0),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn karaoke(&self) -> &KaraokeSynchronizer {
        &self.karaoke
    }

    pub fn set_english_lyrics(&mut self, lyrics: impl Into<String>) {
        self.state.english_lyrics = lyrics.into();
        self.sync_line_count();
    }

    /// Load a preloaded song by title; `"none"` clears the lyrics.
    pub fn choose_song(&mut self, title: &str) -> bool {
        if title == "none" {
            self.set_english_lyrics(String::new());
            return true;
        }
        match find_song(title) {
            Some(song) => {
                self.set_english_lyrics(song.lyrics);
                if let Ok(voice) = song.voice.parse() {
                    self.state.selected_voice = voice;
                }
                true
            }
            None => false,
        }
    }

    pub fn set_malayalam_lyrics(&mut self, lyrics: impl Into<String>) {
        self.state.malayalam_lyrics = lyrics.into();
        self.sync_line_count();
    }

    pub fn select_voice(&mut self, voice: VoiceStyle) {
        self.state.selected_voice = voice;
    }

    pub fn set_make_duet(&mut self, make_duet: bool) {
        self.state.make_duet = make_duet;
    }

    pub fn translate(&mut self) -> Notice {
        if self.state.english_lyrics.trim().is_empty() {
            return Notice::error("Error", "Please enter some English lyrics to translate.");
        }
        self.state.malayalam_lyrics.clear();
        self.state.audio_data_uri = None;
        self.state.show_player = false;
        self.sync_line_count();

        let outcome = handle_translate(&mut self.translator, &self.state.english_lyrics);
        match (outcome.data, outcome.error) {
            (Some(data), _) => {
                self.set_malayalam_lyrics(data.malayalam_lyrics);
                Notice::success("Success!", "Lyrics translated to Malayalam.")
            }
            (None, error) => Notice::error(
                "Translation Failed",
                error.unwrap_or_else(|| "An unknown error occurred during translation.".into()),
            ),
        }
    }

    pub fn synthesize(&mut self) -> Notice {
        if self.state.malayalam_lyrics.trim().is_empty() {
            return Notice::error("Error", "There are no Malayalam lyrics to synthesize.");
        }
        self.state.audio_data_uri = None;
        self.state.show_player = false;

        let request = SongRequest {
            lyrics: self.state.malayalam_lyrics.clone(),
            voice: self.state.selected_voice.voice_name().to_string(),
            make_duet: self.state.make_duet,
        };
        let outcome = handle_synthesize(&mut self.speech, &request);
        match (outcome.data, outcome.error) {
            (Some(data), _) => {
                self.state.audio_data_uri = Some(data.audio_data_uri);
                self.state.show_player = true;
                Notice::success(
                    "Song Synthesized!",
                    "Your Malayalam lyrics are ready to be played.",
                )
            }
            (None, error) => Notice::error(
                "Synthesis Failed",
                error.unwrap_or_else(|| "An unknown error occurred during synthesis.".into()),
            ),
        }
    }

    /// Use an uploaded WAV file as the karaoke backing track.
    pub fn load_custom_track(&mut self, name: &str, bytes: &[u8]) -> Notice {
        match probe_track(bytes) {
            Ok(info) => {
                self.state.custom_track = Some(CustomTrack {
                    name: name.to_string(),
                    data_uri: wav_data_uri(bytes),
                    info,
                });
                self.state.show_player = true;
                Notice::success("Audio Loaded", format!("{name} is ready for karaoke."))
            }
            Err(e) => {
                log::warn!("Rejected uploaded track {name}: {e}");
                Notice::error("Unsupported File", "Please upload a valid WAV audio file.")
            }
        }
    }

    /// Leave the player to edit lyrics and voice again.
    pub fn edit(&mut self) {
        self.state.show_player = false;
        self.state.custom_track = None;
        self.karaoke.handle(&PlaybackEvent::Pause);
    }

    pub fn set_tab(&mut self, tab: LyricsTab) {
        self.state.active_tab = tab;
        self.sync_line_count();
    }

    /// Feed a playback event from the player into the karaoke view.
    pub fn on_playback(&mut self, event: &PlaybackEvent) -> Option<ScrollRequest> {
        self.karaoke.handle(event)
    }

    fn sync_line_count(&mut self) {
        let count = self.state.displayed_lyrics().len();
        if count != self.karaoke.line_count() {
            self.karaoke.set_line_count(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::karaoke::KaraokeState;
    use crate::playback::PlaybackClock;
    use crate::synthesis::{BackendError, SpeechMedia};
    use crate::wav::{encode_wav, PcmFormat};

    struct FakeTranslator;

    impl TranslationBackend for FakeTranslator {
        fn name(&self) -> &str {
            "fake"
        }

        fn complete(&mut self, _prompt: &str) -> std::result::Result<String, BackendError> {
            Ok("വരി ഒന്ന്\nവരി രണ്ട്\n\nവരി മൂന്ന്".to_string())
        }
    }

    #[derive(Default)]
    struct FakeSpeech {
        last_prompt: Option<String>,
    }

    impl SpeechBackend for FakeSpeech {
        fn name(&self) -> &str {
            "fake"
        }

        fn generate_speech(
            &mut self,
            prompt: &str,
            _voice: VoiceStyle,
        ) -> std::result::Result<Option<SpeechMedia>, BackendError> {
            self.last_prompt = Some(prompt.to_string());
            Ok(Some(SpeechMedia {
                mime_type: "audio/L16;rate=24000".to_string(),
                data: vec![0; 480],
            }))
        }
    }

    fn app() -> MelodiaLingua<FakeTranslator, FakeSpeech> {
        MelodiaLingua::new(FakeTranslator, FakeSpeech::default())
    }

    #[test]
    fn translate_requires_lyrics() {
        let mut app = app();
        let notice = app.translate();
        assert!(notice.is_error());
        assert_eq!(notice.description, "Please enter some English lyrics to translate.");
    }

    #[test]
    fn translate_then_synthesize_shows_player() {
        let mut app = app();
        assert!(app.choose_song("Row, Row, Row Your Boat"));
        assert_eq!(app.state().selected_voice, VoiceStyle::Alnilam);

        assert!(!app.translate().is_error());
        assert_eq!(app.karaoke().line_count(), 3);

        app.set_make_duet(true);
        let notice = app.synthesize();
        assert_eq!(notice.title, "Song Synthesized!");
        assert!(app.state().show_player);
        assert!(app
            .state()
            .player_source()
            .unwrap()
            .starts_with("data:audio/wav;base64,"));
        assert!(app.speech.last_prompt.as_deref().unwrap().starts_with("<speak>"));
    }

    #[test]
    fn tab_switch_changes_line_count() {
        let mut app = app();
        app.choose_song("Row, Row, Row Your Boat");
        app.translate();
        app.set_tab(LyricsTab::Original);
        assert_eq!(app.karaoke().line_count(), 4);
        app.set_tab(LyricsTab::Translated);
        assert_eq!(app.karaoke().line_count(), 3);
    }

    #[test]
    fn karaoke_follows_playback_and_edit_resets() {
        let mut app = app();
        app.choose_song("Row, Row, Row Your Boat");
        app.translate();
        app.synthesize();

        app.on_playback(&PlaybackEvent::Play);
        let clock = PlaybackClock::new(9.0, Some(10.0));
        let scroll = app.on_playback(&PlaybackEvent::TimeUpdate(clock));
        assert_eq!(scroll.map(|r| r.line), Some(2));

        app.edit();
        assert!(!app.state().show_player);
        assert_eq!(app.karaoke().state(), KaraokeState::Idle);
    }

    #[test]
    fn uploaded_track_overrides_synthesized_audio() {
        let mut app = app();
        app.set_malayalam_lyrics("ഒന്ന്");
        app.synthesize();

        let wav = encode_wav(&vec![0u8; 96000], PcmFormat::default()).unwrap();
        let notice = app.load_custom_track("backing.wav", &wav);
        assert_eq!(notice.description, "backing.wav is ready for karaoke.");
        let track = app.state().custom_track.as_ref().unwrap();
        assert!((track.info.duration_secs - 2.0).abs() < 1e-9);
        assert_eq!(app.state().player_source(), Some(track.data_uri.as_str()));

        let rejected = app.load_custom_track("notes.txt", b"hello");
        assert_eq!(rejected.title, "Unsupported File");
    }
}
