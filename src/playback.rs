//! Playback events delivered by the host audio element.
//!
//! The host owns the actual audio output. It reports what happens through a
//! [`PlaybackEmitter`]; consumers subscribe to the event kinds they care about
//! and must unsubscribe when the asset they were tracking goes away.

use serde::{Deserialize, Serialize};

/// Position of a playing asset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackClock {
    /// Seconds since the start of the asset.
    pub current_time: f64,
    /// Total length in seconds; `None` until metadata has loaded.
    pub duration: Option<f64>,
}

impl PlaybackClock {
    pub fn new(current_time: f64, duration: Option<f64>) -> Self {
        Self {
            current_time,
            duration,
        }
    }

    /// Duration, if known, finite and positive.
    pub fn usable_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Playback progress as a percentage in `[0, 100]`, for a transport slider.
    pub fn progress_percent(&self) -> f64 {
        match self.usable_duration() {
            Some(duration) => (self.current_time / duration * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        }
    }

    /// Position to seek to for a slider value in percent.
    pub fn seek_position(&self, percent: f64) -> Option<f64> {
        self.usable_duration()
            .map(|duration| percent.clamp(0.0, 100.0) / 100.0 * duration)
    }
}

/// Format seconds as `m:ss`; non-finite or negative input reads `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlaybackEvent {
    Play,
    Pause,
    Ended,
    #[serde(rename = "timeupdate")]
    TimeUpdate(PlaybackClock),
    #[serde(rename = "loadedmetadata")]
    LoadedMetadata { duration: f64 },
}

impl PlaybackEvent {
    pub fn kind(&self) -> PlaybackEventKind {
        match self {
            PlaybackEvent::Play => PlaybackEventKind::Play,
            PlaybackEvent::Pause => PlaybackEventKind::Pause,
            PlaybackEvent::Ended => PlaybackEventKind::Ended,
            PlaybackEvent::TimeUpdate(_) => PlaybackEventKind::TimeUpdate,
            PlaybackEvent::LoadedMetadata { .. } => PlaybackEventKind::LoadedMetadata,
        }
    }
}

/// Named event a listener registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackEventKind {
    Play,
    Pause,
    Ended,
    TimeUpdate,
    LoadedMetadata,
}

impl PlaybackEventKind {
    pub const ALL: [PlaybackEventKind; 5] = [
        PlaybackEventKind::Play,
        PlaybackEventKind::Pause,
        PlaybackEventKind::Ended,
        PlaybackEventKind::TimeUpdate,
        PlaybackEventKind::LoadedMetadata,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlaybackEventKind::Play => "play",
            PlaybackEventKind::Pause => "pause",
            PlaybackEventKind::Ended => "ended",
            PlaybackEventKind::TimeUpdate => "timeupdate",
            PlaybackEventKind::LoadedMetadata => "loadedmetadata",
        }
    }
}

/// Handle returned by [`PlaybackEmitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PlaybackEvent)>;

/// Single-threaded event dispatcher standing in for an audio element.
#[derive(Default)]
pub struct PlaybackEmitter {
    next_id: u64,
    listeners: Vec<(SubscriptionId, PlaybackEventKind, Listener)>,
}

impl PlaybackEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: PlaybackEventKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        log::trace!("Subscribed {:?} to '{}'", id, kind.name());
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _, _)| *sid != id);
        before != self.listeners.len()
    }

    /// Deliver `event` to every listener of its kind, in subscription order.
    pub fn emit(&mut self, event: PlaybackEvent) {
        let kind = event.kind();
        for (_, listener_kind, listener) in self.listeners.iter_mut() {
            if *listener_kind == kind {
                listener(&event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
