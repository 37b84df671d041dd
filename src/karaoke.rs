//! Karaoke line highlighting driven by playback time.
//!
//! Lines are assumed to be spread evenly across the track: the highlighted
//! line is `floor(current_time / duration * line_count)`. The synchronizer only
//! asks for a scroll when that index actually changes, so it can be fed every
//! `timeupdate` tick.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::playback::{
    PlaybackClock, PlaybackEmitter, PlaybackEvent, PlaybackEventKind, SubscriptionId,
};

/// Index of the line to highlight, or `None` if nothing can be computed.
///
/// The boundary `current_time == duration` maps to the last line.
pub fn line_index_at(current_time: f64, duration: f64, line_count: usize) -> Option<usize> {
    if line_count == 0 || !duration.is_finite() || duration <= 0.0 || current_time.is_nan() {
        return None;
    }
    let progress = (current_time / duration).max(0.0);
    let index = (progress * line_count as f64).floor() as usize;
    Some(index.min(line_count - 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KaraokeState {
    /// Not playing; nothing highlighted.
    Idle,
    /// Playing, waiting for the first time update.
    Armed,
    /// Highlighting the given line.
    Tracking(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
}

/// Request to bring a lyric line into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub line: usize,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollRequest {
    fn center(line: usize) -> Self {
        Self {
            line,
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Center,
        }
    }
}

/// Receives scroll requests, typically a list view in the host UI.
pub trait LineScroller {
    fn scroll_to_line(&mut self, request: ScrollRequest);
}

impl<F: FnMut(ScrollRequest)> LineScroller for F {
    fn scroll_to_line(&mut self, request: ScrollRequest) {
        self(request)
    }
}

/// Maps playback events to the highlighted lyric line.
#[derive(Debug, Clone)]
pub struct KaraokeSynchronizer {
    line_count: usize,
    duration: Option<f64>,
    state: KaraokeState,
}

impl KaraokeSynchronizer {
    pub fn new(line_count: usize) -> Self {
        Self {
            line_count,
            duration: None,
            state: KaraokeState::Idle,
        }
    }

    pub fn state(&self) -> KaraokeState {
        self.state
    }

    /// Highlighted line, `-1` when none.
    pub fn current_line_index(&self) -> isize {
        match self.state {
            KaraokeState::Tracking(line) => line as isize,
            KaraokeState::Idle | KaraokeState::Armed => -1,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Duration learned from `loadedmetadata`, if any.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Switch to a lyric document with `line_count` lines.
    pub fn set_line_count(&mut self, line_count: usize) {
        self.line_count = line_count;
        self.state = match self.state {
            _ if line_count == 0 => KaraokeState::Idle,
            KaraokeState::Tracking(line) if line >= line_count => KaraokeState::Armed,
            other => other,
        };
    }

    /// Apply one playback event. Returns a scroll request when the highlighted
    /// line changed.
    pub fn handle(&mut self, event: &PlaybackEvent) -> Option<ScrollRequest> {
        match *event {
            PlaybackEvent::Play => {
                if self.line_count > 0 && self.state == KaraokeState::Idle {
                    self.state = KaraokeState::Armed;
                }
                None
            }
            PlaybackEvent::Pause | PlaybackEvent::Ended => {
                if self.state != KaraokeState::Idle {
                    log::debug!("Karaoke reset on {:?}", event.kind());
                    self.state = KaraokeState::Idle;
                }
                None
            }
            PlaybackEvent::LoadedMetadata { duration } => {
                if duration.is_finite() && duration > 0.0 {
                    self.duration = Some(duration);
                }
                None
            }
            PlaybackEvent::TimeUpdate(clock) => self.tick(clock),
        }
    }

    fn tick(&mut self, clock: PlaybackClock) -> Option<ScrollRequest> {
        if self.state == KaraokeState::Idle {
            return None;
        }
        if let Some(duration) = clock.usable_duration() {
            self.duration = Some(duration);
        }
        let duration = self.duration?;
        let line = line_index_at(clock.current_time, duration, self.line_count)?;

        if self.state == KaraokeState::Tracking(line) {
            return None;
        }
        self.state = KaraokeState::Tracking(line);
        Some(ScrollRequest::center(line))
    }
}

/// A synchronizer wired to a [`PlaybackEmitter`].
///
/// Scroll requests are forwarded to the scroller as they occur. Call
/// [`KaraokeBinding::detach`] before the emitter's asset is replaced.
pub struct KaraokeBinding {
    synchronizer: Rc<RefCell<KaraokeSynchronizer>>,
    subscriptions: Vec<SubscriptionId>,
}

impl KaraokeBinding {
    pub fn attach<S>(
        emitter: &mut PlaybackEmitter,
        synchronizer: KaraokeSynchronizer,
        scroller: S,
    ) -> Self
    where
        S: LineScroller + 'static,
    {
        let synchronizer = Rc::new(RefCell::new(synchronizer));
        let scroller = Rc::new(RefCell::new(scroller));

        let subscriptions = PlaybackEventKind::ALL
            .iter()
            .map(|&kind| {
                let sync = Rc::clone(&synchronizer);
                let scroller = Rc::clone(&scroller);
                emitter.subscribe(kind, move |event| {
                    let request = sync.borrow_mut().handle(event);
                    if let Some(request) = request {
                        scroller.borrow_mut().scroll_to_line(request);
                    }
                })
            })
            .collect();

        Self {
            synchronizer,
            subscriptions,
        }
    }

    pub fn state(&self) -> KaraokeState {
        self.synchronizer.borrow().state()
    }

    pub fn current_line_index(&self) -> isize {
        self.synchronizer.borrow().current_line_index()
    }

    pub fn set_line_count(&self, line_count: usize) {
        self.synchronizer.borrow_mut().set_line_count(line_count);
    }

    /// Remove every subscription made by [`KaraokeBinding::attach`].
    pub fn detach(self, emitter: &mut PlaybackEmitter) -> KaraokeSynchronizer {
        for id in &self.subscriptions {
            emitter.unsubscribe(*id);
        }
        Rc::try_unwrap(self.synchronizer)
            .map(RefCell::into_inner)
            .unwrap_or_else(|shared| shared.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(time: f64, duration: f64) -> PlaybackEvent {
        PlaybackEvent::TimeUpdate(PlaybackClock::new(time, Some(duration)))
    }

    #[test]
    fn index_examples() {
        assert_eq!(line_index_at(7.5, 10.0, 4), Some(3));
        assert_eq!(line_index_at(10.0, 10.0, 4), Some(3));
        assert_eq!(line_index_at(0.0, 10.0, 4), Some(0));
        assert_eq!(line_index_at(2.49, 10.0, 4), Some(0));
        assert_eq!(line_index_at(2.5, 10.0, 4), Some(1));
    }

    #[test]
    fn index_is_bounded_over_the_whole_track() {
        for line_count in 1..=13usize {
            let duration = 37.3;
            let mut t = 0.0;
            let mut last = 0;
            while t <= duration {
                let index = line_index_at(t, duration, line_count).unwrap();
                assert!(index < line_count);
                assert!(index >= last);
                last = index;
                t += 0.05;
            }
            assert_eq!(line_index_at(duration, duration, line_count), Some(line_count - 1));
        }
    }

    #[test]
    fn index_needs_lines_and_duration() {
        assert_eq!(line_index_at(1.0, 10.0, 0), None);
        assert_eq!(line_index_at(1.0, 0.0, 4), None);
        assert_eq!(line_index_at(1.0, -3.0, 4), None);
        assert_eq!(line_index_at(1.0, f64::NAN, 4), None);
        assert_eq!(line_index_at(1.0, f64::INFINITY, 4), None);
    }

    #[test]
    fn play_then_tick_tracks_and_scrolls_once_per_line() {
        let mut sync = KaraokeSynchronizer::new(4);
        assert_eq!(sync.current_line_index(), -1);

        assert_eq!(sync.handle(&PlaybackEvent::Play), None);
        assert_eq!(sync.state(), KaraokeState::Armed);
        assert_eq!(sync.current_line_index(), -1);

        let first = sync.handle(&tick(0.1, 10.0)).unwrap();
        assert_eq!(first.line, 0);
        assert_eq!(first.behavior, ScrollBehavior::Smooth);
        assert_eq!(first.block, ScrollBlock::Center);

        assert_eq!(sync.handle(&tick(0.2, 10.0)), None);
        assert_eq!(sync.handle(&tick(2.4, 10.0)), None);
        assert_eq!(sync.handle(&tick(2.6, 10.0)).map(|r| r.line), Some(1));
        assert_eq!(sync.handle(&tick(7.5, 10.0)).map(|r| r.line), Some(3));
        assert_eq!(sync.current_line_index(), 3);
    }

    #[test]
    fn pause_and_end_reset_to_idle() {
        for stop in [PlaybackEvent::Pause, PlaybackEvent::Ended] {
            let mut sync = KaraokeSynchronizer::new(4);
            sync.handle(&PlaybackEvent::Play);
            sync.handle(&tick(5.0, 10.0));
            assert_eq!(sync.state(), KaraokeState::Tracking(2));

            sync.handle(&stop);
            assert_eq!(sync.state(), KaraokeState::Idle);
            assert_eq!(sync.current_line_index(), -1);

            // Repeated stops are no-ops and ticks while idle are ignored.
            sync.handle(&PlaybackEvent::Pause);
            assert_eq!(sync.handle(&tick(6.0, 10.0)), None);
            assert_eq!(sync.current_line_index(), -1);
        }
    }

    #[test]
    fn zero_lines_never_leaves_idle() {
        let mut sync = KaraokeSynchronizer::new(0);
        sync.handle(&PlaybackEvent::LoadedMetadata { duration: 10.0 });
        sync.handle(&PlaybackEvent::Play);
        for t in [0.0, 5.0, 10.0] {
            assert_eq!(sync.handle(&tick(t, 10.0)), None);
        }
        assert_eq!(sync.state(), KaraokeState::Idle);
        assert_eq!(sync.current_line_index(), -1);
    }

    #[test]
    fn unknown_duration_keeps_previous_state() {
        let mut sync = KaraokeSynchronizer::new(3);
        sync.handle(&PlaybackEvent::Play);
        assert_eq!(
            sync.handle(&PlaybackEvent::TimeUpdate(PlaybackClock::new(1.0, None))),
            None
        );
        assert_eq!(sync.state(), KaraokeState::Armed);

        sync.handle(&PlaybackEvent::LoadedMetadata { duration: 9.0 });
        let request = sync.handle(&PlaybackEvent::TimeUpdate(PlaybackClock::new(4.0, None)));
        assert_eq!(request.map(|r| r.line), Some(1));
    }

    #[test]
    fn unusable_clock_durations_keep_the_known_one() {
        let mut sync = KaraokeSynchronizer::new(4);
        sync.handle(&PlaybackEvent::LoadedMetadata { duration: 10.0 });
        sync.handle(&PlaybackEvent::Play);

        for bogus in [f64::NAN, 0.0, -1.0, f64::INFINITY] {
            assert_eq!(
                sync.handle(&PlaybackEvent::TimeUpdate(PlaybackClock::new(5.0, Some(bogus)))),
                Some(ScrollRequest::center(2))
            );
            assert_eq!(sync.duration(), Some(10.0));
            sync.handle(&PlaybackEvent::Pause);
            sync.handle(&PlaybackEvent::Play);
        }

        let request = sync.handle(&PlaybackEvent::TimeUpdate(PlaybackClock::new(7.5, None)));
        assert_eq!(request.map(|r| r.line), Some(3));
    }

    #[test]
    fn unusable_metadata_duration_is_ignored() {
        let mut sync = KaraokeSynchronizer::new(2);
        sync.handle(&PlaybackEvent::LoadedMetadata { duration: 4.0 });
        sync.handle(&PlaybackEvent::LoadedMetadata { duration: f64::NAN });
        assert_eq!(sync.duration(), Some(4.0));

        sync.handle(&PlaybackEvent::Play);
        let request = sync.handle(&PlaybackEvent::TimeUpdate(PlaybackClock::new(3.0, None)));
        assert_eq!(request.map(|r| r.line), Some(1));
    }

    #[test]
    fn shrinking_the_document_rearms() {
        let mut sync = KaraokeSynchronizer::new(8);
        sync.handle(&PlaybackEvent::Play);
        sync.handle(&tick(9.0, 10.0));
        assert_eq!(sync.state(), KaraokeState::Tracking(7));

        sync.set_line_count(4);
        assert_eq!(sync.state(), KaraokeState::Armed);
        assert_eq!(sync.handle(&tick(9.1, 10.0)).map(|r| r.line), Some(3));

        sync.set_line_count(0);
        assert_eq!(sync.state(), KaraokeState::Idle);
    }

    #[test]
    fn binding_forwards_scrolls_and_detaches() {
        let scrolled = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&scrolled);

        let mut emitter = PlaybackEmitter::new();
        let binding = KaraokeBinding::attach(
            &mut emitter,
            KaraokeSynchronizer::new(2),
            move |request: ScrollRequest| sink.borrow_mut().push(request.line),
        );
        assert_eq!(emitter.listener_count(), PlaybackEventKind::ALL.len());

        emitter.emit(PlaybackEvent::LoadedMetadata { duration: 4.0 });
        emitter.emit(PlaybackEvent::Play);
        for t in [0.0, 0.5, 1.0, 2.0, 3.5, 4.0] {
            emitter.emit(PlaybackEvent::TimeUpdate(PlaybackClock::new(t, Some(4.0))));
        }
        assert_eq!(binding.current_line_index(), 1);
        emitter.emit(PlaybackEvent::Ended);
        assert_eq!(binding.current_line_index(), -1);

        let sync = binding.detach(&mut emitter);
        assert_eq!(emitter.listener_count(), 0);
        assert_eq!(sync.state(), KaraokeState::Idle);
        assert_eq!(*scrolled.borrow(), vec![0, 1]);
    }
}
