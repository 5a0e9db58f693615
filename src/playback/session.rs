use crate::prefs::{PrefStore, UserPreferences};
use crate::text::{
    find_token_index_at_char_index, normalize, split_into_segments, tokenize, SegmentOptions,
    Token,
};
use crate::voice::{GenderPreference, Voice, VoiceCatalog};

use super::engine::{SpeakOptions, SpeechEngine, TimerId, Utterance, UtteranceEvent, UtteranceId};
use super::{PlaybackState, ReaderEvent, ReaderEventSink, StatusLevel};

/// Text spoken by [`PlaybackSession::preview_voice`].
const PREVIEW_TEXT: &str = "This is a preview of the selected voice.";

#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    /// The input was empty after trimming; nothing was queued.
    #[error("nothing to read")]
    NothingToRead,
    /// Strict gender mode is on and no voice of the required gender exists.
    /// Playback was aborted before any segment was queued.
    #[error("no {0} voices available in strict mode")]
    NoStrictVoice(GenderPreference),
}

struct QueuedUtterance {
    utterance: Utterance,
    /// Character offset of this segment within the emitted sequence; added
    /// to segment-local boundary offsets to address the token stream.
    start_offset: usize,
}

/// The playback state machine.
///
/// Owns the one active playback at a time: a new [`speak`](Self::speak)
/// call first cancels whatever was in flight. The host engine drives the
/// session by delivering [`UtteranceEvent`]s and timer callbacks; the
/// session reports back through its [`ReaderEventSink`].
///
/// The inter-segment delay timer is the only deferred work. It is cleared
/// on every path that ends or interrupts a session (stop, pause, a new
/// speak call), so a stale callback can never advance a superseded session.
pub struct PlaybackSession<E: SpeechEngine> {
    engine: E,
    catalog: VoiceCatalog,
    prefs: UserPreferences,
    prefs_store: Box<dyn PrefStore>,
    sink: Box<dyn ReaderEventSink>,
    state: PlaybackState,
    queue: Vec<QueuedUtterance>,
    /// Index of the dispatched utterance `current_id` refers to.
    position: usize,
    current_id: Option<UtteranceId>,
    pending_timer: Option<TimerId>,
    tokens: Vec<Token>,
    active_token: Option<usize>,
    preview_id: Option<UtteranceId>,
}

impl<E: SpeechEngine> PlaybackSession<E> {
    /// Create a session. Preferences are loaded from the store up front;
    /// the catalog may still be empty and can be refreshed later through
    /// [`catalog_mut`](Self::catalog_mut).
    pub fn new(
        engine: E,
        catalog: VoiceCatalog,
        prefs_store: Box<dyn PrefStore>,
        sink: Box<dyn ReaderEventSink>,
    ) -> Self {
        let prefs = UserPreferences::load(prefs_store.as_ref());
        Self {
            engine,
            catalog,
            prefs,
            prefs_store,
            sink,
            state: PlaybackState::Idle,
            queue: Vec::new(),
            position: 0,
            current_id: None,
            pending_timer: None,
            tokens: Vec::new(),
            active_token: None,
            preview_id: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Mutable catalog access, e.g. to apply a platform voices-changed
    /// signal via [`VoiceCatalog::set_voices`].
    pub fn catalog_mut(&mut self) -> &mut VoiceCatalog {
        &mut self.catalog
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.prefs
    }

    pub fn preferences_mut(&mut self) -> &mut UserPreferences {
        &mut self.prefs
    }

    /// Persist the current preferences, as done on every control change and
    /// on page unload.
    pub fn save_preferences(&mut self) {
        self.prefs.save(self.prefs_store.as_mut());
    }

    /// Number of segments not yet finished, including the one in flight.
    pub fn remaining_segments(&self) -> usize {
        self.queue.len().saturating_sub(self.position + usize::from(self.current_id.is_none()))
    }

    /// Start reading `text`, replacing any playback already in flight.
    ///
    /// Normalizes and segments the text, resolves a voice (language
    /// override first, then the selected voice checked against the gender
    /// preference), then queues one utterance per segment and dispatches
    /// the first. With strict gender mode and no matching voice the call
    /// aborts before anything is queued.
    pub fn speak(&mut self, text: &str, options: &SpeakOptions) -> Result<(), PlaybackError> {
        if text.trim().is_empty() {
            self.status("Nothing to read", StatusLevel::Off);
            return Err(PlaybackError::NothingToRead);
        }

        self.cancel_session();

        let normalized = normalize(text);
        let segment_opts = SegmentOptions {
            rate: self.prefs.rate,
            delay_ms: self.prefs.segment_delay_ms,
        };
        let segments = split_into_segments(&normalized, &segment_opts);

        let chosen = self.resolve_voice(options)?;

        self.tokens = tokenize(&normalized);
        if self.prefs.highlight_enabled {
            self.sink
                .on_event(ReaderEvent::TokensRendered(self.tokens.clone()));
        } else {
            self.sink.on_event(ReaderEvent::HighlightCleared);
        }

        let voice_id = chosen.map(|v| v.id);
        self.queue = segments
            .into_iter()
            .map(|seg| QueuedUtterance {
                utterance: Utterance {
                    text: seg.text,
                    voice_id: voice_id.clone(),
                    rate: self.prefs.rate,
                    pitch: self.prefs.pitch,
                    volume: self.prefs.volume,
                },
                start_offset: seg.start_offset,
            })
            .collect();

        if self.queue.is_empty() {
            log::debug!("no speakable segments in input");
            return Ok(());
        }
        self.dispatch(0);
        Ok(())
    }

    /// Pause playback. No-op unless currently speaking. Cancels the pending
    /// inter-segment timer so a paused session cannot silently advance.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Speaking {
            return;
        }
        self.engine.pause();
        self.clear_pending_timer();
        self.set_state(PlaybackState::Paused);
        self.status("paused", StatusLevel::Off);
    }

    /// Resume paused playback. No-op unless currently paused. When the
    /// pause landed inside the inter-segment delay there is no utterance to
    /// resume, so the next segment is dispatched directly.
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        self.engine.resume();
        self.set_state(PlaybackState::Speaking);
        self.status("speaking", StatusLevel::Busy);

        if self.current_id.is_none() {
            let next = self.position + 1;
            if next < self.queue.len() {
                self.dispatch(next);
            } else {
                self.finish_session();
            }
        }
    }

    /// Stop playback unconditionally: cancel the engine, drop the queue and
    /// any pending timer, clear highlighting.
    pub fn stop(&mut self) {
        self.cancel_session();
        self.set_state(PlaybackState::Stopped);
        self.status("stopped", StatusLevel::Off);
    }

    /// Speak a short fixed phrase with the currently selected voice,
    /// outside the segment queue.
    pub fn preview_voice(&mut self) {
        self.cancel_session();
        let voice_id = self
            .prefs
            .voice_id
            .as_deref()
            .and_then(|id| self.catalog.find_by_id(id))
            .map(|v| v.id.clone());
        let utterance = Utterance {
            text: PREVIEW_TEXT.to_string(),
            voice_id,
            rate: self.prefs.rate,
            pitch: self.prefs.pitch,
            volume: self.prefs.volume,
        };
        let id = self.engine.speak(&utterance);
        self.preview_id = Some(id);
    }

    /// Feed a synthesis event from the host engine into the state machine.
    pub fn on_engine_event(&mut self, event: UtteranceEvent) {
        match event {
            UtteranceEvent::Started(id) => self.on_started(id),
            UtteranceEvent::Boundary { id, char_index } => self.on_boundary(id, char_index),
            UtteranceEvent::Finished(id) => self.on_finished(id),
            UtteranceEvent::Error { id, reason } => self.on_error(id, &reason),
        }
    }

    /// Feed an elapsed timer callback from the host.
    ///
    /// Stale handles (from a cancelled timer that was already in flight)
    /// are ignored; the advance only happens when playback is neither
    /// session-paused nor engine-paused.
    pub fn on_timer_elapsed(&mut self, timer: TimerId) {
        if self.pending_timer != Some(timer) {
            return;
        }
        self.pending_timer = None;

        if self.state == PlaybackState::Paused || self.engine.is_paused() {
            return;
        }

        let next = self.position + 1;
        if next < self.queue.len() {
            self.dispatch(next);
        }
    }

    fn on_started(&mut self, id: UtteranceId) {
        if self.preview_id == Some(id) {
            self.status("preview", StatusLevel::Busy);
            return;
        }
        if self.current_id == Some(id) {
            self.set_state(PlaybackState::Speaking);
            self.status("speaking", StatusLevel::Busy);
        }
    }

    fn on_boundary(&mut self, id: UtteranceId, char_index: usize) {
        if !self.prefs.highlight_enabled || self.current_id != Some(id) {
            return;
        }
        let base = self.queue[self.position].start_offset;
        let Some(index) = find_token_index_at_char_index(&self.tokens, base + char_index) else {
            return;
        };
        if self.tokens[index].is_word {
            if self.active_token != Some(index) {
                self.active_token = Some(index);
                self.sink.on_event(ReaderEvent::ActiveToken(index));
            }
        } else if self.active_token.take().is_some() {
            self.sink.on_event(ReaderEvent::HighlightCleared);
        }
    }

    fn on_finished(&mut self, id: UtteranceId) {
        if self.preview_id == Some(id) {
            self.preview_id = None;
            self.status("idle", StatusLevel::Ok);
            return;
        }
        if self.current_id != Some(id) {
            return;
        }
        self.current_id = None;
        self.clear_highlight();

        let next = self.position + 1;
        if next < self.queue.len() {
            let timer = self.engine.set_timer(self.prefs.segment_delay_ms);
            self.pending_timer = Some(timer);
        } else {
            self.finish_session();
        }
    }

    fn on_error(&mut self, id: UtteranceId, reason: &str) {
        if self.preview_id == Some(id) {
            self.preview_id = None;
            self.status("preview error", StatusLevel::Off);
            return;
        }
        if self.current_id != Some(id) {
            return;
        }
        log::warn!("synthesis error: {reason}");
        self.status("error speaking", StatusLevel::Off);
        self.set_state(PlaybackState::Error);

        // Abandon the session: remaining segments are dropped, no retry.
        self.current_id = None;
        self.queue.clear();
        self.position = 0;
        self.clear_pending_timer();
        self.clear_highlight();
        self.set_state(PlaybackState::Idle);
    }

    /// Resolve the voice for this speak call.
    ///
    /// A language override looks for a prefix-matched voice and proceeds
    /// voiceless when none exists. Otherwise the user-selected voice is
    /// checked against the gender preference; a mismatch triggers a
    /// suggestion, which either switches the selection (persisted), is
    /// reported as a soft fallback, or aborts in strict mode.
    fn resolve_voice(&mut self, options: &SpeakOptions) -> Result<Option<Voice>, PlaybackError> {
        if let Some(lang) = &options.language {
            let prefix: String = lang.chars().take(2).collect();
            match self.catalog.find_by_language_prefix(&prefix) {
                Some(v) => {
                    let found = v.clone();
                    self.status(
                        format!("Using voice for language: {prefix}"),
                        StatusLevel::Ok,
                    );
                    return Ok(Some(found));
                }
                None => {
                    self.status(
                        format!("No voice found for language: {prefix}. Using default."),
                        StatusLevel::Off,
                    );
                }
            }
        }

        let mut chosen = self
            .prefs
            .voice_id
            .as_deref()
            .and_then(|id| self.catalog.find_by_id(id))
            .cloned();

        let pref = self.prefs.gender_preference;
        let strict = self.prefs.require_strict_gender;
        if pref != GenderPreference::Any {
            let matches = chosen
                .as_ref()
                .is_some_and(|v| self.catalog.matches_preference(v, pref));
            if !matches {
                match self.catalog.suggest_best_voice(pref, strict).cloned() {
                    Some(best) => {
                        self.prefs.voice_id = Some(best.id.clone());
                        self.save_preferences();
                        self.sink.on_event(ReaderEvent::VoiceSwitched {
                            id: best.id.clone(),
                            name: best.name.clone(),
                        });
                        self.status(
                            format!("Switched to {} to match {pref}", best.name),
                            StatusLevel::Ok,
                        );
                        chosen = Some(best);
                    }
                    None if strict => {
                        self.status(
                            format!("No {pref} voices available (strict mode)"),
                            StatusLevel::Off,
                        );
                        return Err(PlaybackError::NoStrictVoice(pref));
                    }
                    None => {
                        self.status(
                            format!("No {pref} voices found - using selected voice"),
                            StatusLevel::Busy,
                        );
                    }
                }
            }
        }

        Ok(chosen)
    }

    fn dispatch(&mut self, index: usize) {
        let id = self.engine.speak(&self.queue[index].utterance);
        self.position = index;
        self.current_id = Some(id);
    }

    /// Tear down the in-flight session without reporting: engine cancelled,
    /// queue and pending timer cleared. The shared path under `speak`,
    /// `stop`, and `preview_voice`.
    fn cancel_session(&mut self) {
        self.engine.cancel();
        self.clear_pending_timer();
        self.queue.clear();
        self.position = 0;
        self.current_id = None;
        self.preview_id = None;
        self.clear_highlight();
    }

    fn finish_session(&mut self) {
        self.queue.clear();
        self.position = 0;
        self.current_id = None;
        self.set_state(PlaybackState::Idle);
        self.status("idle", StatusLevel::Ok);
    }

    fn clear_pending_timer(&mut self) {
        if let Some(timer) = self.pending_timer.take() {
            self.engine.clear_timer(timer);
        }
    }

    fn clear_highlight(&mut self) {
        if self.active_token.take().is_some() && self.prefs.highlight_enabled {
            self.sink.on_event(ReaderEvent::HighlightCleared);
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.sink.on_event(ReaderEvent::StateChanged(state));
        }
    }

    fn status(&self, text: impl Into<String>, level: StatusLevel) {
        self.sink.on_event(ReaderEvent::Status {
            text: text.into(),
            level,
        });
    }
}
