//! The playback state machine and its collaborator seams.
//!
//! [`PlaybackSession`](session::PlaybackSession) owns one playback at a
//! time. It normalizes and segments the input, resolves a voice against the
//! catalog and the user's gender preference, hands per-segment utterances
//! to the host [`SpeechEngine`](engine::SpeechEngine), and translates the
//! engine's boundary events into word-highlight updates.
//!
//! All work is cooperative and event-driven: the host delivers synthesis
//! events and timer callbacks, and the session reacts. The only deferred
//! work is the single inter-segment delay timer, which every path that ends
//! or interrupts a session must cancel.

pub mod engine;
pub mod session;

use serde::{Deserialize, Serialize};

use crate::text::Token;

pub use engine::{
    EngineCommand, RecordingEngine, SpeakOptions, SpeakOptionsBuilder, SpeechEngine, TimerId,
    Utterance, UtteranceEvent, UtteranceId,
};
pub use session::{PlaybackError, PlaybackSession};

/// Lifecycle of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Idle,
    Speaking,
    Paused,
    Stopped,
    Error,
}

/// Severity of a status update, mirroring the reader's status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Ok,
    Busy,
    Off,
}

/// Events the session reports to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderEvent {
    /// Human-readable status line update.
    Status { text: String, level: StatusLevel },
    /// The session moved to a new state.
    StateChanged(PlaybackState),
    /// Token sequence to render for highlighting. Only emitted when
    /// highlighting is enabled.
    TokensRendered(Vec<Token>),
    /// No token is highlighted anymore.
    HighlightCleared,
    /// Exactly this token is now active; any previous highlight is cleared.
    ActiveToken(usize),
    /// The session switched voices to honor the gender preference.
    VoiceSwitched { id: String, name: String },
}

/// Receives session events.
pub trait ReaderEventSink {
    fn on_event(&self, event: ReaderEvent);
}

/// Sink that drops every event.
pub struct NoopEventSink;

impl ReaderEventSink for NoopEventSink {
    fn on_event(&self, _event: ReaderEvent) {}
}

/// Sink that logs every event.
pub struct LogEventSink;

impl ReaderEventSink for LogEventSink {
    fn on_event(&self, event: ReaderEvent) {
        match &event {
            ReaderEvent::Status { text, .. } => log::info!("[reader] status: {text}"),
            ReaderEvent::StateChanged(state) => log::info!("[reader] state: {state:?}"),
            ReaderEvent::TokensRendered(tokens) => {
                log::debug!("[reader] rendered {} tokens", tokens.len());
            }
            ReaderEvent::HighlightCleared => log::debug!("[reader] highlight cleared"),
            ReaderEvent::ActiveToken(index) => log::debug!("[reader] active token {index}"),
            ReaderEvent::VoiceSwitched { name, .. } => {
                log::info!("[reader] switched voice to {name}");
            }
        }
    }
}
