use derive_builder::Builder;

/// Identifier for an utterance handed to the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

/// Handle for a scheduled inter-segment delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// One segment's worth of speech, carrying the session's resolved voice and
/// current parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice_id: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Options for a single `speak` call.
#[derive(Debug, Clone, Default, Builder)]
#[builder(default)]
pub struct SpeakOptions {
    /// Target language tag, e.g. set when speaking a translation. When
    /// present, voice resolution starts with a language match instead of
    /// the user-selected voice.
    #[builder(setter(into, strip_option))]
    pub language: Option<String>,
    /// Whether the text came from a selection rather than the full document.
    pub from_selection: bool,
}

/// Events the host engine delivers for an utterance it was handed.
#[derive(Debug, Clone, PartialEq)]
pub enum UtteranceEvent {
    /// Synthesis of the utterance began.
    Started(UtteranceId),
    /// The engine reached the word starting at `char_index` (relative to
    /// the utterance's own text, in characters).
    Boundary {
        id: UtteranceId,
        char_index: usize,
    },
    /// The utterance finished playing.
    Finished(UtteranceId),
    /// Synthesis failed mid-utterance.
    Error { id: UtteranceId, reason: String },
}

/// The host platform's speech synthesizer.
///
/// The session drives playback exclusively through this seam: it enqueues
/// utterances one at a time and schedules the inter-segment delay through
/// the engine's timer facility so the host event loop owns all deferred
/// work. Utterance and timer ids must not be reused for the lifetime of a
/// session; the session relies on that to ignore events from superseded
/// utterances and cancelled timers. Events come back through
/// [`PlaybackSession::on_engine_event`](super::session::PlaybackSession::on_engine_event)
/// and
/// [`PlaybackSession::on_timer_elapsed`](super::session::PlaybackSession::on_timer_elapsed).
pub trait SpeechEngine {
    /// Hand an utterance to the engine; playback starts as soon as the
    /// engine is free.
    fn speak(&mut self, utterance: &Utterance) -> UtteranceId;

    /// Cancel all queued and in-flight utterances.
    fn cancel(&mut self);

    /// Pause the current utterance.
    fn pause(&mut self);

    /// Resume a paused utterance.
    fn resume(&mut self);

    /// Whether the engine is currently paused.
    fn is_paused(&self) -> bool;

    /// Schedule a one-shot timer; the host calls back `on_timer_elapsed`
    /// with the returned handle.
    fn set_timer(&mut self, delay_ms: u32) -> TimerId;

    /// Cancel a scheduled timer. Must be safe to call with an already-fired
    /// handle.
    fn clear_timer(&mut self, timer: TimerId);
}

/// A command the [`RecordingEngine`] received, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Speak {
        id: UtteranceId,
        text: String,
        voice_id: Option<String>,
    },
    Cancel,
    Pause,
    Resume,
    SetTimer { id: TimerId, delay_ms: u32 },
    ClearTimer(TimerId),
}

/// In-memory engine that records every command it receives.
///
/// Intended for tests and demos: drive a session against it, then replay
/// the command log as engine events by hand.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    commands: Vec<EngineCommand>,
    next_utterance: u64,
    next_timer: u64,
    paused: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command received so far, in order.
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Ids of all utterances handed to `speak`, in order.
    pub fn spoken_ids(&self) -> Vec<UtteranceId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                EngineCommand::Speak { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl SpeechEngine for RecordingEngine {
    fn speak(&mut self, utterance: &Utterance) -> UtteranceId {
        let id = UtteranceId(self.next_utterance);
        self.next_utterance += 1;
        self.commands.push(EngineCommand::Speak {
            id,
            text: utterance.text.clone(),
            voice_id: utterance.voice_id.clone(),
        });
        id
    }

    fn cancel(&mut self) {
        self.paused = false;
        self.commands.push(EngineCommand::Cancel);
    }

    fn pause(&mut self) {
        self.paused = true;
        self.commands.push(EngineCommand::Pause);
    }

    fn resume(&mut self) {
        self.paused = false;
        self.commands.push(EngineCommand::Resume);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_timer(&mut self, delay_ms: u32) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.commands.push(EngineCommand::SetTimer { id, delay_ms });
        id
    }

    fn clear_timer(&mut self, timer: TimerId) {
        self.commands.push(EngineCommand::ClearTimer(timer));
    }
}
