//! # reader-tts
//!
//! The speech playback pipeline of a text-to-speech reading tool.
//!
//! ## Features
//!
//! - **Text pipeline**: normalization, sentence segmentation bounded by
//!   rate/delay, lossless word tokenization for highlighting
//! - **Voice selection**: gender and quality heuristics over the host
//!   platform's voice list, with strict and relaxed matching
//! - **Playback session**: event-driven pause/resume/stop state machine
//!   with boundary-synchronized word highlighting
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! reader-tts = "0.3"
//! ```
//!
//! ```ignore
//! use reader_tts::playback::{LogEventSink, PlaybackSession, SpeakOptions};
//! use reader_tts::prefs::MemoryPrefStore;
//! use reader_tts::voice::VoiceCatalog;
//!
//! let mut catalog = VoiceCatalog::new("en");
//! catalog.set_voices(host_voices()); // from the platform's voice list
//!
//! let mut session = PlaybackSession::new(
//!     host_engine(),                 // your SpeechEngine implementation
//!     catalog,
//!     Box::new(MemoryPrefStore::new()),
//!     Box::new(LogEventSink),
//! );
//! session.speak("Hello world. This is a test!", &SpeakOptions::default())?;
//! // ...then deliver engine events via session.on_engine_event(...)
//! # Ok::<(), reader_tts::playback::PlaybackError>(())
//! ```

pub mod dictation;
pub mod playback;
pub mod prefs;
pub mod services;
pub mod store;
pub mod text;
pub mod voice;

pub use playback::{
    PlaybackError, PlaybackSession, PlaybackState, ReaderEvent, ReaderEventSink, SpeakOptions,
    SpeechEngine, StatusLevel, UtteranceEvent,
};
pub use prefs::{PrefStore, UserPreferences};
pub use text::{normalize, split_into_segments, tokenize, Segment, SegmentOptions, Token};
pub use voice::{
    Gender, GenderPreference, SpeechParameterOptimizer, SpeechParams, Voice, VoiceAnalysis,
    VoiceCatalog, VoiceQualityAnalyzer,
};
