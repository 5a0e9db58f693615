use std::cell::RefCell;

use reader_tts::playback::{
    EngineCommand, PlaybackSession, ReaderEvent, ReaderEventSink, RecordingEngine, SpeakOptions,
};
use reader_tts::prefs::MemoryPrefStore;
use reader_tts::voice::{SpeechParameterOptimizer, SpeechParams, VoiceQualityAnalyzer};
use reader_tts::{GenderPreference, Voice, VoiceCatalog};

/// Prints session events, resolving highlight indices back to words.
#[derive(Default)]
struct StdoutSink {
    tokens: RefCell<Vec<String>>,
}

impl ReaderEventSink for StdoutSink {
    fn on_event(&self, event: ReaderEvent) {
        match event {
            ReaderEvent::Status { text, .. } => println!("  status: {text}"),
            ReaderEvent::StateChanged(state) => println!("  state:  {state:?}"),
            ReaderEvent::TokensRendered(tokens) => {
                *self.tokens.borrow_mut() = tokens.into_iter().map(|t| t.text).collect();
            }
            ReaderEvent::ActiveToken(index) => {
                let tokens = self.tokens.borrow();
                let word = tokens.get(index).map(String::as_str).unwrap_or("?");
                println!("  highlight: [{index}] {word:?}");
            }
            ReaderEvent::HighlightCleared => {}
            ReaderEvent::VoiceSwitched { name, .. } => println!("  voice switched: {name}"),
        }
    }
}

fn sample_voices() -> Vec<Voice> {
    vec![
        Voice::new("urn:samantha", "Samantha", "en-US"),
        Voice::new("urn:daniel", "Daniel Compact", "en-GB"),
        Voice::new("urn:joanna", "Joanna Neural", "en-US"),
        Voice::new("urn:amelie", "Amelie", "fr-FR"),
    ]
}

/// Character offsets of each word start, for simulated boundary events.
fn word_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut prev_ws = true;
    for (i, c) in text.chars().enumerate() {
        if !c.is_whitespace() && prev_ws {
            offsets.push(i);
        }
        prev_ws = c.is_whitespace();
    }
    offsets
}

/// Replay recorded engine commands back into the session as events until
/// playback runs dry, standing in for a real host synthesizer.
fn pump(session: &mut PlaybackSession<RecordingEngine>) {
    let mut batch = session.engine_mut().take_commands();
    while !batch.is_empty() {
        for command in batch {
            match command {
                EngineCommand::Speak { id, text, .. } => {
                    session.on_engine_event(reader_tts::UtteranceEvent::Started(id));
                    for char_index in word_offsets(&text) {
                        session.on_engine_event(reader_tts::UtteranceEvent::Boundary {
                            id,
                            char_index,
                        });
                    }
                    session.on_engine_event(reader_tts::UtteranceEvent::Finished(id));
                }
                EngineCommand::SetTimer { id, .. } => session.on_timer_elapsed(id),
                _ => {}
            }
        }
        batch = session.engine_mut().take_commands();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut catalog = VoiceCatalog::new("en");
    catalog.set_voices(sample_voices());

    println!("Voice quality ranking:");
    let mut analyzer = VoiceQualityAnalyzer::new();
    for analysis in analyzer.rank_voices(catalog.voices()) {
        println!(
            "  {:20} score {:3} ({:?}, {})",
            analysis.name,
            analysis.quality_score,
            analysis.characteristics.gender,
            analysis.characteristics.accent
        );
    }

    let optimizer = SpeechParameterOptimizer::new();
    let tuned = optimizer.optimize_for_clarity(
        SpeechParams {
            rate: 1.8,
            ..Default::default()
        },
        None,
    );
    println!("Optimizer: rate 1.8 tuned to {:.1}", tuned.rate);

    let mut session = PlaybackSession::new(
        RecordingEngine::new(),
        catalog,
        Box::new(MemoryPrefStore::new()),
        Box::new(StdoutSink::default()),
    );
    session.preferences_mut().gender_preference = GenderPreference::Female;
    session.preferences_mut().segment_delay_ms = 150;

    println!("\nReading with a female-preferred voice:");
    session.speak(
        "Hello - welcome to the reader demo. It splits text into segments, \
         picks a voice, and highlights each word as the engine reaches it.",
        &SpeakOptions::default(),
    )?;
    pump(&mut session);

    println!("\nReading a translation with a language override:");
    let options = reader_tts::playback::SpeakOptionsBuilder::default()
        .language("fr")
        .build()?;
    session.speak("Bonjour tout le monde.", &options)?;
    pump(&mut session);

    Ok(())
}
