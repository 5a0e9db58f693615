use std::cell::RefCell;
use std::rc::Rc;

use reader_tts::playback::{
    EngineCommand, PlaybackSession, ReaderEvent, ReaderEventSink, RecordingEngine, SpeakOptions,
    SpeechEngine, UtteranceEvent,
};
use reader_tts::prefs::MemoryPrefStore;
use reader_tts::{PlaybackState, Voice, VoiceCatalog};

#[derive(Default)]
struct CollectingSink {
    events: Rc<RefCell<Vec<ReaderEvent>>>,
}

impl ReaderEventSink for CollectingSink {
    fn on_event(&self, event: ReaderEvent) {
        self.events.borrow_mut().push(event);
    }
}

fn new_session() -> (
    PlaybackSession<RecordingEngine>,
    Rc<RefCell<Vec<ReaderEvent>>>,
) {
    let mut catalog = VoiceCatalog::new("en");
    catalog.set_voices(vec![Voice::new("urn:Samantha", "Samantha", "en-US")]);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = CollectingSink {
        events: Rc::clone(&events),
    };
    let session = PlaybackSession::new(
        RecordingEngine::new(),
        catalog,
        Box::new(MemoryPrefStore::new()),
        Box::new(sink),
    );
    (session, events)
}

fn last_timer(session: &PlaybackSession<RecordingEngine>) -> reader_tts::playback::TimerId {
    session
        .engine()
        .commands()
        .iter()
        .rev()
        .find_map(|c| match c {
            EngineCommand::SetTimer { id, .. } => Some(*id),
            _ => None,
        })
        .expect("no timer was scheduled")
}

#[test]
fn new_speak_cancels_previous_session() {
    let (mut session, _) = new_session();
    session.speak("First text. Second sentence.", &SpeakOptions::default()).unwrap();
    let first = session.engine().spoken_ids()[0];

    session.speak("Replacement.", &SpeakOptions::default()).unwrap();
    let second = *session.engine().spoken_ids().last().unwrap();
    assert_ne!(first, second);

    // The engine was cancelled between the two dispatches.
    let commands = session.engine().commands();
    let cancel_pos = commands
        .iter()
        .rposition(|c| matches!(c, EngineCommand::Cancel))
        .unwrap();
    let second_speak_pos = commands
        .iter()
        .rposition(|c| matches!(c, EngineCommand::Speak { .. }))
        .unwrap();
    assert!(cancel_pos < second_speak_pos);

    // Events for the superseded utterance are ignored entirely.
    session.on_engine_event(UtteranceEvent::Started(first));
    assert_eq!(session.state(), PlaybackState::Idle);
    session.on_engine_event(UtteranceEvent::Finished(first));
    assert_eq!(session.engine().spoken_ids().len(), 2);

    // Only the replacement drives the state machine.
    session.on_engine_event(UtteranceEvent::Started(second));
    assert_eq!(session.state(), PlaybackState::Speaking);
}

#[test]
fn stale_timer_from_previous_session_never_advances() {
    let (mut session, _) = new_session();
    session.preferences_mut().segment_delay_ms = 100;
    session.speak("One sentence. Two sentences.", &SpeakOptions::default()).unwrap();
    let first = session.engine().spoken_ids()[0];
    session.on_engine_event(UtteranceEvent::Started(first));
    session.on_engine_event(UtteranceEvent::Finished(first));
    let stale = last_timer(&session);

    session.speak("Fresh text.", &SpeakOptions::default()).unwrap();
    // The pending timer was cleared during the new speak call...
    assert!(session
        .engine()
        .commands()
        .iter()
        .any(|c| matches!(c, EngineCommand::ClearTimer(t) if *t == stale)));

    // ...and even a callback already in flight is a no-op.
    let spoken_before = session.engine().spoken_ids().len();
    session.on_timer_elapsed(stale);
    assert_eq!(session.engine().spoken_ids().len(), spoken_before);
}

#[test]
fn pause_during_delay_blocks_advance() {
    let (mut session, _) = new_session();
    session.preferences_mut().segment_delay_ms = 200;
    session.speak("Segment one. Segment two.", &SpeakOptions::default()).unwrap();
    let first = session.engine().spoken_ids()[0];
    session.on_engine_event(UtteranceEvent::Started(first));
    session.on_engine_event(UtteranceEvent::Finished(first));
    let timer = last_timer(&session);

    session.pause();
    assert_eq!(session.state(), PlaybackState::Paused);

    // The delay elapsing in the host must not dispatch segment two.
    session.on_timer_elapsed(timer);
    assert_eq!(session.engine().spoken_ids().len(), 1);
}

#[test]
fn resume_after_pause_during_delay_continues() {
    let (mut session, _) = new_session();
    session.speak("Segment one. Segment two.", &SpeakOptions::default()).unwrap();
    let first = session.engine().spoken_ids()[0];
    session.on_engine_event(UtteranceEvent::Started(first));
    session.on_engine_event(UtteranceEvent::Finished(first));

    session.pause();
    session.resume();
    assert_eq!(session.state(), PlaybackState::Speaking);
    // The second segment was dispatched by the resume.
    assert_eq!(session.engine().spoken_ids().len(), 2);
}

#[test]
fn engine_level_pause_also_blocks_timer_advance() {
    let (mut session, _) = new_session();
    session.speak("Segment one. Segment two.", &SpeakOptions::default()).unwrap();
    let first = session.engine().spoken_ids()[0];
    session.on_engine_event(UtteranceEvent::Started(first));
    session.on_engine_event(UtteranceEvent::Finished(first));
    let timer = last_timer(&session);

    // Host paused the engine behind the session's back.
    session.engine_mut().pause();
    session.on_timer_elapsed(timer);
    assert_eq!(session.engine().spoken_ids().len(), 1);
}

#[test]
fn stop_clears_queue_and_timer() {
    let (mut session, _) = new_session();
    session.speak("Segment one. Segment two. Segment three.", &SpeakOptions::default()).unwrap();
    let first = session.engine().spoken_ids()[0];
    session.on_engine_event(UtteranceEvent::Started(first));
    session.on_engine_event(UtteranceEvent::Finished(first));
    let timer = last_timer(&session);

    session.stop();
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.remaining_segments(), 0);
    assert!(session
        .engine()
        .commands()
        .iter()
        .any(|c| matches!(c, EngineCommand::ClearTimer(t) if *t == timer)));

    session.on_timer_elapsed(timer);
    assert_eq!(session.engine().spoken_ids().len(), 1);
}

#[test]
fn full_playback_reaches_idle() {
    let (mut session, events) = new_session();
    session.preferences_mut().segment_delay_ms = 50;
    session.speak("One. Two. Three.", &SpeakOptions::default()).unwrap();

    loop {
        let id = *session.engine().spoken_ids().last().unwrap();
        session.on_engine_event(UtteranceEvent::Started(id));
        session.on_engine_event(UtteranceEvent::Finished(id));
        if session.state() == PlaybackState::Idle {
            break;
        }
        let timer = last_timer(&session);
        session.on_timer_elapsed(timer);
    }

    assert_eq!(session.engine().spoken_ids().len(), 3);
    let delays: Vec<u32> = session
        .engine()
        .commands()
        .iter()
        .filter_map(|c| match c {
            EngineCommand::SetTimer { delay_ms, .. } => Some(*delay_ms),
            _ => None,
        })
        .collect();
    assert_eq!(delays, vec![50, 50]);
    assert!(events
        .borrow()
        .iter()
        .any(|e| matches!(e, ReaderEvent::StateChanged(PlaybackState::Idle))));
}

#[test]
fn highlight_follows_boundaries_across_segments() {
    let (mut session, events) = new_session();
    session.speak("Alpha beta. Gamma delta.", &SpeakOptions::default()).unwrap();
    let first = session.engine().spoken_ids()[0];
    session.on_engine_event(UtteranceEvent::Started(first));
    session.on_engine_event(UtteranceEvent::Boundary {
        id: first,
        char_index: 0,
    });
    session.on_engine_event(UtteranceEvent::Boundary {
        id: first,
        char_index: 6,
    });
    session.on_engine_event(UtteranceEvent::Finished(first));
    let timer = last_timer(&session);
    session.on_timer_elapsed(timer);

    let second = *session.engine().spoken_ids().last().unwrap();
    session.on_engine_event(UtteranceEvent::Started(second));
    session.on_engine_event(UtteranceEvent::Boundary {
        id: second,
        char_index: 0,
    });

    let highlights: Vec<usize> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            ReaderEvent::ActiveToken(i) => Some(*i),
            _ => None,
        })
        .collect();
    // "Alpha"(0), "beta."(2), then "Gamma"(4) in the second segment.
    assert_eq!(highlights, vec![0, 2, 4]);
}
