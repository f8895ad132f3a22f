use std::sync::{Arc, Mutex};
use std::time::Duration;

use speak_lite::driver::{DriverCall, DummyDriver, Journal};
use speak_lite::tts::{Event, Pitch, Rate, VoiceGender, VoiceSelector, Volume};
use speak_lite::{Engine, Error};

fn engine_with(driver: DummyDriver) -> (Engine, Journal) {
    let journal = driver.journal();
    (Engine::new(Box::new(driver)), journal)
}

fn record_events(engine: &mut Engine) -> Arc<Mutex<Vec<Event>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    engine.connect(move |event: &Event| sink.lock().unwrap().push(event.clone()));
    events
}

#[test]
fn test_script_round_trip() {
    let (mut engine, journal) = engine_with(DummyDriver::new());

    let voices = engine.voices().unwrap();
    assert!(voices.iter().any(|voice| voice.id == "brazil"));

    engine.set_voice("brazil");
    engine.set_rate(120);
    engine.set_volume(1.0);
    engine.say("amador");
    engine.say("programa");
    assert!(journal.calls().is_empty());
    assert_eq!(engine.pending(), 5);

    engine.run_and_wait().unwrap();

    assert_eq!(
        journal.calls(),
        vec![
            DriverCall::SetVoice("brazil".to_string()),
            DriverCall::SetRate(Rate::new(120)),
            DriverCall::SetVolume(Volume::new(1.0)),
            DriverCall::Speak("amador".to_string()),
            DriverCall::Speak("programa".to_string()),
        ]
    );
    assert_eq!(engine.pending(), 0);
    assert_eq!(engine.voice().unwrap().unwrap().id, "brazil");
    assert_eq!(engine.rate().unwrap(), Rate::new(120));
    assert_eq!(engine.volume().unwrap(), Volume::new(1.0));
}

#[test]
fn test_properties_apply_in_queue_order() {
    let (mut engine, journal) = engine_with(DummyDriver::new());

    engine.say("before");
    engine.set_pitch(70);
    engine.say("after");

    assert_eq!(engine.pitch().unwrap(), Pitch::default());
    engine.run_and_wait().unwrap();
    assert_eq!(
        journal.calls(),
        vec![
            DriverCall::Speak("before".to_string()),
            DriverCall::SetPitch(Pitch::new(70)),
            DriverCall::Speak("after".to_string()),
        ]
    );
    assert_eq!(engine.pitch().unwrap(), Pitch::new(70));
}

#[test]
fn test_events_follow_each_utterance() {
    let (mut engine, _) = engine_with(DummyDriver::new());
    let events = record_events(&mut engine);

    engine.say_named("hello world", "greeting");
    engine.say("bye");
    engine.run_and_wait().unwrap();

    let greeting = Some("greeting".to_string());
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            Event::StartedUtterance {
                name: greeting.clone(),
            },
            Event::StartedWord {
                name: greeting.clone(),
                location: 0,
                length: 5,
            },
            Event::StartedWord {
                name: greeting.clone(),
                location: 6,
                length: 5,
            },
            Event::FinishedUtterance {
                name: greeting,
                completed: true,
            },
            Event::StartedUtterance {
                name: None,
            },
            Event::StartedWord {
                name: None,
                location: 0,
                length: 3,
            },
            Event::FinishedUtterance {
                name: None,
                completed: true,
            },
        ]
    );
}

#[test]
fn test_unknown_voice_ends_the_run() {
    let (mut engine, journal) = engine_with(DummyDriver::new());
    let events = record_events(&mut engine);

    engine.set_voice("klingon");
    engine.say("never spoken");

    match engine.run_and_wait() {
        Err(Error::UnknownVoice(query)) => assert_eq!(query, "klingon"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(journal.spoken().is_empty());
    assert_eq!(engine.pending(), 0);
    assert!(matches!(events.lock().unwrap()[..], [Event::Error { name: None, .. }]));

    // The engine is still usable afterwards.
    engine.say("spoken");
    engine.run_and_wait().unwrap();
    assert_eq!(journal.spoken(), ["spoken"]);
}

#[test]
fn test_engine_errors_are_surfaced() {
    let mut driver = DummyDriver::new();
    driver.fail_next("audio device unplugged");
    let (mut engine, journal) = engine_with(driver);
    let events = record_events(&mut engine);

    engine.say_named("first", "one");
    engine.say("second");
    let err = engine.run_and_wait().unwrap_err();
    assert!(err.to_string().contains("audio device unplugged"));
    assert_eq!(journal.spoken(), ["first"]);

    let events = events.lock().unwrap();
    let one = Some("one".to_string());
    assert_eq!(
        events[1..],
        [
            Event::Error {
                name: one.clone(),
                message: err.to_string(),
            },
            Event::FinishedUtterance {
                name: one,
                completed: false,
            },
        ]
    );
}

#[test]
fn test_stop_from_handler_discards_the_rest() {
    let (mut engine, journal) = engine_with(DummyDriver::new());
    let stop = engine.stop_handle();
    engine.connect(move |event: &Event| {
        if let Event::FinishedUtterance { .. } = event {
            stop.stop();
        }
    });

    engine.say("one");
    engine.say("two");
    engine.say("three");
    engine.run_and_wait().unwrap();

    assert_eq!(journal.spoken(), ["one"]);
    assert_eq!(engine.pending(), 0);
}

#[test]
fn test_stop_from_another_thread_interrupts_speech() {
    let driver = DummyDriver::new().word_delay(Duration::from_millis(20));
    let (mut engine, journal) = engine_with(driver);
    let events = record_events(&mut engine);
    let stop = engine.stop_handle();
    assert!(!stop.is_busy());

    let long_text = vec!["word"; 200].join(" ");
    engine.say(long_text);
    engine.say("never spoken");

    let stopper = std::thread::spawn(move || {
        while !stop.is_busy() {
            std::thread::sleep(Duration::from_millis(1));
        }
        std::thread::sleep(Duration::from_millis(50));
        stop.stop();
    });
    engine.run_and_wait().unwrap();
    stopper.join().unwrap();

    assert_eq!(journal.spoken().len(), 1);
    assert!(!engine.is_busy());
    let events = events.lock().unwrap();
    assert_eq!(
        events.last(),
        Some(&Event::FinishedUtterance {
            name: None,
            completed: false,
        })
    );
    assert!(events.len() < 200);
}

#[test]
fn test_stop_discards_queue() {
    let (mut engine, journal) = engine_with(DummyDriver::new());
    engine.say("one");
    engine.set_rate(300);
    engine.stop();
    assert_eq!(engine.pending(), 0);

    engine.say("two");
    engine.run_and_wait().unwrap();
    assert_eq!(journal.spoken(), ["two"]);
}

#[test]
fn test_disconnected_handler_is_not_called() {
    let (mut engine, _) = engine_with(DummyDriver::new());
    let events = Arc::new(Mutex::new(0));
    let counter = events.clone();
    let id = engine.connect(move |_: &Event| *counter.lock().unwrap() += 1);

    engine.say("one");
    engine.run_and_wait().unwrap();
    let seen = *events.lock().unwrap();
    assert!(seen > 0);

    assert!(engine.disconnect(id));
    assert!(!engine.disconnect(id));
    engine.say("two");
    engine.run_and_wait().unwrap();
    assert_eq!(*events.lock().unwrap(), seen);
}

#[test]
fn test_save_to_file_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speech.wav");
    let (mut engine, journal) = engine_with(DummyDriver::new());

    engine.set_rate(240);
    engine.save_to_file("amador programa", &path);
    engine.run_and_wait().unwrap();

    assert_eq!(
        journal.calls().last(),
        Some(&DriverCall::SaveToFile("amador programa".to_string(), path.clone()))
    );
    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.duration(), 8000);
}

#[test]
fn test_voices_matching_selector() {
    let (mut engine, _) = engine_with(DummyDriver::new());
    let male = engine
        .voices_matching(&VoiceSelector::new().gender_eq(VoiceGender::Male))
        .unwrap();
    assert_eq!(male.len(), 1);
    assert_eq!(male[0].id, "brazil");
    assert_eq!(engine.voices_matching(&VoiceSelector::new()).unwrap().len(), 3);
    assert_eq!(engine.driver_name(), "dummy");
}

#[test]
fn test_init_with_dummy_driver() {
    let engine = speak_lite::init(Some(speak_lite::DriverKind::Dummy)).unwrap();
    assert_eq!(engine.driver_name(), "dummy");
    assert!(!engine.is_busy());
}
