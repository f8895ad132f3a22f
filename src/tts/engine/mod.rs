use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::driver::{Driver, DriverKind, Interrupt};
use crate::tts::{Pitch, Rate, Voice, VoiceSelector, Volume};
use crate::Result;

mod command;
mod event;

use self::command::Command;
use self::event::Handlers;
pub use self::event::{Event, EventHandler, HandlerId};

/// A speech engine with a command queue.
///
/// Property changes and utterances are queued in the order they are made, and nothing reaches the
/// driver until [`run_and_wait`](Self::run_and_wait) plays the queue back. A property set before
/// an utterance is therefore always in effect when that utterance is spoken, and one set after it
/// never is. Reading a property asks the driver, so it reflects the commands that have already
/// run, not the ones still queued.
pub struct Engine {
    driver: Box<dyn Driver>,
    queue: VecDeque<Command>,
    handlers: Handlers,
    interrupt: Interrupt,
    busy: Arc<AtomicBool>,
}

impl Engine {
    /// Creates an engine that delegates to the given driver.
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            driver,
            queue: VecDeque::new(),
            handlers: Handlers::default(),
            interrupt: Interrupt::new(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates an engine with a new driver of the given kind.
    pub fn with_kind(kind: DriverKind) -> Result<Self> {
        Ok(Self::new(kind.create()?))
    }

    /// The name of the driver this engine delegates to.
    pub fn driver_name(&self) -> &'static str {
        self.driver.name()
    }

    /// Enumerates the installed voices.
    pub fn voices(&mut self) -> Result<Vec<Voice>> {
        self.driver.voices()
    }

    /// Enumerates the installed voices that the selector matches.
    pub fn voices_matching(&mut self, selector: &VoiceSelector) -> Result<Vec<Voice>> {
        let mut voices = self.driver.voices()?;
        voices.retain(|voice| selector.matches(voice));
        Ok(voices)
    }

    /// Returns the voice the driver currently speaks with.
    pub fn voice(&mut self) -> Result<Option<Voice>> {
        self.driver.voice()
    }

    /// Returns the driver's current rate of speech.
    pub fn rate(&self) -> Result<Rate> {
        self.driver.rate()
    }

    /// Returns the driver's current volume.
    pub fn volume(&self) -> Result<Volume> {
        self.driver.volume()
    }

    /// Returns the driver's current base pitch.
    pub fn pitch(&self) -> Result<Pitch> {
        self.driver.pitch()
    }

    /// Queues a change of voice. The query is a voice identifier, name or language.
    pub fn set_voice<S: Into<String>>(&mut self, query: S) {
        self.queue.push_back(Command::SetVoice(query.into()));
    }

    /// Queues a change of the rate of speech.
    pub fn set_rate<R: Into<Rate>>(&mut self, rate: R) {
        self.queue.push_back(Command::SetRate(rate.into()));
    }

    /// Queues a change of volume.
    pub fn set_volume<V: Into<Volume>>(&mut self, volume: V) {
        self.queue.push_back(Command::SetVolume(volume.into()));
    }

    /// Queues a change of base pitch.
    pub fn set_pitch<P: Into<Pitch>>(&mut self, pitch: P) {
        self.queue.push_back(Command::SetPitch(pitch.into()));
    }

    /// Queues an utterance.
    pub fn say<S: Into<String>>(&mut self, text: S) {
        self.queue.push_back(Command::Say {
            text: text.into(),
            name: None,
        });
    }

    /// Queues an utterance with a name that events about it will carry.
    pub fn say_named<S: Into<String>, N: Into<String>>(&mut self, text: S, name: N) {
        self.queue.push_back(Command::Say {
            text: text.into(),
            name: Some(name.into()),
        });
    }

    /// Queues an utterance to be rendered into a WAV file instead of the audio device.
    pub fn save_to_file<S: Into<String>, P: Into<PathBuf>>(&mut self, text: S, path: P) {
        self.queue.push_back(Command::SaveToFile {
            text: text.into(),
            path: path.into(),
            name: None,
        });
    }

    /// The number of commands waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Tests whether the engine is running its queue.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Discards every queued command.
    pub fn stop(&mut self) {
        self.queue.clear();
        self.interrupt.raise();
    }

    /// Returns a handle that stops the running queue from any thread or from an event handler.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            interrupt: self.interrupt.clone(),
            busy: self.busy.clone(),
        }
    }

    /// Registers a handler to be called with every event.
    pub fn connect<H: EventHandler + 'static>(&mut self, handler: H) -> HandlerId {
        self.handlers.connect(Box::new(handler))
    }

    /// Unregisters a handler. Returns `false` if it was not registered.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        self.handlers.disconnect(id)
    }

    /// Runs the queued commands in order and blocks until they are done.
    ///
    /// The first error the driver reports ends the run. It is passed to the event handlers and
    /// returned, and whatever was still queued is discarded. The same happens, minus the error,
    /// when the engine is stopped.
    pub fn run_and_wait(&mut self) -> Result<()> {
        self.interrupt.clear();
        self.busy.store(true, Ordering::SeqCst);
        let result = self.drain();
        self.busy.store(false, Ordering::SeqCst);
        if result.is_err() || self.interrupt.is_raised() {
            if !self.queue.is_empty() {
                log::debug!("Discarding {} queued commands", self.queue.len());
            }
            self.queue.clear();
        }
        result
    }

    fn drain(&mut self) -> Result<()> {
        while !self.interrupt.is_raised() {
            let command = match self.queue.pop_front() {
                Some(command) => command,
                None => break,
            };
            log::debug!("Applying {:?}", command);
            match command {
                Command::SetVoice(query) => self.apply(|driver| driver.set_voice(&query))?,
                Command::SetRate(rate) => self.apply(|driver| driver.set_rate(rate))?,
                Command::SetVolume(volume) => self.apply(|driver| driver.set_volume(volume))?,
                Command::SetPitch(pitch) => self.apply(|driver| driver.set_pitch(pitch))?,
                Command::Say {
                    text,
                    name,
                } => self.utter(&text, None, name)?,
                Command::SaveToFile {
                    text,
                    path,
                    name,
                } => self.utter(&text, Some(&path), name)?,
            }
        }
        Ok(())
    }

    fn apply<F: FnOnce(&mut dyn Driver) -> Result<()>>(&mut self, f: F) -> Result<()> {
        f(self.driver.as_mut()).map_err(|err| {
            self.handlers.notify(&Event::Error {
                name: None,
                message: err.to_string(),
            });
            err
        })
    }

    fn utter(&mut self, text: &str, path: Option<&Path>, name: Option<String>) -> Result<()> {
        let Self {
            driver,
            handlers,
            interrupt,
            ..
        } = self;

        handlers.notify(&Event::StartedUtterance {
            name: name.clone(),
        });
        let result = match path {
            None => {
                let mut on_word = |location, length| {
                    handlers.notify(&Event::StartedWord {
                        name: name.clone(),
                        location,
                        length,
                    })
                };
                driver.speak(text, &mut on_word, interrupt)
            }
            Some(path) => driver.save_to_file(text, path, interrupt),
        };

        match result {
            Ok(completed) => {
                if !completed {
                    log::warn!("Utterance {:?} was stopped", text);
                }
                handlers.notify(&Event::FinishedUtterance {
                    name,
                    completed,
                });
                Ok(())
            }
            Err(err) => {
                handlers.notify(&Event::Error {
                    name: name.clone(),
                    message: err.to_string(),
                });
                handlers.notify(&Event::FinishedUtterance {
                    name,
                    completed: false,
                });
                Err(err)
            }
        }
    }
}

/// Stops an [`Engine`]'s running queue. Clones stop the same engine.
#[derive(Debug, Clone)]
pub struct StopHandle {
    interrupt: Interrupt,
    busy: Arc<AtomicBool>,
}

impl StopHandle {
    /// Interrupts the utterance being rendered and ends the run, discarding what is still queued.
    /// Has no effect on an engine that is not running.
    pub fn stop(&self) {
        if self.is_busy() {
            self.interrupt.raise();
        }
    }

    /// Tests whether the engine is running its queue.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}
