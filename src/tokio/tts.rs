use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::tts::{Engine, Pitch, Rate, StopHandle, Voice, Volume};
use crate::{Error, Result};

type Reply<T> = oneshot::Sender<Result<T>>;

enum Request {
    Voices(Reply<Vec<Voice>>),
    SetVoice(String, Reply<()>),
    SetRate(Rate, Reply<()>),
    SetVolume(Volume, Reply<()>),
    SetPitch(Pitch, Reply<()>),
    Speak(String, Option<Reply<()>>),
}

#[cfg_attr(docsrs, doc(cfg(feature = "tokio-tts")))]
/// A speech engine whose operations can be awaited.
///
/// The engine lives on a dedicated thread, which initializes the speech subsystem before creating
/// it and finalizes it when the last `AsyncEngine` handle is dropped. Requests are served one at a
/// time, in the order they were made, so property changes still take effect before any speech
/// requested after them.
///
/// Dropping the last handle blocks the dropping thread until the worker has served every request
/// already made, including text passed to [`speak_and_forget`](Self::speak_and_forget). Inside a
/// current-thread runtime that stalls the runtime for as long as the speech lasts, so drop the
/// engine from a blocking context (e.g. `tokio::task::spawn_blocking`) there.
pub struct AsyncEngine {
    tx: UnboundedSender<Request>,
    stop: StopHandle,
    worker: Option<JoinHandle<()>>,
}

impl AsyncEngine {
    /// Starts the worker thread and creates the engine on it with the given factory.
    pub fn spawn<F>(factory: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Engine> + Send + 'static,
    {
        let (tx, rx) = unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        let worker = thread::Builder::new().name("speak-lite".into()).spawn(move || {
            let engine = crate::initialize().and_then(|_| factory());
            match engine {
                Ok(engine) => {
                    let _ = ready_tx.send(Ok(engine.stop_handle()));
                    serve(engine, rx);
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                }
            }
            crate::finalize();
        })?;
        let stop = ready_rx.recv().map_err(|_| Error::Disconnected)??;
        Ok(Self {
            tx,
            stop,
            worker: Some(worker),
        })
    }

    /// Enumerates the installed voices.
    pub async fn voices(&self) -> Result<Vec<Voice>> {
        self.request(Request::Voices).await
    }

    /// Changes the voice. The query is a voice identifier, name or language.
    pub async fn set_voice<S: Into<String>>(&self, query: S) -> Result<()> {
        let query = query.into();
        self.request(|reply| Request::SetVoice(query, reply)).await
    }

    /// Changes the rate of speech.
    pub async fn set_rate<R: Into<Rate>>(&self, rate: R) -> Result<()> {
        let rate = rate.into();
        self.request(|reply| Request::SetRate(rate, reply)).await
    }

    /// Changes the volume.
    pub async fn set_volume<V: Into<Volume>>(&self, volume: V) -> Result<()> {
        let volume = volume.into();
        self.request(|reply| Request::SetVolume(volume, reply)).await
    }

    /// Changes the base pitch.
    pub async fn set_pitch<P: Into<Pitch>>(&self, pitch: P) -> Result<()> {
        let pitch = pitch.into();
        self.request(|reply| Request::SetPitch(pitch, reply)).await
    }

    /// Completes when the engine has finished speaking the given text.
    pub async fn speak<S: Into<String>>(&self, text: S) -> Result<()> {
        let text = text.into();
        self.request(|reply| Request::Speak(text, Some(reply))).await
    }

    /// Queues up the given text and forgets about it.
    ///
    /// Note that this function can be used from both async and synchronous code. The text will be
    /// spoken, but there is no way to await its completion or to learn about errors.
    pub fn speak_and_forget<S: Into<String>>(&self, text: S) -> Result<()> {
        self.tx.send(Request::Speak(text.into(), None)).map_err(|_| Error::Disconnected)
    }

    /// Interrupts the speech being rendered right now. Requests made afterwards are served as usual.
    pub fn stop(&self) {
        self.stop.stop();
    }

    async fn request<T, F: FnOnce(Reply<T>) -> Request>(&self, make: F) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).map_err(|_| Error::Disconnected)?;
        rx.await.map_err(|_| Error::Disconnected)?
    }
}

impl Drop for AsyncEngine {
    fn drop(&mut self) {
        let (tx, _) = unbounded_channel();
        drop(std::mem::replace(&mut self.tx, tx));
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("The speech engine thread panicked");
            }
        }
    }
}

fn serve(mut engine: Engine, mut rx: UnboundedReceiver<Request>) {
    while let Some(request) = rx.blocking_recv() {
        match request {
            Request::Voices(reply) => {
                let _ = reply.send(engine.voices());
            }
            Request::SetVoice(query, reply) => {
                engine.set_voice(query);
                let _ = reply.send(engine.run_and_wait());
            }
            Request::SetRate(rate, reply) => {
                engine.set_rate(rate);
                let _ = reply.send(engine.run_and_wait());
            }
            Request::SetVolume(volume, reply) => {
                engine.set_volume(volume);
                let _ = reply.send(engine.run_and_wait());
            }
            Request::SetPitch(pitch, reply) => {
                engine.set_pitch(pitch);
                let _ = reply.send(engine.run_and_wait());
            }
            Request::Speak(text, reply) => {
                engine.say(text);
                let result = engine.run_and_wait();
                match reply {
                    Some(reply) => {
                        let _ = reply.send(result);
                    }
                    None => {
                        if let Err(err) = result {
                            log::error!("Speech failed: {}", err);
                        }
                    }
                }
            }
        }
    }
    log::debug!("Speech engine thread is shutting down");
}
