/// Progress reported while the engine runs its queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The engine started rendering an utterance.
    StartedUtterance {
        /// The name given to the utterance, if any.
        name: Option<String>,
    },
    /// The engine reached a word. Only drivers that report word boundaries raise this.
    StartedWord {
        /// The name given to the utterance, if any.
        name: Option<String>,
        /// Offset of the word in the utterance's text.
        location: usize,
        /// Length of the word.
        length: usize,
    },
    /// The engine stopped rendering an utterance.
    FinishedUtterance {
        /// The name given to the utterance, if any.
        name: Option<String>,
        /// `false` if the utterance was stopped or failed before it was fully rendered.
        completed: bool,
    },
    /// The engine reported an error. The run ends after this.
    Error {
        /// The name of the utterance being rendered, if any.
        name: Option<String>,
        /// The error, as reported by the engine.
        message: String,
    },
}

/// A handler the [`Engine`](super::Engine) will call with every [`Event`].
pub trait EventHandler: Send {
    /// Called on the thread running the queue.
    fn on_event(&self, event: &Event);
}

impl<F: Fn(&Event) + Send> EventHandler for F {
    fn on_event(&self, event: &Event) {
        self(event)
    }
}

/// Identifies a connected handler, so it can be disconnected later.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct HandlerId(u64);

#[derive(Default)]
pub(super) struct Handlers {
    next_id: u64,
    handlers: Vec<(HandlerId, Box<dyn EventHandler>)>,
}

impl Handlers {
    pub fn connect(&mut self, handler: Box<dyn EventHandler>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    pub fn notify(&self, event: &Event) {
        for (_, handler) in &self.handlers {
            handler.on_event(event);
        }
    }
}
