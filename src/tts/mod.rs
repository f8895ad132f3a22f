//! Text-to-speech: voices, properties and the engine that speaks.

mod engine;
mod types;
mod voice;

pub use self::engine::{Engine, Event, EventHandler, HandlerId, StopHandle};
pub use self::types::{Pitch, Rate, Volume};
pub use self::voice::{resolve_voice, Voice, VoiceAge, VoiceGender, VoiceSelector};
