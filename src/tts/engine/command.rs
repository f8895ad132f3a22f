use std::path::PathBuf;

use crate::tts::{Pitch, Rate, Volume};

/// Work queued on the engine, applied in order by `run_and_wait`.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Command {
    SetVoice(String),
    SetRate(Rate),
    SetVolume(Volume),
    SetPitch(Pitch),
    Say {
        text: String,
        name: Option<String>,
    },
    SaveToFile {
        text: String,
        path: PathBuf,
        name: Option<String>,
    },
}
