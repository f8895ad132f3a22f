//! Audio formats and WAV output.

mod format;
#[cfg(windows)]
mod stream;
mod wav;

pub use format::{AudioFormat, BitRate, Channels, SampleRate};
#[cfg(windows)]
pub(crate) use stream::AudioStream;
pub use wav::write_silence;
