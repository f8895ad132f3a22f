use std::path::Path;
use std::time::Duration;

use crate::Result;

use super::{AudioFormat, BitRate};

/// Writes a WAV file of the given format containing nothing but silence.
pub fn write_silence<P: AsRef<Path>>(path: P, format: &AudioFormat, duration: Duration) -> Result<()> {
    let spec = format.wav_spec();
    let frames = (duration.as_secs_f64() * spec.sample_rate as f64).round() as u64;
    let mut writer = hound::WavWriter::create(path, spec)?;
    for _ in 0..frames * spec.channels as u64 {
        match format.bit_rate {
            BitRate::Bits8 => writer.write_sample(0i8)?,
            BitRate::Bits16 => writer.write_sample(0i16)?,
        }
    }
    writer.finalize()?;
    Ok(())
}
