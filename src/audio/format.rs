/// Sample rate, in samples per second, at which to play or record.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[allow(missing_docs)]
pub enum SampleRate {
    Hz8000 = 8000,
    Hz11025 = 11025,
    Hz12000 = 12000,
    Hz16000 = 16000,
    Hz22050 = 22050,
    Hz24000 = 24000,
    Hz32000 = 32000,
    Hz44100 = 44100,
    Hz48000 = 48000,
}

/// How many bits each sample should have.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[allow(missing_docs)]
pub enum BitRate {
    Bits8 = 8,
    Bits16 = 16,
}

/// Number of audio channels.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[allow(missing_docs)]
pub enum Channels {
    Mono = 1,
    Stereo = 2,
}

/// Specifies the format of rendered audio.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct AudioFormat {
    /// Sample rate at which to play or record.
    pub sample_rate: SampleRate,
    /// How many bits each sample should have.
    pub bit_rate: BitRate,
    /// Number of channels.
    pub channels: Channels,
}

impl AudioFormat {
    /// The number of bytes in one frame, i.e. one sample for every channel.
    pub fn block_align(&self) -> u32 {
        (self.channels as u32) * (self.bit_rate as u32) / 8
    }

    /// Returns the equivalent WAV header parameters.
    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels as u16,
            sample_rate: self.sample_rate as u32,
            bits_per_sample: self.bit_rate as u16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[cfg(windows)]
    pub(crate) fn to_sapi(&self) -> windows::Win32::Media::Audio::WAVEFORMATEX {
        use windows::Win32::Media::Audio::{WAVEFORMATEX, WAVE_FORMAT_PCM};

        let block_align = self.block_align();
        WAVEFORMATEX {
            wFormatTag: WAVE_FORMAT_PCM as _,
            nChannels: self.channels as u16,
            nSamplesPerSec: self.sample_rate as u32,
            nAvgBytesPerSec: (self.sample_rate as u32) * block_align,
            nBlockAlign: block_align as u16,
            wBitsPerSample: self.bit_rate as u16,
            cbSize: 0,
        }
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: SampleRate::Hz22050,
            bit_rate: BitRate::Bits16,
            channels: Channels::Mono,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_spec_mirrors_format() {
        let format = AudioFormat {
            sample_rate: SampleRate::Hz16000,
            bit_rate: BitRate::Bits8,
            channels: Channels::Stereo,
        };
        let spec = format.wav_spec();
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 8);
        assert_eq!(spec.channels, 2);
        assert_eq!(format.block_align(), 2);
    }
}
