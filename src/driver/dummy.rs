//! A driver that renders nothing audible and remembers everything it was asked to do.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::audio::{write_silence, AudioFormat, BitRate, Channels, SampleRate};
use crate::tts::{resolve_voice, Pitch, Rate, Voice, VoiceAge, VoiceGender, Volume};
use crate::{Error, Result};

use super::{Driver, Interrupt};

/// One operation performed by a [`DummyDriver`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DriverCall {
    SetVoice(String),
    SetRate(Rate),
    SetVolume(Volume),
    SetPitch(Pitch),
    Speak(String),
    SaveToFile(String, PathBuf),
}

/// The record of every operation a [`DummyDriver`] performed, in order. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<DriverCall>>>,
}

impl Journal {
    /// Returns a copy of the recorded operations.
    pub fn calls(&self) -> Vec<DriverCall> {
        self.lock().clone()
    }

    /// Returns the texts spoken so far.
    pub fn spoken(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                DriverCall::Speak(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: DriverCall) {
        log::debug!("dummy driver: {:?}", call);
        self.lock().push(call);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DriverCall>> {
        // A panicking test thread must not hide the record from the others.
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A driver that makes no sound. It reports a word boundary for every whitespace-separated word
/// and writes silent WAV files whose length depends on the word count and the rate of speech.
pub struct DummyDriver {
    voices: Vec<Voice>,
    voice: Option<Voice>,
    rate: Rate,
    volume: Volume,
    pitch: Pitch,
    word_delay: Duration,
    fail_next: Option<String>,
    journal: Journal,
}

impl DummyDriver {
    /// Creates a driver with a small set of made-up voices.
    pub fn new() -> Self {
        Self::with_voices(vec![
            Voice::new("en-us", "English (America)")
                .with_language("en-US")
                .with_gender(VoiceGender::Female)
                .with_age(VoiceAge::Adult),
            Voice::new("brazil", "Portuguese (Brazil)")
                .with_language("pt-BR")
                .with_gender(VoiceGender::Male)
                .with_age(VoiceAge::Adult),
            Voice::new("de", "German").with_language("de-DE").with_gender(VoiceGender::Neutral),
        ])
    }

    /// Creates a driver with the given voices. The first voice, if any, is selected.
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voice: voices.first().cloned(),
            voices,
            rate: Rate::default(),
            volume: Volume::default(),
            pitch: Pitch::default(),
            word_delay: Duration::ZERO,
            fail_next: None,
            journal: Journal::default(),
        }
    }

    /// Makes every word take the given time to "speak".
    pub fn word_delay(mut self, delay: Duration) -> Self {
        self.word_delay = delay;
        self
    }

    /// Makes the next utterance fail with an [`Error::Io`] of kind `Other` carrying the given
    /// message. Only that utterance fails.
    pub fn fail_next(&mut self, message: &str) {
        self.fail_next = Some(message.to_string());
    }

    /// Returns a handle to the record of this driver's operations.
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    fn check_failure(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(message) => Err(Error::Io(std::io::Error::new(std::io::ErrorKind::Other, message))),
            None => Ok(()),
        }
    }
}

impl Default for DummyDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for DummyDriver {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        Ok(self.voices.clone())
    }

    fn voice(&mut self) -> Result<Option<Voice>> {
        Ok(self.voice.clone())
    }

    fn set_voice(&mut self, query: &str) -> Result<()> {
        let voice = resolve_voice(&self.voices, query)?.clone();
        self.journal.record(DriverCall::SetVoice(voice.id.clone()));
        self.voice = Some(voice);
        Ok(())
    }

    fn rate(&self) -> Result<Rate> {
        Ok(self.rate)
    }

    fn set_rate(&mut self, rate: Rate) -> Result<()> {
        self.journal.record(DriverCall::SetRate(rate));
        self.rate = rate;
        Ok(())
    }

    fn volume(&self) -> Result<Volume> {
        Ok(self.volume)
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        self.journal.record(DriverCall::SetVolume(volume));
        self.volume = volume;
        Ok(())
    }

    fn pitch(&self) -> Result<Pitch> {
        Ok(self.pitch)
    }

    fn set_pitch(&mut self, pitch: Pitch) -> Result<()> {
        self.journal.record(DriverCall::SetPitch(pitch));
        self.pitch = pitch;
        Ok(())
    }

    fn speak(
        &mut self,
        text: &str,
        on_word: &mut dyn FnMut(usize, usize),
        interrupt: &Interrupt,
    ) -> Result<bool> {
        self.journal.record(DriverCall::Speak(text.to_string()));
        self.check_failure()?;
        for (location, word) in words(text) {
            if interrupt.is_raised() {
                return Ok(false);
            }
            on_word(location, word.len());
            if !self.word_delay.is_zero() {
                std::thread::sleep(self.word_delay);
            }
        }
        Ok(!interrupt.is_raised())
    }

    fn save_to_file(&mut self, text: &str, path: &Path, interrupt: &Interrupt) -> Result<bool> {
        self.journal.record(DriverCall::SaveToFile(text.to_string(), path.to_path_buf()));
        self.check_failure()?;
        if interrupt.is_raised() {
            return Ok(false);
        }
        let format = AudioFormat {
            sample_rate: SampleRate::Hz16000,
            bit_rate: BitRate::Bits16,
            channels: Channels::Mono,
        };
        let minutes = words(text).count() as f64 / self.rate.value() as f64;
        write_silence(path, &format, Duration::from_secs_f64(minutes * 60.0))?;
        Ok(true)
    }
}

/// Splits text into words, yielding the byte offset of each.
fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_whitespace()
        .map(move |word| (word.as_ptr() as usize - text.as_ptr() as usize, word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_word_boundaries() {
        let mut driver = DummyDriver::new();
        let mut boundaries = Vec::new();
        let completed = driver
            .speak("  hello brave  world", &mut |loc, len| boundaries.push((loc, len)), &Interrupt::new())
            .unwrap();
        assert!(completed);
        assert_eq!(boundaries, [(2, 5), (8, 5), (15, 5)]);
    }

    #[test]
    fn interrupted_speech_is_incomplete() {
        let mut driver = DummyDriver::new();
        let interrupt = Interrupt::new();
        interrupt.raise();
        let mut count = 0;
        assert!(!driver.speak("a b c", &mut |_, _| count += 1, &interrupt).unwrap());
        assert_eq!(count, 0);
    }

    #[test]
    fn saved_file_length_follows_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let mut driver = DummyDriver::new();
        driver.set_rate(Rate::new(120)).unwrap();
        assert!(driver.save_to_file("one two", &path, &Interrupt::new()).unwrap());

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 16000);
    }

    #[test]
    fn injected_failure_hits_one_utterance() {
        let mut driver = DummyDriver::new();
        driver.fail_next("device unplugged");
        match driver.speak("hello", &mut |_, _| {}, &Interrupt::new()) {
            Err(Error::Io(err)) => {
                assert_eq!(err.kind(), std::io::ErrorKind::Other);
                assert_eq!(err.to_string(), "device unplugged");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(driver.speak("hello", &mut |_, _| {}, &Interrupt::new()).unwrap());
    }

    #[test]
    fn unknown_voice_leaves_selection_alone() {
        let mut driver = DummyDriver::new();
        assert!(driver.set_voice("klingon").is_err());
        assert_eq!(driver.voice().unwrap().unwrap().id, "en-us");
        driver.set_voice("brazil").unwrap();
        assert_eq!(driver.voice().unwrap().unwrap().id, "brazil");
    }
}
