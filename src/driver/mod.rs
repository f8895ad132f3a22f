//! Adapters between the [`Engine`](crate::tts::Engine) and the platform speech engines.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::tts::{Pitch, Rate, Voice, Volume};
use crate::{Error, Result};

pub mod dummy;
pub mod espeak;
#[cfg(windows)]
pub mod sapi;

pub use dummy::{DriverCall, DummyDriver, Journal};
pub use espeak::EspeakDriver;
#[cfg(windows)]
pub use sapi::SapiDriver;

/// A speech engine the [`Engine`](crate::tts::Engine) can delegate to.
///
/// Property setters take effect for every utterance spoken after they return. `speak` and
/// `save_to_file` block until the engine has finished or the interrupt has been raised, and
/// report which of the two happened.
pub trait Driver: Send {
    /// The name of this driver, e.g. `espeak`.
    fn name(&self) -> &'static str;

    /// Enumerates the voices installed on the system.
    fn voices(&mut self) -> Result<Vec<Voice>>;

    /// Returns the voice that will be used to render speech, if the engine reports one.
    fn voice(&mut self) -> Result<Option<Voice>>;

    /// Selects the installed voice that the query refers to.
    fn set_voice(&mut self, query: &str) -> Result<()>;

    /// Returns the rate of speech.
    fn rate(&self) -> Result<Rate>;

    /// Sets the rate of speech.
    fn set_rate(&mut self, rate: Rate) -> Result<()>;

    /// Returns the speech volume.
    fn volume(&self) -> Result<Volume>;

    /// Sets the speech volume.
    fn set_volume(&mut self, volume: Volume) -> Result<()>;

    /// Returns the base pitch.
    fn pitch(&self) -> Result<Pitch>;

    /// Sets the base pitch.
    fn set_pitch(&mut self, pitch: Pitch) -> Result<()>;

    /// Speaks the text on the default audio device. `on_word` is called with the character offset
    /// and length of each word as the engine reaches it, if the engine reports word boundaries.
    ///
    /// Returns `false` if the speech was cut short by the interrupt.
    fn speak(
        &mut self,
        text: &str,
        on_word: &mut dyn FnMut(usize, usize),
        interrupt: &Interrupt,
    ) -> Result<bool>;

    /// Renders the text into a WAV file at the given path.
    ///
    /// Returns `false` if rendering was cut short by the interrupt.
    fn save_to_file(&mut self, text: &str, path: &Path, interrupt: &Interrupt) -> Result<bool>;
}

/// The drivers this crate provides.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DriverKind {
    /// The `espeak-ng` program.
    #[strum(to_string = "espeak", serialize = "espeak-ng")]
    Espeak,
    /// Microsoft Speech API 5 (Windows only).
    #[strum(to_string = "sapi5", serialize = "sapi")]
    Sapi5,
    /// An in-memory driver that makes no sound.
    Dummy,
}

impl DriverKind {
    /// The driver used when none is requested.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::Sapi5
        } else {
            Self::Espeak
        }
    }

    /// Creates a driver of this kind with its default settings.
    pub fn create(self) -> Result<Box<dyn Driver>> {
        log::info!("Using the {} speech driver", self);
        match self {
            Self::Espeak => Ok(Box::new(EspeakDriver::new())),
            Self::Dummy => Ok(Box::new(DummyDriver::new())),
            #[cfg(windows)]
            Self::Sapi5 => Ok(Box::new(SapiDriver::new()?)),
            #[cfg(not(windows))]
            Self::Sapi5 => Err(Error::UnsupportedDriver(self.to_string())),
        }
    }
}

/// A flag that tells a driver to abandon the speech it is rendering.
///
/// Clones share the same flag, so one can be raised from another thread while a driver polls it.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    /// Creates a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Lowers the flag.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }

    /// Tests whether the flag is raised.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_kind_parses_aliases() {
        assert_eq!("ESPEAK".parse::<DriverKind>().unwrap(), DriverKind::Espeak);
        assert_eq!("espeak-ng".parse::<DriverKind>().unwrap(), DriverKind::Espeak);
        assert_eq!("sapi".parse::<DriverKind>().unwrap(), DriverKind::Sapi5);
        assert_eq!("dummy".parse::<DriverKind>().unwrap(), DriverKind::Dummy);
        assert!("nsss".parse::<DriverKind>().is_err());
        assert_eq!(DriverKind::Sapi5.to_string(), "sapi5");
    }

    #[cfg(not(windows))]
    #[test]
    fn sapi_is_unsupported_off_windows() {
        assert!(matches!(DriverKind::Sapi5.create(), Err(Error::UnsupportedDriver(_))));
        assert_eq!(DriverKind::platform_default(), DriverKind::Espeak);
    }

    #[test]
    fn interrupt_is_shared_between_clones() {
        let interrupt = Interrupt::new();
        let remote = interrupt.clone();
        remote.raise();
        assert!(interrupt.is_raised());
        interrupt.clear();
        assert!(!remote.is_raised());
    }
}
