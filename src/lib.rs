#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A simplified text-to-speech engine that delegates synthesis to the platform's speech engine.
//!
//! # Features
//!
//! The goal of this crate is to expose the handful of operations most programs need from a
//! speech synthesizer, the same way on every platform: enumerate the installed voices, pick one,
//! adjust the rate of speech and the volume, queue some text and wait until it has been spoken.
//!
//! Synthesis is done by a [driver](driver::Driver). On Windows the default driver talks to
//! Microsoft's Speech API (SAPI 5). Elsewhere it runs the `espeak-ng` program. A deterministic
//! `dummy` driver is available everywhere and is what the tests run against.
//!
//! ## The engine
//!
//! [`Engine`](tts::Engine) owns a driver and a command queue. Property changes and utterances
//! are queued in call order, and [`run_and_wait`](tts::Engine::run_and_wait) plays the queue back,
//! so a property set before an utterance is always in effect when that utterance is spoken.
//!
//! ```no_run
//! # fn main() -> speak_lite::Result<()> {
//! speak_lite::initialize()?;
//! let mut engine = speak_lite::init(None)?;
//!
//! for voice in engine.voices()? {
//!     println!("{} {} {:?}", voice.id, voice.name, voice.languages);
//! }
//!
//! engine.set_voice("brazil");
//! engine.set_rate(120);
//! engine.set_volume(1.0);
//! engine.say("amador");
//! engine.say("programa");
//! engine.run_and_wait()?;
//! speak_lite::finalize();
//! # Ok(())
//! # }
//! ```
//!
//! Errors reported by the platform engine are passed through unchanged. Nothing is retried.
//!
//! # COM on Windows
//!
//! The SAPI driver is a COM client. Every thread that creates or uses it must call
//! [`initialize`] first and [`finalize`] when done. On other platforms both are no-ops.

use std::path::PathBuf;
use std::process::ExitStatus;

pub mod audio;
#[cfg(windows)]
mod com_util;
pub mod config;
pub mod driver;
#[cfg(windows)]
mod token;
pub mod tts;

#[cfg(feature = "tokio-tts")]
pub mod tokio;

pub use config::Config;
pub use driver::DriverKind;
pub use tts::Engine;

/// The error type returned by speech engine functions and methods.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No installed voice matches the requested id, name or language.
    #[error("voice '{0}' is not installed")]
    UnknownVoice(String),
    /// The requested driver does not exist on this platform.
    #[error("driver '{0}' is not available on this platform")]
    UnsupportedDriver(String),
    /// The speech program could not be started.
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        /// The program that was run.
        program: PathBuf,
        /// Why it could not be started.
        source: std::io::Error,
    },
    /// The speech program ran but reported a failure.
    #[error("{} failed ({status}): {stderr}", .program.display())]
    Engine {
        /// The program that was run.
        program: PathBuf,
        /// How it exited.
        status: ExitStatus,
        /// Whatever it wrote to its standard error.
        stderr: String,
    },
    /// A configuration value could not be parsed.
    #[error("invalid value for {key}: '{value}'")]
    InvalidConfig {
        /// The configuration key.
        key: String,
        /// The offending value.
        value: String,
    },
    /// An I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An error writing or reading WAV audio.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    /// The engine worker is no longer running.
    #[error("the speech engine has shut down")]
    Disconnected,
    /// An error reported by SAPI.
    #[cfg(windows)]
    #[error("SAPI error: {0}")]
    Sapi(#[from] windows::core::Error),
}

/// The type returned by speech engine functions and methods.
pub type Result<T> = std::result::Result<T, Error>;

/// Initializes the speech subsystem on the current thread. This function must be called for every
/// thread that intends to use the SAPI driver.
#[cfg(windows)]
pub fn initialize() -> Result<()> {
    use windows::Win32::System::Com::CoInitialize;

    unsafe { CoInitialize(std::ptr::null()) }.map_err(Error::from)
}

/// Initializes the speech subsystem on the current thread. Nothing needs initializing on this
/// platform.
#[cfg(not(windows))]
pub fn initialize() -> Result<()> {
    Ok(())
}

/// Deinitializes the speech subsystem for the current thread. This function must be called for
/// every thread that called `initialize()`, the same number of times.
pub fn finalize() {
    #[cfg(windows)]
    unsafe {
        windows::Win32::System::Com::CoUninitialize();
    };
}

/// Creates an engine backed by the given driver, or by the platform's default driver.
pub fn init(kind: Option<DriverKind>) -> Result<Engine> {
    Engine::with_kind(kind.unwrap_or_else(DriverKind::platform_default))
}
