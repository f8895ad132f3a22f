//! Engine settings read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::driver::{DriverKind, EspeakDriver};
use crate::tts::{Engine, Pitch, Rate, Volume};
use crate::{Error, Result};

/// Which driver to use and which properties to give it. Unset fields keep the driver's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// The driver; the platform default when unset.
    pub driver: Option<DriverKind>,
    /// A voice identifier, name or language.
    pub voice: Option<String>,
    /// Rate of speech.
    pub rate: Option<Rate>,
    /// Volume.
    pub volume: Option<Volume>,
    /// Base pitch.
    pub pitch: Option<Pitch>,
    /// The program the eSpeak driver runs.
    pub espeak_program: Option<PathBuf>,
}

impl Config {
    /// Reads `SPEAK_DRIVER`, `SPEAK_VOICE`, `SPEAK_RATE`, `SPEAK_VOLUME`, `SPEAK_PITCH` and
    /// `SPEAK_ESPEAK` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), but reads variables through the given function.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(Self {
            driver: parse_var(&var, "SPEAK_DRIVER")?,
            voice: var("SPEAK_VOICE"),
            rate: parse_var::<u32, _>(&var, "SPEAK_RATE")?.map(Rate::new),
            volume: parse_var::<f32, _>(&var, "SPEAK_VOLUME")?.map(Volume::new),
            pitch: parse_var::<u32, _>(&var, "SPEAK_PITCH")?.map(Pitch::new),
            espeak_program: var("SPEAK_ESPEAK").map(PathBuf::from),
        })
    }

    /// Fills the unset fields of `self` from the environment. Variables for fields that are
    /// already set are not read, so they cannot cause an error.
    pub fn or_env(self) -> Result<Self> {
        self.or_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`or_env`](Self::or_env), but reads variables through the given function.
    pub fn or_lookup<F: Fn(&str) -> Option<String>>(self, lookup: F) -> Result<Self> {
        let env = Self::from_lookup(|key| if self.is_set(key) { None } else { lookup(key) })?;
        Ok(self.or(env))
    }

    fn is_set(&self, key: &str) -> bool {
        match key {
            "SPEAK_DRIVER" => self.driver.is_some(),
            "SPEAK_VOICE" => self.voice.is_some(),
            "SPEAK_RATE" => self.rate.is_some(),
            "SPEAK_VOLUME" => self.volume.is_some(),
            "SPEAK_PITCH" => self.pitch.is_some(),
            "SPEAK_ESPEAK" => self.espeak_program.is_some(),
            _ => false,
        }
    }

    /// Fills every unset field of `self` from `fallback`.
    pub fn or(self, fallback: Config) -> Self {
        Self {
            driver: self.driver.or(fallback.driver),
            voice: self.voice.or(fallback.voice),
            rate: self.rate.or(fallback.rate),
            volume: self.volume.or(fallback.volume),
            pitch: self.pitch.or(fallback.pitch),
            espeak_program: self.espeak_program.or(fallback.espeak_program),
        }
    }

    /// Creates an engine with the configured driver. The properties are not applied yet.
    pub fn build_engine(&self) -> Result<Engine> {
        let kind = self.driver.unwrap_or_else(DriverKind::platform_default);
        match (kind, &self.espeak_program) {
            (DriverKind::Espeak, Some(program)) => {
                log::info!("Using the espeak speech driver ({})", program.display());
                Ok(Engine::new(Box::new(EspeakDriver::with_program(program.clone()))))
            }
            _ => Engine::with_kind(kind),
        }
    }

    /// Queues the configured properties on the engine: voice, rate, volume, then pitch.
    pub fn apply(&self, engine: &mut Engine) {
        if let Some(voice) = &self.voice {
            engine.set_voice(voice.clone());
        }
        if let Some(rate) = self.rate {
            engine.set_rate(rate);
        }
        if let Some(volume) = self.volume {
            engine.set_volume(volume);
        }
        if let Some(pitch) = self.pitch {
            engine.set_pitch(pitch);
        }
    }
}

fn parse_var<T: FromStr, F: Fn(&str) -> Option<String>>(var: &F, key: &str) -> Result<Option<T>> {
    var(key)
        .map(|value| {
            value.parse().map_err(|_| Error::InvalidConfig {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::driver::{DriverCall, DummyDriver};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("SPEAK_DRIVER", "Dummy"),
            ("SPEAK_VOICE", "brazil"),
            ("SPEAK_RATE", "120"),
            ("SPEAK_VOLUME", " 0.5 "),
            ("SPEAK_PITCH", "60"),
            ("SPEAK_ESPEAK", "/opt/espeak-ng"),
        ]))
        .unwrap();
        assert_eq!(config.driver, Some(DriverKind::Dummy));
        assert_eq!(config.voice.as_deref(), Some("brazil"));
        assert_eq!(config.rate, Some(Rate::new(120)));
        assert_eq!(config.volume, Some(Volume::new(0.5)));
        assert_eq!(config.pitch, Some(Pitch::new(60)));
        assert_eq!(config.espeak_program, Some(PathBuf::from("/opt/espeak-ng")));
    }

    #[test]
    fn empty_variables_are_ignored() {
        let config = Config::from_lookup(lookup(&[("SPEAK_VOICE", "  "), ("SPEAK_RATE", "")]));
        assert_eq!(config.unwrap(), Config::default());
    }

    #[test]
    fn unparsable_values_are_errors() {
        match Config::from_lookup(lookup(&[("SPEAK_RATE", "fast")])) {
            Err(Error::InvalidConfig {
                key,
                value,
            }) => {
                assert_eq!(key, "SPEAK_RATE");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(Config::from_lookup(lookup(&[("SPEAK_DRIVER", "nsss")])).is_err());
    }

    #[test]
    fn unset_fields_fall_back() {
        let config = Config {
            rate: Some(Rate::new(300)),
            ..Config::default()
        }
        .or(Config {
            rate: Some(Rate::new(120)),
            voice: Some("brazil".to_string()),
            ..Config::default()
        });
        assert_eq!(config.rate, Some(Rate::new(300)));
        assert_eq!(config.voice.as_deref(), Some("brazil"));
    }

    #[test]
    fn unset_fields_read_the_environment() {
        let cli = Config {
            rate: Some(Rate::new(300)),
            ..Config::default()
        };
        let config = cli
            .or_lookup(lookup(&[("SPEAK_RATE", "fast"), ("SPEAK_VOLUME", "0.5")]))
            .unwrap();
        assert_eq!(config.rate, Some(Rate::new(300)));
        assert_eq!(config.volume, Some(Volume::new(0.5)));

        let bad = Config::default().or_lookup(lookup(&[("SPEAK_RATE", "fast")]));
        assert!(matches!(bad, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn command_line_beats_environment_beats_defaults() {
        let defaults = Config {
            voice: Some("brazil".to_string()),
            rate: Some(Rate::new(120)),
            volume: Some(Volume::new(1.0)),
            ..Config::default()
        };

        let nothing_set = Config::default()
            .or_lookup(lookup(&[]))
            .unwrap()
            .or(defaults.clone());
        assert_eq!(nothing_set, defaults);

        let cli = Config {
            rate: Some(Rate::new(300)),
            ..Config::default()
        };
        let config = cli
            .or_lookup(lookup(&[("SPEAK_RATE", "150"), ("SPEAK_VOLUME", "0.5")]))
            .unwrap()
            .or(defaults);
        assert_eq!(config.voice.as_deref(), Some("brazil"));
        assert_eq!(config.rate, Some(Rate::new(300)));
        assert_eq!(config.volume, Some(Volume::new(0.5)));
        assert_eq!(config.pitch, None);
    }

    #[test]
    fn apply_queues_voice_rate_volume_pitch() {
        let driver = DummyDriver::new();
        let journal = driver.journal();
        let mut engine = Engine::new(Box::new(driver));
        let config = Config {
            voice: Some("brazil".to_string()),
            rate: Some(Rate::new(120)),
            volume: Some(Volume::new(0.5)),
            pitch: Some(Pitch::new(60)),
            ..Config::default()
        };

        config.apply(&mut engine);
        assert_eq!(engine.pending(), 4);
        engine.run_and_wait().unwrap();
        assert_eq!(
            journal.calls(),
            [
                DriverCall::SetVoice("brazil".to_string()),
                DriverCall::SetRate(Rate::new(120)),
                DriverCall::SetVolume(Volume::new(0.5)),
                DriverCall::SetPitch(Pitch::new(60)),
            ]
        );
    }

    #[test]
    fn build_engine_runs_configured_espeak() {
        let config = Config {
            driver: Some(DriverKind::Espeak),
            espeak_program: Some(PathBuf::from("/nonexistent/espeak-ng")),
            ..Config::default()
        };
        let mut engine = config.build_engine().unwrap();
        assert_eq!(engine.driver_name(), "espeak");
        match engine.voices() {
            Err(Error::Spawn { program, .. }) => {
                assert_eq!(program, PathBuf::from("/nonexistent/espeak-ng"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
