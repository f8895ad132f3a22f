//! A driver that runs the `espeak-ng` program.

use std::ffi::OsString;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use crate::tts::{resolve_voice, Pitch, Rate, Voice, VoiceGender, Volume};
use crate::{Error, Result};

use super::{Driver, Interrupt};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Speaks by running `espeak-ng` once per utterance, with the text on its standard input.
///
/// The command line tool does not report word boundaries, so none are reported.
pub struct EspeakDriver {
    program: PathBuf,
    voices: Option<Vec<Voice>>,
    voice: Option<Voice>,
    rate: Rate,
    volume: Volume,
    pitch: Pitch,
}

impl EspeakDriver {
    /// Creates a driver that runs `espeak-ng` from the `PATH`.
    pub fn new() -> Self {
        Self::with_program("espeak-ng")
    }

    /// Creates a driver that runs the given program. It must accept `espeak-ng` arguments.
    pub fn with_program<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            voices: None,
            voice: None,
            rate: Rate::default(),
            volume: Volume::default(),
            pitch: Pitch::default(),
        }
    }

    /// The program this driver runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn installed_voices(&mut self) -> Result<&[Voice]> {
        if self.voices.is_none() {
            let output = Command::new(&self.program)
                .arg("--voices")
                .stdin(Stdio::null())
                .output()
                .map_err(|source| Error::Spawn {
                    program: self.program.clone(),
                    source,
                })?;
            if !output.status.success() {
                return Err(Error::Engine {
                    program: self.program.clone(),
                    status: output.status,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            let voices = parse_voices(&String::from_utf8_lossy(&output.stdout));
            log::debug!("{} reports {} voices", self.program.display(), voices.len());
            self.voices = Some(voices);
        }
        Ok(self.voices.as_deref().unwrap_or_default())
    }

    fn speech_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if let Some(voice) = &self.voice {
            args.push("-v".into());
            args.push(voice.id.clone().into());
        }
        args.push("-s".into());
        args.push(self.rate.to_string().into());
        args.push("-a".into());
        args.push(self.volume.percent().to_string().into());
        args.push("-p".into());
        args.push(self.pitch.to_string().into());
        args
    }

    fn run(&self, text: &str, extra_args: &[OsString], interrupt: &Interrupt) -> Result<bool> {
        let mut command = Command::new(&self.program);
        command
            .args(self.speech_args())
            .args(extra_args)
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        log::debug!("Running {:?}", command);

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(text.as_bytes()) {
                Ok(()) => {}
                // The program quit without reading its input. Its exit status says why.
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    log::debug!("{} closed its input early", self.program.display());
                }
                Err(err) => {
                    drop(stdin);
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(err.into());
                }
            }
        }
        self.wait(child, interrupt)
    }

    fn wait(&self, mut child: Child, interrupt: &Interrupt) -> Result<bool> {
        loop {
            if interrupt.is_raised() {
                log::warn!("Interrupting {}", self.program.display());
                child.kill()?;
                child.wait()?;
                return Ok(false);
            }
            if let Some(status) = child.try_wait()? {
                if status.success() {
                    return Ok(true);
                }
                let mut stderr = String::new();
                if let Some(mut pipe) = child.stderr.take() {
                    pipe.read_to_string(&mut stderr)?;
                }
                return Err(Error::Engine {
                    program: self.program.clone(),
                    status,
                    stderr: stderr.trim().to_string(),
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for EspeakDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for EspeakDriver {
    fn name(&self) -> &'static str {
        "espeak"
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        self.installed_voices().map(<[Voice]>::to_vec)
    }

    fn voice(&mut self) -> Result<Option<Voice>> {
        Ok(self.voice.clone())
    }

    fn set_voice(&mut self, query: &str) -> Result<()> {
        let voice = resolve_voice(self.installed_voices()?, query)?.clone();
        log::debug!("Selected voice {}", voice.id);
        self.voice = Some(voice);
        Ok(())
    }

    fn rate(&self) -> Result<Rate> {
        Ok(self.rate)
    }

    fn set_rate(&mut self, rate: Rate) -> Result<()> {
        self.rate = rate;
        Ok(())
    }

    fn volume(&self) -> Result<Volume> {
        Ok(self.volume)
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        self.volume = volume;
        Ok(())
    }

    fn pitch(&self) -> Result<Pitch> {
        Ok(self.pitch)
    }

    fn set_pitch(&mut self, pitch: Pitch) -> Result<()> {
        self.pitch = pitch;
        Ok(())
    }

    fn speak(
        &mut self,
        text: &str,
        _on_word: &mut dyn FnMut(usize, usize),
        interrupt: &Interrupt,
    ) -> Result<bool> {
        self.run(text, &[], interrupt)
    }

    fn save_to_file(&mut self, text: &str, path: &Path, interrupt: &Interrupt) -> Result<bool> {
        self.run(text, &["-w".into(), path.as_os_str().to_owned()], interrupt)
    }
}

/// Parses the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  pt-br           --/M      Portuguese_(Brazil) roa/pt-BR           (pt 6)
/// ```
fn parse_voices(table: &str) -> Vec<Voice> {
    table
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(parse_voice_line)
        .collect()
}

fn parse_voice_line(line: &str) -> Option<Voice> {
    let mut fields = line.split_whitespace();
    let _priority = fields.next()?;
    let language = fields.next()?;
    let age_gender = fields.next()?;
    let name = fields.next()?;
    let file = fields.next()?;
    let others = fields.collect::<Vec<_>>().join(" ");

    let mut voice = Voice::new(file, name).with_language(language);
    for group in others.split(')') {
        let code = group.trim().trim_start_matches('(').split_whitespace().next();
        if let Some(code) = code {
            if !voice.languages.iter().any(|l| l == code) {
                voice.languages.push(code.to_string());
            }
        }
    }
    voice.gender = match age_gender.rsplit('/').next() {
        Some("M") => Some(VoiceGender::Male),
        Some("F") => Some(VoiceGender::Female),
        _ => None,
    };
    Some(voice)
}
