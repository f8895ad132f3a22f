//! A driver for Microsoft's Speech API (SAPI 5).

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use windows as Windows;
use xml::escape::escape_str_pcdata;
use Windows::core::{IUnknown, Interface};
use Windows::Win32::Media::Speech::{
    ISpVoice, SpVoice, SPF_ASYNC, SPF_DEFAULT, SPF_IS_NOT_XML, SPF_IS_XML, SPF_PURGEBEFORESPEAK,
    SPRS_DONE, SPVOICESTATUS,
};
use Windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};

use crate::audio::{AudioFormat, AudioStream};
use crate::com_util::{out_to_ret, Intf, Locale};
use crate::token::{Category, Token};
use crate::tts::{resolve_voice, Pitch, Rate, Voice, VoiceAge, VoiceGender, Volume};
use crate::Result;

use super::{Driver, Interrupt};

const VOICES_CATEGORY: &str = r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Speech\Voices";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// SAPI rate 0 is roughly this many words per minute, and every step multiplies it by
/// `RATE_STEP`.
const BASE_WPM: f64 = 200.0;
const RATE_STEP: f64 = 1.11;

/// Speaks through a SAPI `SpVoice`. The thread that creates and uses it must have called
/// [`initialize`](crate::initialize).
pub struct SapiDriver {
    intf: Intf<ISpVoice>,
    voices: Option<Vec<(Voice, Token)>>,
    pitch: Pitch,
}

impl SapiDriver {
    /// Creates a driver that speaks with the system's default voice on the default audio device.
    pub fn new() -> Result<Self> {
        let intf: ISpVoice = unsafe { CoCreateInstance(&SpVoice, None, CLSCTX_ALL) }?;
        Ok(Self {
            intf: Intf(intf),
            voices: None,
            pitch: Pitch::default(),
        })
    }

    fn installed_voices(&mut self) -> Result<&[(Voice, Token)]> {
        if self.voices.is_none() {
            let tokens = Category::new(VOICES_CATEGORY)?.enum_tokens()?;
            let voices = tokens
                .map(|token| Ok((voice_from_token(&token)?, token)))
                .collect::<Result<Vec<_>>>()?;
            log::debug!("SAPI reports {} voices", voices.len());
            self.voices = Some(voices);
        }
        Ok(self.voices.as_deref().unwrap_or_default())
    }

    /// Builds the text and flags to pass to `Speak`, plus the offset of the text in it.
    fn speech(&self, text: &str) -> (String, u32, usize) {
        if self.pitch == Pitch::default() {
            return (text.to_string(), (SPF_DEFAULT.0 | SPF_IS_NOT_XML.0) as u32, 0);
        }
        let prefix = format!("<pitch absmiddle=\"{}\">", sapi_pitch(self.pitch));
        let contents = format!("{}{}</pitch>", prefix, escape_str_pcdata(text));
        (contents, SPF_IS_XML.0 as u32, prefix.encode_utf16().count())
    }

    fn status(&self) -> Result<SPVOICESTATUS> {
        let mut status = SPVOICESTATUS::default();
        unsafe { self.intf.GetStatus(&mut status, std::ptr::null_mut()) }?;
        Ok(status)
    }

    /// Polls until SAPI has finished the given stream. Status left over from earlier streams is
    /// ignored, since an async `Speak` returns before SAPI starts on the new stream.
    fn wait(
        &self,
        stream: u32,
        offset: usize,
        on_word: &mut dyn FnMut(usize, usize),
        interrupt: &Interrupt,
    ) -> Result<bool> {
        let mut last_word = None;
        loop {
            let status = self.status()?;
            if status.ulCurrentStream >= stream {
                let word = (status.ulInputWordPos as usize, status.ulInputWordLen as usize);
                if word.1 > 0 && last_word != Some(word) {
                    on_word(word.0.saturating_sub(offset), word.1);
                    last_word = Some(word);
                }
            }
            if finished(&status, stream) {
                return Ok(true);
            }
            if interrupt.is_raised() {
                log::warn!("Purging SAPI speech");
                unsafe { self.intf.Speak("", (SPF_ASYNC.0 | SPF_PURGEBEFORESPEAK.0) as u32) }?;
                return Ok(false);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn set_output(&self, stream: Option<&AudioStream>) -> Result<()> {
        let output: Option<IUnknown> = match stream {
            Some(stream) => Some(stream.to_sapi().cast()?),
            None => None,
        };
        unsafe { self.intf.SetOutput(output, true) }?;
        Ok(())
    }
}

impl Driver for SapiDriver {
    fn name(&self) -> &'static str {
        "sapi5"
    }

    fn voices(&mut self) -> Result<Vec<Voice>> {
        Ok(self.installed_voices()?.iter().map(|(voice, _)| voice.clone()).collect())
    }

    fn voice(&mut self) -> Result<Option<Voice>> {
        let token = Token::from_sapi(unsafe { self.intf.GetVoice() }?);
        voice_from_token(&token).map(Some)
    }

    fn set_voice(&mut self, query: &str) -> Result<()> {
        let voices = self.installed_voices()?;
        let plain: Vec<Voice> = voices.iter().map(|(voice, _)| voice.clone()).collect();
        let id = resolve_voice(&plain, query)?.id.clone();
        let token = voices
            .iter()
            .find(|(voice, _)| voice.id == id)
            .map(|(_, token)| token.clone())
            .ok_or(crate::Error::UnknownVoice(id))?;
        unsafe { self.intf.SetVoice(&token.intf.0) }?;
        Ok(())
    }

    fn rate(&self) -> Result<Rate> {
        let sapi = unsafe { out_to_ret(|out| self.intf.GetRate(out)) }?;
        Ok(Rate::new((BASE_WPM * RATE_STEP.powi(sapi)).round() as u32))
    }

    fn set_rate(&mut self, rate: Rate) -> Result<()> {
        unsafe { self.intf.SetRate(sapi_rate(rate)) }?;
        Ok(())
    }

    fn volume(&self) -> Result<Volume> {
        let sapi = unsafe { out_to_ret(|out| self.intf.GetVolume(out)) }?;
        Ok(Volume::new(sapi as f32 / 100.0))
    }

    fn set_volume(&mut self, volume: Volume) -> Result<()> {
        unsafe { self.intf.SetVolume(volume.percent() as u16) }?;
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
        on_word: &mut dyn FnMut(usize, usize),
        interrupt: &Interrupt,
    ) -> Result<bool> {
        let (contents, flags, offset) = self.speech(text);
        let stream = unsafe { self.intf.Speak(contents.as_str(), flags | SPF_ASYNC.0 as u32) }?;
        self.wait(stream, offset, on_word, interrupt)
    }

    fn save_to_file(&mut self, text: &str, path: &Path, interrupt: &Interrupt) -> Result<bool> {
        let stream = AudioStream::create_file(path, &AudioFormat::default())?;
        self.set_output(Some(&stream))?;
        let (contents, flags, offset) = self.speech(text);
        let spoken = unsafe { self.intf.Speak(contents.as_str(), flags | SPF_ASYNC.0 as u32) }
            .map_err(crate::Error::from)
            .and_then(|number| self.wait(number, offset, &mut |_, _| {}, interrupt));
        self.set_output(None)?;
        stream.close()?;
        spoken
    }
}

fn voice_from_token(token: &Token) -> Result<Voice> {
    let id = token.id()?;
    let name = token.opt_attr("Name").unwrap_or_else(|| id.clone());
    let mut voice = Voice::new(id, name);
    voice.languages = token
        .opt_attr("Language")
        .map(|langs| {
            langs
                .split(';')
                .filter_map(Locale::from_hex)
                .filter_map(|locale| locale.name())
                .collect()
        })
        .unwrap_or_default();
    voice.gender = token.opt_attr("Gender").and_then(|s| VoiceGender::from_str(&s).ok());
    voice.age = token.opt_attr("Age").and_then(|s| VoiceAge::from_str(&s).ok());
    Ok(voice)
}

/// Whether the status reports that SAPI is done with the given stream.
fn finished(status: &SPVOICESTATUS, stream: u32) -> bool {
    status.ulCurrentStream >= stream && status.dwRunningState == SPRS_DONE.0 as u32
}

fn sapi_rate(rate: Rate) -> i32 {
    ((rate.value() as f64 / BASE_WPM).ln() / RATE_STEP.ln()).round().clamp(-10.0, 10.0) as i32
}

fn sapi_pitch(pitch: Pitch) -> i32 {
    ((pitch.value() as i32 - 50) as f64 / 5.0).round().clamp(-10.0, 10.0) as i32
}
