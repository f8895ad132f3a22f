//! Lists the installed voices, then speaks a few words with the chosen voice, rate and volume.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::error;

use speak_lite::tts::{Pitch, Rate, Volume};
use speak_lite::{Config, DriverKind, Engine};

#[derive(Debug, Parser)]
#[command(name = "speak", version, about)]
struct Cli {
    /// Speech driver: espeak, sapi5 or dummy [env: SPEAK_DRIVER]
    #[arg(long)]
    driver: Option<DriverKind>,

    /// Voice identifier, name or language [env: SPEAK_VOICE] [default: brazil]
    #[arg(long)]
    voice: Option<String>,

    /// Words per minute [env: SPEAK_RATE] [default: 120]
    #[arg(long)]
    rate: Option<u32>,

    /// Volume between 0.0 and 1.0 [env: SPEAK_VOLUME] [default: 1.0]
    #[arg(long)]
    volume: Option<f32>,

    /// Base pitch between 0 and 99 [env: SPEAK_PITCH]
    #[arg(long)]
    pitch: Option<u32>,

    /// Write the speech to this WAV file instead of playing it
    #[arg(long, value_name = "WAV")]
    save: Option<PathBuf>,

    /// Only list the installed voices
    #[arg(long)]
    list: bool,

    /// What to say, one utterance per argument [default: amador programa]
    utterances: Vec<String>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            driver: self.driver,
            voice: self.voice.clone(),
            rate: self.rate.map(Rate::new),
            volume: self.volume.map(Volume::new),
            pitch: self.pitch.map(Pitch::new),
            espeak_program: None,
        }
    }
}

fn script_defaults() -> Config {
    Config {
        voice: Some("brazil".to_string()),
        rate: Some(Rate::new(120)),
        volume: Some(Volume::new(1.0)),
        ..Config::default()
    }
}

fn run(cli: Cli) -> speak_lite::Result<()> {
    let config = cli.config().or_env()?.or(script_defaults());
    let mut engine: Engine = config.build_engine()?;

    for voice in engine.voices()? {
        println!("{} {} {:?}", voice.id, voice.name, voice.languages);
    }
    if cli.list {
        return Ok(());
    }

    config.apply(&mut engine);
    let utterances = if cli.utterances.is_empty() {
        vec!["amador".to_string(), "programa".to_string()]
    } else {
        cli.utterances
    };
    match cli.save {
        Some(path) => engine.save_to_file(utterances.join(" "), path),
        None => utterances.into_iter().for_each(|text| engine.say(text)),
    }
    engine.run_and_wait()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(err) = speak_lite::initialize() {
        error!("{}", err);
        return ExitCode::FAILURE;
    }
    let result = run(cli);
    speak_lite::finalize();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("speak: {}", err);
            ExitCode::FAILURE
        }
    }
}
