//! This example shows how to iterate over the available TTS voices.

use std::io::{self, Write};

use speak_lite::tts::Voice;
use speak_lite::Engine;

fn choose_voice(engine: &mut Engine) -> speak_lite::Result<Option<Voice>> {
    // Collect all the installed voices, without any filters.
    let mut voices = engine.voices()?;

    // Display the list to the user.
    println!("Available voices:");
    for (idx, voice) in voices.iter().enumerate() {
        println!("{}) {} {:?}", idx + 1, voice.name, voice.languages);
    }

    // Prompt the user to select a voice from the list.
    print!("Choose a voice: ");
    io::stdout().flush()?;

    // Get the user's selection.
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    // If the selection is valid, return the selected voice.
    Ok(match line.trim_end().parse::<usize>() {
        Ok(idx) if idx > 0 && idx <= voices.len() => Some(voices.swap_remove(idx - 1)),
        _ => None,
    })
}

fn main() -> speak_lite::Result<()> {
    speak_lite::initialize()?;
    let mut engine = speak_lite::init(None)?;

    // Have the user choose a voice from the list of available voices.
    let voice = match choose_voice(&mut engine)? {
        Some(voice) => voice,
        None => return Ok(()),
    };

    // Speak a phrase in the selected voice.
    engine.set_voice(voice.id);
    engine.say("The pellet with the poison's in the flagon with the dragon.");
    engine.run_and_wait()?;

    speak_lite::finalize();
    Ok(())
}
