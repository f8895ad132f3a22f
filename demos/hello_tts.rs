//! A bare-bones TTS example.

fn main() -> speak_lite::Result<()> {
    // Initialize the speech subsystem.
    speak_lite::initialize()?;

    // Create an engine with the platform's default driver.
    let mut engine = speak_lite::init(None)?;

    // Queue the phrase and wait until the speech is finished.
    engine.say("Hello, world!");
    engine.run_and_wait()?;

    // We don't need the engine anymore. Clean up and free the resources.
    speak_lite::finalize();
    Ok(())
}
