//! Speaks from async code without blocking the runtime.

use speak_lite::tokio::AsyncEngine;

#[tokio::main(flavor = "current_thread")]
async fn main() -> speak_lite::Result<()> {
    // The engine lives on its own thread, so any driver can be used from any runtime.
    let engine = AsyncEngine::spawn(|| speak_lite::init(None))?;

    engine.set_rate(150).await?;
    engine.speak("The speech has started.").await?;
    engine.speak_and_forget("This one nobody waits for.")?;
    engine.speak("But this one is awaited, after the one before it.").await?;
    Ok(())
}
