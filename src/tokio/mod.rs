//! Support for async operations running on Tokio.

mod tts;

pub use tts::AsyncEngine;
