// Module audio - Sound engine boundary, clock and device output

pub mod engine;
#[cfg(feature = "audio-output")]
pub mod output;
pub mod timing;

pub use engine::{SoundEngine, SynthEngine};
pub use timing::AudioClock;

/// Failures acquiring or driving the audio output
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Audio configuration error: {0}")]
    Config(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to build output stream: {0}")]
    BuildStream(String),

    #[error("Audio stream error: {0}")]
    Stream(String),

    #[error("Device output needs the `audio-output` feature")]
    OutputUnavailable,
}
