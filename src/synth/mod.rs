// Synth module - Voices for the built-in sound engine

pub mod envelope;
pub mod filter;
pub mod oscillator;
pub mod voice;
pub mod voice_manager;

pub use oscillator::WaveformType;
pub use voice_manager::VoiceManager;
