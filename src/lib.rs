// Piano roll - Library exports for the binary, tests and benchmarks

pub mod audio;
pub mod config;
pub mod messaging;
pub mod project;
pub mod sequencer;
pub mod synth;

// Re-export commonly used types for convenience
pub use audio::engine::{OutputMode, SoundEngine, SynthEngine};
pub use audio::{AudioClock, AudioError};
pub use config::{CompositionDefaults, EditorConfig, SynthConfig, TransportConfig};
pub use messaging::channels::{EventBus, EventConsumer};
pub use messaging::notification::{CompositionEvent, TransportEvent};
pub use project::{CompositionData, NoteData, ProjectError};
pub use sequencer::{
    Composition, FrameTicker, Note, NoteId, NoteUpdate, PlaybackState, Tempo, Transport,
    TransportState,
};
pub use synth::oscillator::WaveformType;
