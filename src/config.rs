// Configuration - Editor, transport and synth defaults
// Loadable from RON; every field falls back to its default when absent

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::messaging::channels::DEFAULT_EVENT_CAPACITY;
use crate::sequencer::note::DEFAULT_VELOCITY;
use crate::sequencer::timeline::DEFAULT_TEMPO;
use crate::synth::oscillator::WaveformType;

/// Lowest key on the piano roll (C2)
pub const MIDI_NOTE_MIN: u8 = 36;
/// Highest key on the piano roll (C7)
pub const MIDI_NOTE_MAX: u8 = 96;
pub const DEFAULT_BARS: u32 = 16;
pub const BEATS_PER_BAR: u32 = 4;
pub const DEFAULT_LOOK_AHEAD_SECS: f64 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub composition: CompositionDefaults,
    pub transport: TransportConfig,
    pub synth: SynthConfig,
}

impl EditorConfig {
    /// Parse a RON document
    pub fn from_ron_str(input: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// Read and parse a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }
}

/// Defaults and limits for a new composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionDefaults {
    pub tempo: f64,
    pub bars: u32,
    pub beats_per_bar: u32,
    pub pitch_min: u8,
    pub pitch_max: u8,
    pub velocity: u8,
}

impl CompositionDefaults {
    /// Clamp a pitch into the playable key range
    pub fn clamp_pitch(&self, pitch: u8) -> u8 {
        let (lo, hi) = if self.pitch_min <= self.pitch_max {
            (self.pitch_min, self.pitch_max)
        } else {
            (self.pitch_max, self.pitch_min)
        };
        let hi = hi.min(127);
        pitch.clamp(lo.min(hi), hi)
    }
}

impl Default for CompositionDefaults {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            bars: DEFAULT_BARS,
            beats_per_bar: BEATS_PER_BAR,
            pitch_min: MIDI_NOTE_MIN,
            pitch_max: MIDI_NOTE_MAX,
            velocity: DEFAULT_VELOCITY,
        }
    }
}

/// Transport scheduling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Look-ahead horizon in seconds (converted to beats at the current tempo)
    pub look_ahead_secs: f64,
    /// Capacity of each subscriber's notification queue
    pub event_capacity: usize,
}

impl TransportConfig {
    /// Replace a look-ahead that is not a positive finite number with the
    /// default, and a zero queue capacity with the default capacity
    pub fn validated(mut self) -> Self {
        if !(self.look_ahead_secs.is_finite() && self.look_ahead_secs > 0.0) {
            log::warn!(
                "invalid look-ahead {} s, using {} s",
                self.look_ahead_secs,
                DEFAULT_LOOK_AHEAD_SECS
            );
            self.look_ahead_secs = DEFAULT_LOOK_AHEAD_SECS;
        }
        if self.event_capacity == 0 {
            self.event_capacity = DEFAULT_EVENT_CAPACITY;
        }
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            look_ahead_secs: DEFAULT_LOOK_AHEAD_SECS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Synth voice and output parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Sample rate used when rendering offline (device rate wins with cpal)
    pub sample_rate: f32,
    pub master_gain: f32,
    /// Attack ramp in seconds
    pub attack: f32,
    /// Release ramp in seconds
    pub release: f32,
    /// Peak voice gain at full velocity
    pub peak_gain: f32,
    pub waveform: WaveformType,
    /// Low-pass cutoff at velocity 0
    pub cutoff_base_hz: f32,
    /// Extra cutoff added at full velocity
    pub cutoff_velocity_hz: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            master_gain: 0.3,
            attack: 0.02,
            release: 0.1,
            peak_gain: 0.5,
            waveform: WaveformType::Triangle,
            cutoff_base_hz: 2000.0,
            cutoff_velocity_hz: 3000.0,
        }
    }
}
