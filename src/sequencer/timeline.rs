// Timeline - Musical time helpers
// Conversions between beats, seconds, pitches and display strings

use std::fmt;

/// Lowest accepted tempo in BPM
pub const MIN_TEMPO: f64 = 20.0;
/// Highest accepted tempo in BPM
pub const MAX_TEMPO: f64 = 300.0;
/// Tempo used when nothing else is specified
pub const DEFAULT_TEMPO: f64 = 120.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch classes that sit on black keys (C#, D#, F#, G#, A#)
const BLACK_KEYS: [u8; 5] = [1, 3, 6, 8, 10];

/// Tempo in BPM (Beats Per Minute), always inside [MIN_TEMPO, MAX_TEMPO]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Creates a tempo, clamping out-of-range input.
    /// NaN falls back to the default tempo.
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: clamp_tempo(bpm),
        }
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Set BPM value (clamped)
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = clamp_tempo(bpm);
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: DEFAULT_TEMPO }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

/// Clamp a raw BPM value into the accepted range
pub fn clamp_tempo(bpm: f64) -> f64 {
    if bpm.is_nan() {
        return DEFAULT_TEMPO;
    }
    bpm.clamp(MIN_TEMPO, MAX_TEMPO)
}

/// Convert a beat offset to seconds at the given tempo
pub fn beat_to_time(beat: f64, bpm: f64) -> f64 {
    (beat / bpm) * 60.0
}

/// Convert seconds to a beat offset at the given tempo
pub fn time_to_beat(seconds: f64, bpm: f64) -> f64 {
    (seconds * bpm) / 60.0
}

/// Snap a beat value to the nearest multiple of `snap`.
/// A non-positive snap leaves the value untouched.
pub fn snap_to_grid(beat: f64, snap: f64) -> f64 {
    if snap <= 0.0 || !snap.is_finite() {
        return beat;
    }
    (beat / snap).round() * snap
}

/// Frequency in Hz of a MIDI note number (A4 = 69 = 440 Hz)
pub fn midi_to_frequency(pitch: u8) -> f64 {
    440.0 * 2.0_f64.powf((pitch as f64 - 69.0) / 12.0)
}

/// Note name with octave, e.g. 60 -> "C4", 73 -> "C#5"
pub fn midi_to_note_name(pitch: u8) -> String {
    let octave = (pitch / 12) as i32 - 1;
    format!("{}{}", NOTE_NAMES[(pitch % 12) as usize], octave)
}

/// True when the pitch sits on a black piano key
pub fn is_black_key(pitch: u8) -> bool {
    BLACK_KEYS.contains(&(pitch % 12))
}

/// Format seconds as `M:SS.mmm`
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0).floor() as u64;
    let secs = seconds - (mins as f64) * 60.0;
    format!("{}:{:06.3}", mins, secs)
}
