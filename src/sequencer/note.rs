// Note representation for the piano roll
// A note is a pitch placed on the beat grid with a duration and a velocity

use crate::sequencer::timeline::{midi_to_frequency, midi_to_note_name};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shortest duration a note may have, in beats (a 256th note)
pub const MIN_DURATION: f64 = 1.0 / 64.0;

/// Velocity used when none is given
pub const DEFAULT_VELOCITY: u8 = 100;

/// Global note ID generator (atomic for thread-safety)
static NEXT_NOTE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque unique identifier for notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    /// Generate a fresh, never-before-issued note ID
    pub fn generate() -> Self {
        Self(NEXT_NOTE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value (ids read back from a saved composition).
    /// Bumps the generator so later `generate()` calls never collide with it.
    pub fn from_raw(raw: u64) -> Self {
        NEXT_NOTE_ID.fetch_max(raw.saturating_add(1), Ordering::Relaxed);
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A note in the composition
///
/// Times are in beats. The end is derived from start + duration on demand
/// and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Unique identifier for this note
    pub id: NoteId,

    /// MIDI note number (60 = C4)
    pub pitch: u8,

    /// Start position in beats (>= 0)
    pub start: f64,

    /// Duration in beats (> 0)
    pub duration: f64,

    /// MIDI velocity (0-127)
    pub velocity: u8,
}

impl Note {
    /// Creates a note with a freshly generated id
    pub fn new(pitch: u8, start: f64, duration: f64, velocity: u8) -> Self {
        Self::with_id(NoteId::generate(), pitch, start, duration, velocity)
    }

    /// Creates a note with a known id
    pub fn with_id(id: NoteId, pitch: u8, start: f64, duration: f64, velocity: u8) -> Self {
        Self {
            id,
            pitch,
            start,
            duration,
            velocity,
        }
    }

    /// End position in beats
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Check if this note sounds at a given beat (start inclusive, end exclusive)
    pub fn contains_beat(&self, beat: f64) -> bool {
        beat >= self.start && beat < self.end()
    }

    /// Check if this note overlaps the half-open range [start, end)
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start < end && self.end() > start
    }

    /// Same musical content under a new id
    pub fn duplicate(&self) -> Self {
        Self::new(self.pitch, self.start, self.duration, self.velocity)
    }

    /// Get the note name (e.g., "C4", "A#5")
    pub fn note_name(&self) -> String {
        midi_to_note_name(self.pitch)
    }

    /// Frequency in Hz
    pub fn frequency(&self) -> f64 {
        midi_to_frequency(self.pitch)
    }
}

/// Partial update for a note; `None` fields are left unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoteUpdate {
    pub pitch: Option<u8>,
    pub start: Option<f64>,
    pub duration: Option<f64>,
    pub velocity: Option<u8>,
}

impl NoteUpdate {
    pub fn pitch(mut self, pitch: u8) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn velocity(mut self, velocity: u8) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Apply the set fields onto a note
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(pitch) = self.pitch {
            note.pitch = pitch;
        }
        if let Some(start) = self.start {
            note.start = start;
        }
        if let Some(duration) = self.duration {
            note.duration = duration;
        }
        if let Some(velocity) = self.velocity {
            note.velocity = velocity;
        }
    }
}
