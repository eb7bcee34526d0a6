// Composition - The note store
// Holds tempo, length and every note; the single source of truth for playback

use std::collections::{BTreeMap, BTreeSet};

use crate::config::CompositionDefaults;
use crate::messaging::channels::{EventBus, EventConsumer};
use crate::messaging::notification::CompositionEvent;
use crate::sequencer::note::{MIN_DURATION, Note, NoteId, NoteUpdate};
use crate::sequencer::timeline::Tempo;

/// All notes plus the musical frame they live in.
///
/// Mutations never fail: out-of-range input is clamped and unknown ids are
/// ignored. Each mutation publishes its specific `CompositionEvent` followed
/// by `CompositionEvent::Change`.
#[derive(Debug)]
pub struct Composition {
    tempo: Tempo,
    bars: u32,
    beats_per_bar: u32,

    /// Keyed by id, which also fixes the iteration order of every query
    notes: BTreeMap<NoteId, Note>,

    selection: BTreeSet<NoteId>,

    defaults: CompositionDefaults,
    events: EventBus<CompositionEvent>,
}

impl Composition {
    /// Empty composition with the stock defaults (120 BPM, 16 bars of 4/4)
    pub fn new() -> Self {
        Self::with_defaults(CompositionDefaults::default())
    }

    pub fn with_defaults(defaults: CompositionDefaults) -> Self {
        Self {
            tempo: Tempo::new(defaults.tempo),
            bars: defaults.bars.max(1),
            beats_per_bar: defaults.beats_per_bar.max(1),
            notes: BTreeMap::new(),
            selection: BTreeSet::new(),
            defaults,
            events: EventBus::default(),
        }
    }

    /// Register a view collaborator; it receives every later event
    pub fn subscribe(&mut self) -> EventConsumer<CompositionEvent> {
        self.events.subscribe()
    }

    pub fn defaults(&self) -> &CompositionDefaults {
        &self.defaults
    }

    // ---- frame -------------------------------------------------------------

    /// Tempo in BPM
    pub fn tempo(&self) -> f64 {
        self.tempo.bpm()
    }

    /// Set the tempo, clamped into [20, 300]
    pub fn set_tempo(&mut self, bpm: f64) {
        self.tempo.set_bpm(bpm);
        self.events
            .publish(CompositionEvent::TempoChange(self.tempo.bpm()));
        self.events.publish(CompositionEvent::Change);
    }

    pub fn bars(&self) -> u32 {
        self.bars
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    /// Change the length of the composition (at least one bar)
    pub fn set_bars(&mut self, bars: u32) {
        self.bars = bars.max(1);
        self.events.publish(CompositionEvent::Change);
    }

    /// Composition length in beats
    pub fn total_beats(&self) -> f64 {
        self.bars as f64 * self.beats_per_bar as f64
    }

    // ---- mutations ---------------------------------------------------------

    /// Add a note (replacing any note with the same id) and return its id
    pub fn add_note(&mut self, note: Note) -> NoteId {
        let note = self.normalize(note);
        self.notes.insert(note.id, note);
        self.events.publish(CompositionEvent::NoteAdd(note));
        self.events.publish(CompositionEvent::Change);
        note.id
    }

    /// Apply a partial update. Unknown ids are ignored.
    pub fn update_note(&mut self, id: NoteId, update: NoteUpdate) -> Option<Note> {
        let mut note = *self.notes.get(&id)?;
        update.apply_to(&mut note);
        let note = self.normalize(note);
        self.notes.insert(id, note);

        self.events.publish(CompositionEvent::NoteUpdate(note));
        self.events.publish(CompositionEvent::Change);
        Some(note)
    }

    /// Remove a note. Unknown ids are ignored.
    pub fn delete_note(&mut self, id: NoteId) -> Option<Note> {
        let note = self.notes.remove(&id)?;
        self.selection.remove(&id);

        self.events.publish(CompositionEvent::NoteDelete(note));
        self.events.publish(CompositionEvent::Change);
        Some(note)
    }

    /// Remove every note
    pub fn clear_all(&mut self) {
        self.notes.clear();
        self.selection.clear();
        self.events.publish(CompositionEvent::Clear);
        self.events.publish(CompositionEvent::Change);
    }

    /// Replace the whole composition in one step (used by loaders)
    pub fn replace(&mut self, tempo: f64, bars: u32, beats_per_bar: u32, notes: Vec<Note>) {
        self.tempo = Tempo::new(tempo);
        self.bars = bars.max(1);
        self.beats_per_bar = beats_per_bar.max(1);
        self.notes.clear();
        for note in notes {
            let note = self.normalize(note);
            self.notes.insert(note.id, note);
        }
        self.selection.clear();

        self.events.publish(CompositionEvent::Load);
        self.events.publish(CompositionEvent::Change);
    }

    // ---- queries -----------------------------------------------------------

    /// Every note, in id order
    pub fn all_notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.notes.values()
    }

    pub fn note_by_id(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes overlapping the half-open beat range [start, end)
    pub fn notes_overlapping(&self, start: f64, end: f64) -> Vec<&Note> {
        self.notes
            .values()
            .filter(|n| n.overlaps(start, end))
            .collect()
    }

    /// First note (in id order) of this pitch sounding at `beat`
    pub fn note_at(&self, beat: f64, pitch: u8) -> Option<&Note> {
        self.notes
            .values()
            .find(|n| n.pitch == pitch && n.contains_beat(beat))
    }

    // ---- selection ---------------------------------------------------------

    /// Select a note, optionally keeping the current selection
    pub fn select_note(&mut self, id: NoteId, add_to_selection: bool) {
        if !add_to_selection {
            self.selection.clear();
        }
        if self.notes.contains_key(&id) {
            self.selection.insert(id);
        }
        self.publish_selection();
    }

    pub fn deselect_note(&mut self, id: NoteId) {
        self.selection.remove(&id);
        self.publish_selection();
    }

    pub fn toggle_selection(&mut self, id: NoteId) {
        if !self.selection.remove(&id) && self.notes.contains_key(&id) {
            self.selection.insert(id);
        }
        self.publish_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.publish_selection();
    }

    pub fn is_selected(&self, id: NoteId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selected_notes(&self) -> Vec<&Note> {
        self.selection
            .iter()
            .filter_map(|id| self.notes.get(id))
            .collect()
    }

    fn publish_selection(&mut self) {
        let ids = self.selection.iter().copied().collect();
        self.events.publish(CompositionEvent::SelectionChange(ids));
    }

    /// Bring a note's fields into their valid ranges
    fn normalize(&self, mut note: Note) -> Note {
        note.pitch = self.defaults.clamp_pitch(note.pitch);
        note.velocity = note.velocity.min(127);
        if !note.start.is_finite() || note.start < 0.0 {
            note.start = 0.0;
        }
        if !note.duration.is_finite() || note.duration < MIN_DURATION {
            note.duration = MIN_DURATION;
        }
        note
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}
