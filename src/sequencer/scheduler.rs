// Scheduler - Pending sound events keyed by (note, phase)
//
// The transport commits only a short look-ahead of events at a time. Every
// pending event lives in one keyed map, so clearing it cancels all of them;
// the update tick takes whatever is due in deadline order.

use std::collections::HashMap;

use crate::sequencer::note::NoteId;

/// Which half of a note an event belongs to.
///
/// Declaration order is the firing order for equal deadlines: a note-off
/// must land before a note-on on the same instant, otherwise a note ending
/// exactly where a same-pitch note begins would silence its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Off,
    On,
}

/// Composite id of a pending event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub note: NoteId,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Start the voice; once it fires, a note-off is registered for `off_at`
    NoteOn { pitch: u8, velocity: u8, off_at: f64 },
    NoteOff { pitch: u8 },
}

/// A sound action bound to one note, due at an absolute engine time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub note: NoteId,
    /// Engine clock time in seconds
    pub at: f64,
    pub action: Action,
}

impl ScheduledEvent {
    pub fn note_on(note: NoteId, at: f64, pitch: u8, velocity: u8, off_at: f64) -> Self {
        Self {
            note,
            at,
            action: Action::NoteOn {
                pitch,
                velocity,
                off_at,
            },
        }
    }

    pub fn note_off(note: NoteId, at: f64, pitch: u8) -> Self {
        Self {
            note,
            at,
            action: Action::NoteOff { pitch },
        }
    }

    pub fn phase(&self) -> Phase {
        match self.action {
            Action::NoteOn { .. } => Phase::On,
            Action::NoteOff { .. } => Phase::Off,
        }
    }

    pub fn key(&self) -> EventKey {
        EventKey {
            note: self.note,
            phase: self.phase(),
        }
    }
}

/// Set of not-yet-fired events
#[derive(Debug, Default)]
pub struct PendingEvents {
    events: HashMap<EventKey, ScheduledEvent>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event; an event with the same key is replaced and returned
    pub fn insert(&mut self, event: ScheduledEvent) -> Option<ScheduledEvent> {
        self.events.insert(event.key(), event)
    }

    pub fn contains(&self, key: &EventKey) -> bool {
        self.events.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> + '_ {
        self.events.values()
    }

    /// Earliest deadline still pending
    pub fn next_deadline(&self) -> Option<f64> {
        self.events.values().map(|e| e.at).min_by(f64::total_cmp)
    }

    /// Remove and return every event due at or before `now`, in firing order
    pub fn take_due(&mut self, now: f64) -> Vec<ScheduledEvent> {
        let due_keys: Vec<EventKey> = self
            .events
            .values()
            .filter(|e| e.at <= now)
            .map(|e| e.key())
            .collect();

        let mut due: Vec<ScheduledEvent> = due_keys
            .iter()
            .filter_map(|key| self.events.remove(key))
            .collect();
        sort_for_firing(&mut due);
        due
    }

    /// Remove and return every pending note-off, in firing order
    pub fn take_note_offs(&mut self) -> Vec<ScheduledEvent> {
        let mut offs = Vec::new();
        self.events.retain(|_, e| {
            if e.phase() == Phase::Off {
                offs.push(*e);
                false
            } else {
                true
            }
        });
        sort_for_firing(&mut offs);
        offs
    }

    /// Cancel everything; returns how many events were dropped
    pub fn clear(&mut self) -> usize {
        let cancelled = self.events.len();
        self.events.clear();
        cancelled
    }
}

fn sort_for_firing(events: &mut [ScheduledEvent]) {
    events.sort_by(|a, b| a.at.total_cmp(&b.at).then(a.phase().cmp(&b.phase())));
}
