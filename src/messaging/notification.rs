// Notifications - Store and transport → view collaborators

use crate::sequencer::note::{Note, NoteId};

/// Change published by the composition store.
///
/// Every mutation publishes its specific event followed by `Change`.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositionEvent {
    NoteAdd(Note),
    NoteUpdate(Note),
    NoteDelete(Note),
    Clear,
    /// Generic "composition changed"
    Change,
    TempoChange(f64),
    SelectionChange(Vec<NoteId>),
    Load,
}

impl CompositionEvent {
    /// Wire name used by the view layer
    pub fn name(&self) -> &'static str {
        match self {
            CompositionEvent::NoteAdd(_) => "noteAdd",
            CompositionEvent::NoteUpdate(_) => "noteUpdate",
            CompositionEvent::NoteDelete(_) => "noteDelete",
            CompositionEvent::Clear => "clear",
            CompositionEvent::Change => "change",
            CompositionEvent::TempoChange(_) => "tempoChange",
            CompositionEvent::SelectionChange(_) => "selectionChange",
            CompositionEvent::Load => "load",
        }
    }
}

/// Change published by the transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    Play,
    Pause,
    Stop,
    /// New playhead position in beats
    PositionChange(f64),
}

impl TransportEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TransportEvent::Play => "play",
            TransportEvent::Pause => "pause",
            TransportEvent::Stop => "stop",
            TransportEvent::PositionChange(_) => "positionChange",
        }
    }
}
