// Sequencer module
// Note store, musical time helpers and the look-ahead transport

pub mod composition;
pub mod note;
pub mod scheduler;
pub mod ticker;
pub mod timeline;
pub mod transport;

pub use composition::Composition;
pub use note::{Note, NoteId, NoteUpdate};
pub use scheduler::{EventKey, Phase, PendingEvents, ScheduledEvent};
pub use ticker::FrameTicker;
pub use timeline::{Tempo, beat_to_time, time_to_beat};
pub use transport::{PlaybackState, Transport, TransportState};
