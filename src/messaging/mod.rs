// Messaging - typed notifications for view collaborators

pub mod channels;
pub mod notification;

pub use channels::{EventBus, EventConsumer, EventProducer, create_event_channel};
pub use notification::{CompositionEvent, TransportEvent};
