// Communication channels lock-free
// One SPSC ring buffer per subscriber, fanned out by the publisher

use ringbuf::traits::{Producer, Split};
use ringbuf::HeapRb;

pub type EventProducer<E> = ringbuf::HeapProd<E>;
pub type EventConsumer<E> = ringbuf::HeapCons<E>;

/// Default capacity of a subscriber queue
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

pub fn create_event_channel<E>(capacity: usize) -> (EventProducer<E>, EventConsumer<E>) {
    let rb = HeapRb::<E>::new(capacity.max(1));
    rb.split()
}

struct Subscriber<E> {
    tx: EventProducer<E>,
    /// Set while events are being dropped, so the warning is logged once
    overflowing: bool,
}

/// Fan-out publisher of typed events.
///
/// Publishing never blocks: when a subscriber's queue is full the event is
/// dropped for that subscriber only.
pub struct EventBus<E> {
    subscribers: Vec<Subscriber<E>>,
    capacity: usize,
}

impl<E: Clone> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            capacity,
        }
    }

    /// Register a new subscriber and hand back its end of the queue
    pub fn subscribe(&mut self) -> EventConsumer<E> {
        let (tx, rx) = create_event_channel(self.capacity);
        self.subscribers.push(Subscriber {
            tx,
            overflowing: false,
        });
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&mut self, event: E) {
        for (index, sub) in self.subscribers.iter_mut().enumerate() {
            match sub.tx.try_push(event.clone()) {
                Ok(()) => sub.overflowing = false,
                Err(_) if !sub.overflowing => {
                    sub.overflowing = true;
                    log::warn!("subscriber {} queue full, dropping notifications", index);
                }
                Err(_) => {}
            }
        }
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
