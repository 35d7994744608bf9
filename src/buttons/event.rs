//! Button events and the queue that carries them
//! Scan path (possibly an interrupt) produces, the application loop consumes

use heapless::spsc::{Consumer, Producer, Queue};
use portable_atomic::{AtomicU32, Ordering};

/// Maximum number of events that can be queued per button group
pub const EVENT_QUEUE_SIZE: usize = 16;

/// `heapless` SPSC queues keep one slot free
const QUEUE_SLOTS: usize = EVENT_QUEUE_SIZE + 1;

pub(crate) type EventProducer<'q> = Producer<'q, ButtonEvent, QUEUE_SLOTS>;

/// Kind of gesture a button reported
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonEventType {
    /// Nothing to report for this scan
    #[default]
    None,
    /// One click
    Single,
    /// Auto-repeat while held, `repeat_count` tells how many so far
    SingleRepeated,
    /// Burst of `click_count` clicks
    Multi,
    /// Held for exactly the long threshold
    Long,
    /// Held for exactly the long-long threshold
    LongLong,
}

/// One classified gesture
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button_name: &'static str,
    pub event_type: ButtonEventType,
    pub click_count: u8,
    pub repeat_count: u8,
}

impl ButtonEvent {
    pub const fn is_none(&self) -> bool {
        matches!(self.event_type, ButtonEventType::None)
    }
}

/// Storage behind a button group's event FIFO.
///
/// Lives outside the group (typically in a `StaticCell`) so that the producer
/// half can move into interrupt context while the consumer half stays with the
/// application loop.
pub struct EventQueue {
    queue: Queue<ButtonEvent, QUEUE_SLOTS>,
    dropped: AtomicU32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: AtomicU32::new(0),
        }
    }

    pub(crate) fn split(&mut self) -> (EventSink<'_>, ButtonEvents<'_>) {
        let (producer, consumer) = self.queue.split();
        let dropped = &self.dropped;
        (
            EventSink { producer, dropped },
            ButtonEvents { consumer, dropped },
        )
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half, owned by the button group
pub(crate) struct EventSink<'q> {
    producer: EventProducer<'q>,
    dropped: &'q AtomicU32,
}

impl EventSink<'_> {
    /// Enqueue without blocking. A full queue drops the new event.
    pub(crate) fn push(&mut self, event: ButtonEvent) {
        if let Err(event) = self.producer.enqueue(event) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            trace!("event queue full, dropped {:?}", event.event_type);
        }
    }

    pub(crate) fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half, polled by the application loop
pub struct ButtonEvents<'q> {
    consumer: Consumer<'q, ButtonEvent, QUEUE_SLOTS>,
    dropped: &'q AtomicU32,
}

impl ButtonEvents<'_> {
    /// Take the oldest queued event, `None` when nothing is waiting
    pub fn poll_event(&mut self) -> Option<ButtonEvent> {
        self.consumer.dequeue()
    }

    /// Number of events waiting
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most events that can wait at once
    pub const fn capacity(&self) -> usize {
        EVENT_QUEUE_SIZE
    }

    /// Events discarded because the queue was full
    pub fn dropped_events(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(n: u8) -> ButtonEvent {
        ButtonEvent {
            button_name: "test",
            event_type: ButtonEventType::Single,
            click_count: n,
            repeat_count: 0,
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = EventQueue::new();
        let (mut sink, mut events) = queue.split();
        assert_eq!(events.poll_event(), None);

        sink.push(click(1));
        sink.push(click(2));
        assert_eq!(events.len(), 2);
        assert_eq!(events.poll_event(), Some(click(1)));
        assert_eq!(events.poll_event(), Some(click(2)));
        assert!(events.is_empty());
    }

    #[test]
    fn test_full_queue_drops_newest() {
        let mut queue = EventQueue::new();
        let (mut sink, mut events) = queue.split();
        for n in 0..(EVENT_QUEUE_SIZE as u8 + 5) {
            sink.push(click(n));
        }
        assert_eq!(events.len(), EVENT_QUEUE_SIZE);
        assert_eq!(events.capacity(), EVENT_QUEUE_SIZE);
        assert_eq!(events.dropped_events(), 5);
        assert_eq!(sink.dropped(), 5);

        // Oldest events survive
        for n in 0..EVENT_QUEUE_SIZE as u8 {
            assert_eq!(events.poll_event(), Some(click(n)));
        }
        assert_eq!(events.poll_event(), None);
    }

    #[test]
    fn test_none_event() {
        let event = ButtonEvent {
            event_type: ButtonEventType::None,
            ..click(0)
        };
        assert!(event.is_none());
        assert!(!click(1).is_none());
    }
}
