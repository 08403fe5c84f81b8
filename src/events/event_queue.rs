use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use crate::events::Event;

/// Heap entry: an event plus the order in which it was inserted.
#[derive(Debug)]
struct Scheduled {
    event: Event,
    seq: u64,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest time first, then first inserted.
        self.event
            .time
            .total_cmp(&other.event.time)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-priority queue of predicted events.
///
/// Only insertion and extraction of the earliest event are supported. Stale
/// events are not removed on insertion; callers check [`Event::is_valid`] when
/// popping. Events with equal times come out in insertion order.
///
/// # Examples
///
/// ```
/// use rs_nbody::events::{Event, EventKind, EventQueue};
///
/// let mut queue = EventQueue::new();
/// queue.insert(Event::tick(2.0));
/// queue.insert(Event::tick(0.5));
///
/// assert_eq!(queue.extract_min().map(|e| e.time), Some(0.5));
/// assert_eq!(queue.extract_min().map(|e| e.kind), Some(EventKind::Tick));
/// assert!(queue.extract_min().is_none());
/// ```
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { event, seq }));
    }

    /// Removes and returns the earliest event, or `None` when empty.
    pub fn extract_min(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(scheduled)| scheduled.event)
    }

    /// Earliest event without removing it.
    pub fn peek_min(&self) -> Option<&Event> {
        self.heap.peek().map(|Reverse(scheduled)| &scheduled.event)
    }

    /// Drops every queued event. Sequence numbers keep counting so ordering
    /// stays consistent across cycles.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Extend<Event> for EventQueue {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.insert(event);
        }
    }
}
