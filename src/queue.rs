//! Bounded multi-producer/multi-consumer job queue.
//!
//! A fixed-capacity ring buffer protected by a single mutex. Each operation
//! holds the lock for its entire body, which makes the structure safe for any
//! number of concurrent producers and consumers. Throughput is bounded by
//! lock contention, which is acceptable because jobs, not queue operations,
//! dominate cost.

use std::sync::Mutex;

/// Number of slots in the ring. One slot stays reserved so a full ring can be
/// told apart from an empty one, leaving room for `CAPACITY - 1` items. This
/// bounds the number of submitted-but-not-started jobs system-wide.
pub const CAPACITY: usize = 256;

/// A fixed-capacity queue whose operations never block on fullness or
/// emptiness.
pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,
}

struct Ring<T> {
    slots: Vec<Option<T>>,
    /// Next insert position.
    head: usize,
    /// Next remove position.
    tail: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(CAPACITY);
        slots.resize_with(CAPACITY, || None);
        BoundedQueue {
            ring: Mutex::new(Ring {
                slots,
                head: 0,
                tail: 0,
            }),
        }
    }

    /// Attempts to insert an item at the tail of the queue.
    ///
    /// Returns the item back to the caller if the queue is full. Fullness is
    /// not an error; callers retry after backing off. Never blocks.
    pub fn push_back(&self, item: T) -> Result<(), T> {
        let mut ring = self.ring.lock().unwrap();
        let head = ring.head;
        let next = (head + 1) % CAPACITY;
        if next == ring.tail {
            return Err(item);
        }
        ring.slots[head] = Some(item);
        ring.head = next;
        Ok(())
    }

    /// Removes and returns the item at the head of the queue, if any.
    /// Never blocks.
    pub fn pop_front(&self) -> Option<T> {
        let mut ring = self.ring.lock().unwrap();
        let tail = ring.tail;
        if tail == ring.head {
            return None;
        }
        let item = ring.slots[tail].take();
        debug_assert!(item.is_some());
        ring.tail = (tail + 1) % CAPACITY;
        item
    }

    /// Returns true if no items are queued. The answer may be stale by the
    /// time the caller acts on it unless the caller serializes with pushes
    /// externally.
    pub fn is_empty(&self) -> bool {
        let ring = self.ring.lock().unwrap();
        ring.tail == ring.head
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
