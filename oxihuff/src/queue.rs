//! Min-priority queue with first-in-first-out tie breaking.
//!
//! Entries are ordered by `(frequency, insertion sequence)`. Two entries with
//! the same frequency come out in the order they went in, which is what makes
//! tree construction reproducible on the decoding side.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<T> {
    frequency: u64,
    sequence: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u64, u64) {
        (self.frequency, self.sequence)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Priority queue that pops the lowest frequency first, oldest first on ties.
#[derive(Debug)]
pub struct StableQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_sequence: u64,
}

impl<T> Default for StableQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StableQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Create an empty queue with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Insert `item` with the given frequency.
    pub fn push(&mut self, frequency: u64, item: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(Entry {
            frequency,
            sequence,
            item,
        }));
    }

    /// Remove the lowest-ordered entry.
    pub fn pop(&mut self) -> Option<(u64, T)> {
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.frequency, entry.item))
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(queue: &mut StableQueue<T>) -> Vec<(u64, T)> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn test_orders_by_frequency() {
        let mut queue = StableQueue::new();
        queue.push(5, 'a');
        queue.push(1, 'b');
        queue.push(3, 'c');
        assert_eq!(drain(&mut queue), vec![(1, 'b'), (3, 'c'), (5, 'a')]);
    }

    #[test]
    fn test_ties_are_fifo() {
        let mut queue = StableQueue::new();
        for item in ['x', 'y', 'z', 'w'] {
            queue.push(2, item);
        }
        queue.push(1, 'f');
        let order: Vec<char> = drain(&mut queue).into_iter().map(|(_, c)| c).collect();
        assert_eq!(order, vec!['f', 'x', 'y', 'z', 'w']);
    }

    #[test]
    fn test_reinserted_item_goes_behind_equal_frequencies() {
        let mut queue = StableQueue::new();
        queue.push(1, "a");
        queue.push(1, "b");
        queue.push(2, "c");
        let (fa, _) = queue.pop().unwrap();
        let (fb, _) = queue.pop().unwrap();
        queue.push(fa + fb, "ab");
        assert_eq!(queue.pop(), Some((2, "c")));
        assert_eq!(queue.pop(), Some((2, "ab")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_len() {
        let mut queue = StableQueue::with_capacity(4);
        assert!(queue.is_empty());
        queue.push(1, ());
        queue.push(1, ());
        assert_eq!(queue.len(), 2);
        queue.pop();
        assert_eq!(queue.len(), 1);
    }
}
