//! A bounded sliding window over the most recent values of a run.

use std::collections::VecDeque;

/// Keeps the latest `capacity` values in insertion order.
///
/// Pushing onto a full trace evicts the oldest entry. Evicting history is the
/// intended retention policy, not an error: the demonstration only ever shows
/// the recent past.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace<V> {
    buf: VecDeque<V>,
    capacity: usize,
}

impl<V> Trace<V> {
    /// Creates an empty trace that retains at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Trace capacity must be positive.");
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `value`, evicting the oldest entry if the trace is full.
    pub fn push(&mut self, value: V) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The maximum number of values retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates from the oldest retained value to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.buf.iter()
    }

    /// The most recently pushed value.
    pub fn latest(&self) -> Option<&V> {
        self.buf.back()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_up_to_capacity() {
        let mut trace = Trace::new(3);
        assert!(trace.is_empty());
        trace.push(1);
        trace.push(2);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.latest(), Some(&2));
    }

    #[test]
    fn evicts_oldest_first() {
        let mut trace = Trace::new(3);
        for v in 1..=5 {
            trace.push(v);
        }
        assert_eq!(trace.len(), 3);
        let kept: Vec<i32> = trace.iter().copied().collect();
        assert_eq!(kept, vec![3, 4, 5]);
        assert_eq!(trace.latest(), Some(&5));
    }

    #[test]
    fn capacity_one_keeps_only_the_latest() {
        let mut trace = Trace::new(1);
        trace.push("a");
        trace.push("b");
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.latest(), Some(&"b"));
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut trace = Trace::new(2);
        trace.push(1.0);
        trace.push(2.0);
        trace.clear();
        assert!(trace.is_empty());
        assert_eq!(trace.capacity(), 2);
        trace.push(3.0);
        assert_eq!(trace.latest(), Some(&3.0));
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_is_rejected() {
        Trace::<u8>::new(0);
    }
}
