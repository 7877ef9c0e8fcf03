//! Occurrence counter

use std::collections::HashMap;
use std::hash::Hash;

/// Counts how many times each key has been seen
///
/// Used while decoding one structure to find out which occurrence of a
/// repeated tag the current TLV is. A counter lives for a single decode call.
#[derive(Debug)]
pub struct Counter<K> {
    counts: HashMap<K, usize>,
}

impl<K: Hash + Eq> Counter<K> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Returns how many times `key` was counted before and increments it
    pub fn count(&mut self, key: K) -> usize {
        let count = self.counts.entry(key).or_insert(0);
        let previous = *count;
        *count += 1;
        previous
    }
}

impl<K: Hash + Eq> Default for Counter<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_returns_previous_occurrences() {
        let mut counter = Counter::new();
        assert_eq!(counter.count("a"), 0);
        assert_eq!(counter.count("a"), 1);
        assert_eq!(counter.count("b"), 0);
        assert_eq!(counter.count("a"), 2);
        assert_eq!(counter.count("c"), 0);
    }
}
