use std::collections::VecDeque;

use crate::snapshot::VisitorSnapshot;

/// Default number of samples kept for the sparkline.
pub const DEFAULT_CAPACITY: usize = 8;

/// Fixed-capacity buffer of recent visitor counts, oldest first.
///
/// The length always equals the capacity: short inputs are left-padded with
/// zeros and long inputs lose their oldest samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingHistory {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl RollingHistory {
    /// Create a zero-filled buffer. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: std::iter::repeat_n(0, capacity).collect(),
            capacity,
        }
    }

    /// Create a buffer seeded from `history` (fitted to `capacity`).
    pub fn seeded(capacity: usize, history: &[u64]) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.replace(history);
        buffer
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.samples.iter().copied().collect()
    }

    /// Replace the whole buffer with `history`, fitted to the capacity.
    pub fn replace(&mut self, history: &[u64]) {
        let keep = history.len().min(self.capacity);
        let pad = self.capacity - keep;
        self.samples.clear();
        self.samples.extend(std::iter::repeat_n(0, pad));
        self.samples
            .extend(history[history.len() - keep..].iter().copied());
    }

    /// Drop the oldest sample and append `count`.
    pub fn push(&mut self, count: u64) {
        self.samples.pop_front();
        self.samples.push_back(count);
    }

    /// Apply one snapshot: a non-empty history replaces the buffer,
    /// otherwise the scalar total is appended.
    pub fn apply(&mut self, snapshot: &VisitorSnapshot) {
        if snapshot.history.is_empty() {
            self.push(snapshot.total);
        } else {
            self.replace(&snapshot.history);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(total: u64, history: &[u64]) -> VisitorSnapshot {
        VisitorSnapshot {
            total,
            history: history.to_vec(),
        }
    }

    #[test]
    fn new_is_zero_filled() {
        let h = RollingHistory::new(4);
        assert_eq!(h.to_vec(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut h = RollingHistory::new(0);
        assert_eq!(h.capacity(), 1);
        h.push(9);
        assert_eq!(h.to_vec(), vec![9]);
    }

    #[test]
    fn missing_history_drops_oldest_and_appends_total() {
        let mut h = RollingHistory::seeded(8, &[2, 4, 6, 8, 10, 12, 14, 16]);
        h.apply(&snap(20, &[]));
        assert_eq!(h.to_vec(), vec![4, 6, 8, 10, 12, 14, 16, 20]);
    }

    #[test]
    fn short_history_is_left_padded() {
        let mut h = RollingHistory::new(8);
        h.apply(&snap(3, &[1, 2, 3]));
        assert_eq!(h.to_vec(), vec![0, 0, 0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn long_history_keeps_newest() {
        let mut h = RollingHistory::new(3);
        h.apply(&snap(5, &[1, 2, 3, 4, 5]));
        assert_eq!(h.to_vec(), vec![3, 4, 5]);
    }

    #[test]
    fn replace_discards_previous_contents() {
        let mut h = RollingHistory::seeded(4, &[9, 9, 9, 9]);
        h.apply(&snap(1, &[1]));
        assert_eq!(h.to_vec(), vec![0, 0, 0, 1]);
    }

    #[test]
    fn length_is_invariant_across_updates() {
        for capacity in 1..=10 {
            let mut h = RollingHistory::new(capacity);
            for step in 0..25u64 {
                let history: Vec<u64> = (0..(step % 13)).collect();
                let update = if step % 3 == 0 {
                    snap(step, &[])
                } else {
                    snap(step, &history)
                };
                h.apply(&update);
                assert_eq!(h.len(), capacity, "capacity {capacity}, step {step}");
            }
        }
    }
}
