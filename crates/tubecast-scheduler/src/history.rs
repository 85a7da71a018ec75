//! Attempt history — in-memory ring buffer of recent attempt outcomes.
//! Lightweight: no queues, no persistence. The dashboard reads the tail.

use std::collections::VecDeque;

use tubecast_core::types::AttemptRecord;

/// Bounded log of attempt records across jobs.
pub struct AttemptHistory {
    records: VecDeque<AttemptRecord>,
    limit: usize,
}

impl AttemptHistory {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(128)),
            limit: limit.max(1),
        }
    }

    /// Record an attempt, evicting the oldest past the limit.
    pub fn record(&mut self, record: AttemptRecord) {
        self.records.push_back(record);
        while self.records.len() > self.limit {
            self.records.pop_front();
        }
    }

    /// Oldest first.
    pub fn records(&self) -> Vec<AttemptRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&AttemptRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for AttemptHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubecast_core::types::{AttemptOutcome, SendMode};

    fn record(i: u32) -> AttemptRecord {
        AttemptRecord {
            attempt_index: i,
            total: 10,
            mode: SendMode::Auto,
            message: format!("sent {i}"),
            outcome: AttemptOutcome::Success,
            at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut history = AttemptHistory::new(3);
        for i in 1..=5 {
            history.record(record(i));
        }
        let indices: Vec<u32> = history.records().iter().map(|r| r.attempt_index).collect();
        assert_eq!(indices, vec![3, 4, 5]);
        assert_eq!(history.latest().unwrap().attempt_index, 5);
    }

    #[test]
    fn test_zero_limit_keeps_one() {
        let mut history = AttemptHistory::new(0);
        history.record(record(1));
        history.record(record(2));
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
    }
}
