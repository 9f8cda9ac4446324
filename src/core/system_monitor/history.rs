use std::collections::{HashMap, VecDeque};

use super::export::{ExportPayload, MetricSeries};
use super::metrics::MetricKey;

pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Upper bound on slots reserved up front; longer histories grow on demand.
const PREALLOC_LIMIT: usize = 4096;

/// Rolling per-metric history sharing a single timestamp axis.
///
/// The key set is fixed at construction. Buffers and the axis are trimmed
/// independently to `retention`, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffers {
    retention: usize,
    keys: Vec<MetricKey>,
    buffers: HashMap<MetricKey, VecDeque<f64>>,
    timestamps: VecDeque<u64>,
    next_timestamp: u64,
}

impl HistoryBuffers {
    pub fn new(keys: Vec<MetricKey>) -> Self {
        Self::with_capacity(keys, DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(keys: Vec<MetricKey>, retention: usize) -> Self {
        let retention = retention.max(1);
        let reserve = retention.min(PREALLOC_LIMIT);
        let mut unique = Vec::with_capacity(keys.len());
        let mut buffers = HashMap::with_capacity(keys.len());

        for key in keys {
            if buffers.contains_key(&key) {
                log::debug!("Duplicate metric key '{}' ignored", key);
                continue;
            }
            buffers.insert(key.clone(), VecDeque::with_capacity(reserve));
            unique.push(key);
        }

        Self {
            retention,
            keys: unique,
            buffers,
            timestamps: VecDeque::with_capacity(reserve),
            next_timestamp: 0,
        }
    }

    /// Push a value onto an existing buffer. Unknown keys are rejected.
    pub fn append(&mut self, key: &MetricKey, value: f64) -> bool {
        match self.buffers.get_mut(key) {
            Some(buffer) => {
                buffer.push_back(value);
                true
            }
            None => {
                log::debug!("Rejected sample for unknown metric '{}'", key);
                false
            }
        }
    }

    /// Close the current tick: extend the axis and trim everything to retention.
    ///
    /// Returns the timestamp that was appended.
    pub fn tick_complete(&mut self) -> u64 {
        let timestamp = self.next_timestamp;
        self.next_timestamp += 1;
        self.timestamps.push_back(timestamp);
        self.trim();
        timestamp
    }

    fn trim(&mut self) {
        let retention = self.retention;
        Self::trim_front(&mut self.timestamps, retention);
        for buffer in self.buffers.values_mut() {
            Self::trim_front(buffer, retention);
        }
    }

    fn trim_front<T>(queue: &mut VecDeque<T>, capacity: usize) {
        while queue.len() > capacity {
            queue.pop_front();
        }
    }

    /// Change the retention length, trimming immediately if it shrank.
    pub fn set_retention(&mut self, retention: usize) {
        self.retention = retention.max(1);
        self.trim();
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn keys(&self) -> &[MetricKey] {
        &self.keys
    }

    pub fn contains(&self, key: &MetricKey) -> bool {
        self.buffers.contains_key(key)
    }

    pub fn timestamps(&self) -> &VecDeque<u64> {
        &self.timestamps
    }

    pub fn buffer(&self, key: &MetricKey) -> Option<&VecDeque<f64>> {
        self.buffers.get(key)
    }

    pub fn latest(&self, key: &MetricKey) -> Option<f64> {
        self.buffers.get(key).and_then(|b| b.back().copied())
    }

    /// A metric is drawable only when its buffer matches the axis length.
    pub fn is_aligned(&self, key: &MetricKey) -> bool {
        self.buffers
            .get(key)
            .is_some_and(|b| b.len() == self.timestamps.len())
    }

    /// (timestamp, value) pairs for charting; empty unless the metric is aligned.
    pub fn points(&self, key: &MetricKey) -> Vec<(f64, f64)> {
        if !self.is_aligned(key) {
            return Vec::new();
        }
        match self.buffers.get(key) {
            Some(buffer) => self
                .timestamps
                .iter()
                .zip(buffer.iter())
                .map(|(&t, &v)| (t as f64, v))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Owned copy of the axis and every series, in key order.
    pub fn snapshot(&self) -> ExportPayload {
        let mut metrics = MetricSeries::new();
        for key in &self.keys {
            if let Some(buffer) = self.buffers.get(key) {
                metrics.push(key.as_str(), buffer.iter().copied().collect());
            }
        }

        ExportPayload {
            x_data: self.timestamps.iter().copied().collect(),
            metrics,
        }
    }

    /// Owned copy of the axis and one series.
    pub fn series(&self, key: &MetricKey) -> Option<(Vec<u64>, Vec<f64>)> {
        let buffer = self.buffers.get(key)?;
        Some((
            self.timestamps.iter().copied().collect(),
            buffer.iter().copied().collect(),
        ))
    }

    pub fn tick_count(&self) -> u64 {
        self.next_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<MetricKey> {
        vec![MetricKey::cpu(), MetricKey::ram()]
    }

    fn fill(history: &mut HistoryBuffers, ticks: usize) {
        for i in 0..ticks {
            history.append(&MetricKey::cpu(), i as f64);
            history.append(&MetricKey::ram(), (i * 10) as f64);
            history.tick_complete();
        }
    }

    #[test]
    fn test_lengths_follow_min_of_ticks_and_retention() {
        for ticks in [0, 1, 5, 10, 25] {
            let mut history = HistoryBuffers::with_capacity(keys(), 10);
            fill(&mut history, ticks);
            let expected = ticks.min(10);
            assert_eq!(history.timestamps().len(), expected);
            for key in keys() {
                assert_eq!(history.buffer(&key).unwrap().len(), expected);
                if ticks > 0 {
                    assert!(history.is_aligned(&key));
                }
            }
        }
    }

    #[test]
    fn test_huge_retention_does_not_reserve_it() {
        let mut history = HistoryBuffers::with_capacity(keys(), usize::MAX / 4);
        fill(&mut history, 3);
        assert_eq!(history.retention(), usize::MAX / 4);
        assert_eq!(history.timestamps().len(), 3);
        assert!(history.is_aligned(&MetricKey::ram()));
    }

    #[test]
    fn test_trim_is_fifo() {
        let mut history = HistoryBuffers::with_capacity(keys(), 3);
        fill(&mut history, 4);

        let cpu: Vec<f64> = history.buffer(&MetricKey::cpu()).unwrap().iter().copied().collect();
        assert_eq!(cpu, vec![1.0, 2.0, 3.0]);
        let axis: Vec<u64> = history.timestamps().iter().copied().collect();
        assert_eq!(axis, vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut history = HistoryBuffers::with_capacity(keys(), 3);
        assert!(!history.append(&MetricKey::new("/mnt/usb"), 1.0));
        assert!(!history.contains(&MetricKey::new("/mnt/usb")));
        assert_eq!(history.keys().len(), 2);
    }

    #[test]
    fn test_skipped_append_leaves_buffer_short_until_saturated() {
        let mut history = HistoryBuffers::with_capacity(keys(), 3);
        fill(&mut history, 1);

        // RAM fails on the second tick
        history.append(&MetricKey::cpu(), 1.0);
        history.tick_complete();
        assert!(history.is_aligned(&MetricKey::cpu()));
        assert!(!history.is_aligned(&MetricKey::ram()));
        assert!(history.points(&MetricKey::ram()).is_empty());

        fill(&mut history, 1);
        assert_eq!(history.buffer(&MetricKey::ram()).unwrap().len(), 2);
        assert_eq!(history.timestamps().len(), 3);

        // Axis is saturated; the next success re-aligns the short buffer
        fill(&mut history, 1);
        assert!(history.is_aligned(&MetricKey::ram()));
    }

    #[test]
    fn test_shrinking_retention_trims_immediately() {
        let mut history = HistoryBuffers::with_capacity(keys(), 10);
        fill(&mut history, 6);
        history.set_retention(2);
        assert_eq!(history.timestamps().len(), 2);
        assert_eq!(history.latest(&MetricKey::cpu()), Some(5.0));
        assert_eq!(history.buffer(&MetricKey::cpu()).unwrap().front(), Some(&4.0));
    }

    #[test]
    fn test_snapshot_preserves_key_order() {
        let mut history = HistoryBuffers::with_capacity(
            vec![MetricKey::ram(), MetricKey::cpu(), MetricKey::ram()],
            5,
        );
        fill(&mut history, 2);
        let snapshot = history.snapshot();
        assert_eq!(snapshot.x_data, vec![0, 1]);
        assert_eq!(snapshot.metrics.names(), vec!["RAM", "CPU"]);
        assert_eq!(snapshot.metrics.get("CPU"), Some(&[0.0, 1.0][..]));
    }
}
