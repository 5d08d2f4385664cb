use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::sync::Arc;

/// Number of samples each source keeps unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 1000;

/// A single scalar reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    /// Unix epoch seconds.
    pub timestamp: f64,
}

impl Sample {
    pub fn new(value: f64, timestamp: f64) -> Self {
        Self { value, timestamp }
    }

    /// Local wall-clock time of the sample, `None` if out of chrono's range.
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos).map(|utc| utc.with_timezone(&Local))
    }

    /// `YYYY-MM-DD HH:MM:SS` in local time.
    pub fn format_time(&self) -> String {
        self.local_time()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| format!("{:.3}", self.timestamp))
    }
}

/// Fixed-capacity circular store of [`Sample`]s.
///
/// Insertion overwrites the oldest sample once full. Slots that were never
/// written hold `None` and are skipped by every read that returns real data,
/// so a stored value of `0.0` is indistinguishable from any other reading.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    slots: Vec<Option<Sample>>,
    /// Slot that receives the next insert; also the oldest slot once wrapped.
    write_index: usize,
    len: usize,
}

impl RingBuffer {
    /// Create an empty buffer. A `capacity` of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            write_index: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of resident samples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Store a sample, overwriting the oldest one when full. Never fails and
    /// performs no ordering checks on `timestamp`.
    pub fn insert(&mut self, value: f64, timestamp: f64) {
        self.slots[self.write_index] = Some(Sample::new(value, timestamp));
        self.write_index = (self.write_index + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
    }

    /// Every slot in chronological order, oldest first, sentinels included.
    pub fn snapshot_slots(&self) -> Vec<Option<Sample>> {
        let (newer, older) = self.slots.split_at(self.write_index);
        older.iter().chain(newer).copied().collect()
    }

    /// All resident samples in insertion order, oldest first.
    pub fn snapshot_all(&self) -> Vec<Sample> {
        let (newer, older) = self.slots.split_at(self.write_index);
        older.iter().chain(newer).filter_map(|s| *s).collect()
    }

    /// The `count` most recent samples, oldest first.
    ///
    /// `count` is clamped to the capacity. While the buffer is still filling
    /// up fewer than `count` samples may be returned.
    pub fn most_recent(&self, count: usize) -> Vec<Sample> {
        let cap = self.capacity();
        let count = count.min(cap);
        let start = (self.write_index + cap - count) % cap;

        let window: Vec<Option<Sample>> = if count == 0 {
            Vec::new()
        } else if start < self.write_index {
            self.slots[start..self.write_index].to_vec()
        } else {
            // Window straddles the seam: tail of the array, then its head.
            self.slots[start..]
                .iter()
                .chain(&self.slots[..self.write_index])
                .copied()
                .collect()
        };

        window.into_iter().flatten().collect()
    }

    /// The newest sample, if any.
    pub fn latest(&self) -> Option<Sample> {
        self.most_recent(1).pop()
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Cloneable, thread-safe handle to a [`RingBuffer`].
///
/// One ingestion worker writes; the render tick and query handlers read.
/// A sample is written under the lock as a whole, so readers never see a
/// value paired with a stale timestamp.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<RwLock<RingBuffer>>,
}

impl SharedBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RingBuffer::new(capacity))),
        }
    }

    pub fn insert(&self, value: f64, timestamp: f64) {
        self.inner.write().insert(value, timestamp);
    }

    pub fn push(&self, sample: Sample) {
        self.insert(sample.value, sample.timestamp);
    }

    pub fn snapshot_all(&self) -> Vec<Sample> {
        self.inner.read().snapshot_all()
    }

    pub fn most_recent(&self, count: usize) -> Vec<Sample> {
        self.inner.read().most_recent(count)
    }

    pub fn latest(&self) -> Option<Sample> {
        self.inner.read().latest()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(samples: &[Sample]) -> Vec<f64> {
        samples.iter().map(|s| s.value).collect()
    }

    fn pairs(samples: &[Sample]) -> Vec<(f64, f64)> {
        samples.iter().map(|s| (s.timestamp, s.value)).collect()
    }

    #[test]
    fn snapshot_before_full_keeps_insertion_order() {
        let mut buf = RingBuffer::new(5);
        buf.insert(1.0, 10.0);
        buf.insert(2.0, 11.0);
        buf.insert(3.0, 12.0);

        assert_eq!(values(&buf.snapshot_all()), vec![1.0, 2.0, 3.0]);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.write_index(), 3);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut buf = RingBuffer::new(4);
        for i in 0..7 {
            buf.insert(i as f64, i as f64);
        }
        assert_eq!(values(&buf.snapshot_all()), vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn capacity_three_scenario() {
        let mut buf = RingBuffer::new(3);
        buf.insert(10.0, 1.0);
        buf.insert(20.0, 2.0);
        buf.insert(30.0, 3.0);
        buf.insert(40.0, 4.0);

        assert_eq!(
            pairs(&buf.snapshot_all()),
            vec![(2.0, 20.0), (3.0, 30.0), (4.0, 40.0)]
        );
        assert_eq!(pairs(&buf.most_recent(2)), vec![(3.0, 30.0), (4.0, 40.0)]);
    }

    #[test]
    fn most_recent_wraps_across_seam() {
        let mut buf = RingBuffer::default();
        let cap = buf.capacity();
        for i in 0..cap + 5 {
            buf.insert(i as f64, i as f64);
        }

        let expected: Vec<f64> = (cap - 5..cap + 5).map(|i| i as f64).collect();
        assert_eq!(values(&buf.most_recent(10)), expected);
    }

    #[test]
    fn most_recent_zero_and_oversized() {
        let mut buf = RingBuffer::new(8);
        for i in 0..20 {
            buf.insert(i as f64, i as f64);
        }
        assert!(buf.most_recent(0).is_empty());
        assert_eq!(buf.most_recent(8), buf.snapshot_all());
        assert_eq!(buf.most_recent(500), buf.most_recent(8));
    }

    #[test]
    fn most_recent_on_empty_buffer() {
        let buf = RingBuffer::new(3);
        assert!(buf.most_recent(1).is_empty());
        assert!(buf.latest().is_none());
        assert!(buf.snapshot_all().is_empty());
    }

    #[test]
    fn most_recent_while_filling_returns_only_real_samples() {
        let mut buf = RingBuffer::new(10);
        buf.insert(1.0, 1.0);
        buf.insert(2.0, 2.0);
        assert_eq!(values(&buf.most_recent(5)), vec![1.0, 2.0]);
    }

    #[test]
    fn zero_values_are_kept() {
        let mut buf = RingBuffer::new(3);
        buf.insert(0.0, 0.0);
        buf.insert(5.0, 1.0);
        assert_eq!(values(&buf.snapshot_all()), vec![0.0, 5.0]);
        assert_eq!(buf.latest(), Some(Sample::new(5.0, 1.0)));
    }

    #[test]
    fn slots_view_includes_sentinels_in_chronological_order() {
        let mut buf = RingBuffer::new(4);
        buf.insert(1.0, 1.0);
        buf.insert(2.0, 2.0);
        let slots = buf.snapshot_slots();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[..2], [None, None]);
        assert_eq!(slots[2], Some(Sample::new(1.0, 1.0)));
        assert_eq!(slots[3], Some(Sample::new(2.0, 2.0)));
    }

    #[test]
    fn reads_are_idempotent() {
        let mut buf = RingBuffer::new(4);
        for i in 0..6 {
            buf.insert(i as f64, i as f64);
        }
        assert_eq!(buf.snapshot_all(), buf.snapshot_all());
        assert_eq!(buf.most_recent(3), buf.most_recent(3));
    }

    #[test]
    fn out_of_order_timestamps_are_accepted() {
        let mut buf = RingBuffer::new(3);
        buf.insert(1.0, 50.0);
        buf.insert(2.0, 10.0);
        assert_eq!(pairs(&buf.snapshot_all()), vec![(50.0, 1.0), (10.0, 2.0)]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buf = RingBuffer::new(0);
        buf.insert(1.0, 1.0);
        buf.insert(2.0, 2.0);
        assert_eq!(buf.capacity(), 1);
        assert_eq!(values(&buf.snapshot_all()), vec![2.0]);
    }

    #[test]
    fn shared_buffer_is_visible_across_clones() {
        let shared = SharedBuffer::new(16);
        let writer = shared.clone();
        assert!(shared.is_empty());

        let handle = std::thread::spawn(move || {
            for i in 0..10 {
                writer.insert(i as f64, i as f64);
            }
        });
        handle.join().unwrap();

        assert!(!shared.is_empty());
        assert_eq!(shared.len(), 10);
        assert_eq!(shared.latest().map(|s| s.value), Some(9.0));
        assert_eq!(shared.most_recent(3).len(), 3);
    }

    #[test]
    fn format_time_has_expected_shape() {
        let s = Sample::new(1.0, 1_700_000_000.25);
        let text = s.format_time();
        assert_eq!(text.len(), "YYYY-MM-DD HH:MM:SS".len());
        assert_eq!(&text[4..5], "-");
    }
}
