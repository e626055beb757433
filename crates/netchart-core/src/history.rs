// File: crates/netchart-core/src/history.rs
// Summary: Time-bucketed network usage history with windowed aggregate queries.
// Notes:
// - Buckets are ordered by start and never overlap; durations may vary.
// - Aggregates prorate partially covered buckets with integer math.

use std::collections::BTreeMap;

use crate::error::{ChartError, Result};

/// One window of accumulated transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    /// Window start, epoch milliseconds.
    pub start: i64,
    /// Window length in milliseconds.
    pub duration: i64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl Bucket {
    pub const fn new(start: i64, duration: i64, rx_bytes: u64, tx_bytes: u64) -> Self {
        Self { start, duration, rx_bytes, tx_bytes }
    }

    #[inline]
    pub const fn end(&self) -> i64 {
        self.start.saturating_add(self.duration)
    }

    /// Received plus transmitted bytes.
    #[inline]
    pub const fn total_bytes(&self) -> u64 {
        self.rx_bytes.saturating_add(self.tx_bytes)
    }
}

/// Read access to a usage history, as consumed by path generation.
pub trait UsageHistory {
    fn len(&self) -> usize;

    fn bucket(&self, index: usize) -> Option<Bucket>;

    /// Nominal bucket length used to discretize forward projection.
    fn bucket_duration(&self) -> i64;

    /// Sum of all buckets overlapping `[start, end)` as seen at `as_of`.
    ///
    /// The returned bucket spans exactly the requested window and is
    /// zero-filled when nothing overlaps.
    fn aggregate(&self, start: i64, end: i64, as_of: i64) -> Bucket;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned, validated history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    bucket_duration: i64,
    buckets: Vec<Bucket>,
}

impl History {
    /// Empty history with the given nominal bucket duration.
    pub fn new(bucket_duration: i64) -> Result<Self> {
        if bucket_duration <= 0 {
            return Err(ChartError::InvalidBucketDuration(bucket_duration));
        }
        Ok(Self { bucket_duration, buckets: Vec::new() })
    }

    /// Build from pre-bucketed data, enforcing order and non-overlap.
    pub fn from_buckets(bucket_duration: i64, buckets: Vec<Bucket>) -> Result<Self> {
        let mut history = Self::new(bucket_duration)?;
        history.buckets.reserve(buckets.len());
        for bucket in buckets {
            history.push(bucket)?;
        }
        Ok(history)
    }

    /// Append a bucket after the current last one.
    pub fn push(&mut self, bucket: Bucket) -> Result<()> {
        let index = self.buckets.len();
        if bucket.duration <= 0 {
            return Err(ChartError::EmptyBucket { index, duration: bucket.duration });
        }
        if let Some(prev) = self.buckets.last() {
            if bucket.start < prev.start {
                return Err(ChartError::UnorderedBucket {
                    index,
                    start: bucket.start,
                    previous: prev.start,
                });
            }
            if bucket.start < prev.end() {
                return Err(ChartError::OverlappingBucket {
                    index,
                    start: bucket.start,
                    previous_end: prev.end(),
                });
            }
        }
        self.buckets.push(bucket);
        Ok(())
    }

    pub fn as_slice(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    pub fn first(&self) -> Option<&Bucket> {
        self.buckets.first()
    }

    pub fn last(&self) -> Option<&Bucket> {
        self.buckets.last()
    }

    /// Start of the oldest bucket.
    pub fn start(&self) -> Option<i64> {
        self.first().map(|b| b.start)
    }

    /// End of the newest bucket.
    pub fn end(&self) -> Option<i64> {
        self.last().map(Bucket::end)
    }

    pub fn total_bytes(&self) -> u64 {
        self.buckets.iter().fold(0u64, |acc, b| acc.saturating_add(b.total_bytes()))
    }
}

impl UsageHistory for History {
    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn bucket(&self, index: usize) -> Option<Bucket> {
        self.buckets.get(index).copied()
    }

    fn bucket_duration(&self) -> i64 {
        self.bucket_duration
    }

    fn aggregate(&self, start: i64, end: i64, as_of: i64) -> Bucket {
        let mut entry = Bucket::new(start, end.saturating_sub(start).max(0), 0, 0);
        if end <= start {
            return entry;
        }

        // newest bucket starting before the window end, then walk back
        let newest = self.buckets.partition_point(|b| b.start < end);
        for b in self.buckets[..newest].iter().rev() {
            if b.end() <= start {
                break;
            }
            // the bucket still being filled counts in full
            let active = b.start < as_of && b.end() > as_of;
            let overlap = if active {
                b.duration
            } else {
                b.end().min(end) - b.start.max(start)
            };
            if overlap <= 0 {
                continue;
            }
            entry.rx_bytes =
                entry.rx_bytes.saturating_add(prorate(b.rx_bytes, overlap, b.duration));
            entry.tx_bytes =
                entry.tx_bytes.saturating_add(prorate(b.tx_bytes, overlap, b.duration));
        }
        entry
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// `bytes * part / whole` without intermediate overflow.
#[inline]
pub(crate) fn prorate(bytes: u64, part: i64, whole: i64) -> u64 {
    if whole <= 0 || part <= 0 {
        return 0;
    }
    let v = bytes as u128 * part as u128 / whole as u128;
    u64::try_from(v).unwrap_or(u64::MAX)
}

/// Accumulates transfer intervals into aligned, fixed-length buckets.
#[derive(Clone, Debug)]
pub struct HistoryBuilder {
    bucket_duration: i64,
    buckets: BTreeMap<i64, Bucket>,
}

impl HistoryBuilder {
    pub fn new(bucket_duration: i64) -> Result<Self> {
        if bucket_duration <= 0 {
            return Err(ChartError::InvalidBucketDuration(bucket_duration));
        }
        Ok(Self { bucket_duration, buckets: BTreeMap::new() })
    }

    /// Spread `rx`/`tx` over `[start, end)` proportionally to each bucket's
    /// overlap. Rounding remainders end up in the oldest bucket touched.
    pub fn record(&mut self, start: i64, end: i64, rx: u64, tx: u64) -> Result<()> {
        if end < start {
            return Err(ChartError::ReversedInterval { start, end });
        }
        let end = if end == start { start + 1 } else { end };
        let d = self.bucket_duration;

        let first = start.div_euclid(d) * d;
        let last = (end - 1).div_euclid(d) * d;

        let (mut rx, mut tx) = (rx, tx);
        let mut remaining = end - start;
        let mut cur = last;
        while cur >= first {
            let overlap = (cur + d).min(end) - cur.max(start);
            if overlap > 0 {
                let frac_rx = prorate(rx, overlap, remaining);
                let frac_tx = prorate(tx, overlap, remaining);
                let b = self.buckets.entry(cur).or_insert_with(|| Bucket::new(cur, d, 0, 0));
                b.rx_bytes = b.rx_bytes.saturating_add(frac_rx);
                b.tx_bytes = b.tx_bytes.saturating_add(frac_tx);
                rx -= frac_rx;
                tx -= frac_tx;
                remaining -= overlap;
            }
            cur -= d;
        }
        Ok(())
    }

    pub fn build(self) -> History {
        History {
            bucket_duration: self.bucket_duration,
            buckets: self.buckets.into_values().collect(),
        }
    }
}
