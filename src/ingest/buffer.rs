// In-memory partial aggregate: (customer, minute bucket) -> count since the
// last flush. Owned by the driver; no locking.

use std::collections::HashMap;

use crate::event_repo::BucketCount;

/// Customer id plus minute bucket in epoch ms.
pub type BucketKey = (String, i64);

#[derive(Debug, Default)]
pub struct AggregationBuffer {
    counts: HashMap<BucketKey, i64>,
}

impl AggregationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one event to its bucket, starting absent buckets at zero.
    pub fn increment(&mut self, customer_id: &str, minute_ms: i64) {
        *self
            .counts
            .entry((customer_id.to_string(), minute_ms))
            .or_insert(0) += 1;
    }

    /// Number of distinct (customer, minute) keys accumulated.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Takes every entry out of the buffer, leaving it empty.
    pub fn drain(&mut self) -> Vec<BucketCount> {
        self.counts
            .drain()
            .map(|((customer_id, minute_ms), event_count)| BucketCount {
                customer_id,
                minute_ms,
                event_count,
            })
            .collect()
    }

    /// Adds a drained batch back, merging additively with anything counted
    /// since. Lets a failed flush be retried without losing increments.
    pub fn restore(&mut self, entries: Vec<BucketCount>) {
        for e in entries {
            *self
                .counts
                .entry((e.customer_id, e.minute_ms))
                .or_insert(0) += e.event_count;
        }
    }
}
