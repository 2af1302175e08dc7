// Hour-bucket shaping for the query path. DB access stays in event_repo::mod.

use std::collections::BTreeMap;

use crate::error::EventError;
use crate::timestamp;

use super::EventRepo;

/// Hourly event counts for one customer in [start, end), keyed by formatted
/// hour bucket. Sparse: hours with zero matching events are absent. Bounds
/// arrive as raw timestamp strings and go through the same normalization as
/// ingested records.
pub async fn hourly_event_counts(
    repo: &EventRepo,
    customer_id: &str,
    start: &str,
    end: &str,
) -> Result<BTreeMap<String, i64>, EventError> {
    let start_ms = timestamp::normalize(start)?.timestamp_millis();
    let end_ms = timestamp::normalize(end)?.timestamp_millis();

    let rows = repo.hourly_counts(customer_id, start_ms, end_ms).await?;
    let mut out = BTreeMap::new();
    for row in rows {
        out.insert(timestamp::format_hour(row.hour_ms), row.event_count);
    }
    Ok(out)
}
