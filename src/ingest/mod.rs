// Ingestion driver: stream the events file, accumulate per-minute counts,
// flush to storage at the distinct-key threshold and once more at EOF.

pub mod buffer;

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::error::EventError;
use crate::event_repo::EventRepo;
use crate::timestamp;
use buffer::AggregationBuffer;

/// Counters reported after a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Input records processed.
    pub records: u64,
    /// Non-empty batches persisted (threshold flushes plus the final one).
    pub flushes: u64,
}

/// Persists the buffer as one batch and clears it. Returns the number of
/// entries merged (zero for an empty buffer, which skips the transaction).
/// On failure the drained entries are put back so the buffer is intact for
/// a retry at the caller's discretion.
pub async fn flush(repo: &EventRepo, buffer: &mut AggregationBuffer) -> Result<usize, EventError> {
    if buffer.is_empty() {
        return Ok(0);
    }
    let batch = buffer.drain();
    let batch_size = batch.len();
    if let Err(e) = repo.merge_batch(&batch).await {
        buffer.restore(batch);
        return Err(e);
    }
    debug!(operation = "flush", batch_size, "batch merged");
    Ok(batch_size)
}

/// Reads the events file record-by-record, in input order, and aggregates
/// counts into (customer, minute) buckets. The buffer is flushed before
/// processing a record whenever it has reached `flush_threshold` distinct
/// keys, and unconditionally after the stream is exhausted.
///
/// Any malformed record or timestamp aborts the run; batches flushed before
/// the failure stay committed, the in-flight batch does not.
pub async fn ingest_file(
    repo: &EventRepo,
    path: &Path,
    flush_threshold: usize,
) -> Result<IngestStats, EventError> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    let mut buffer = AggregationBuffer::new();
    let mut stats = IngestStats::default();
    let mut line_no: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        if buffer.len() >= flush_threshold && flush(repo, &mut buffer).await? > 0 {
            stats.flushes += 1;
        }

        let (customer_id, raw_timestamp) = split_record(&line, line_no)?;
        let instant = timestamp::normalize(raw_timestamp)?;
        buffer.increment(customer_id, timestamp::minute_bucket_ms(instant));
        stats.records += 1;
    }

    if flush(repo, &mut buffer).await? > 0 {
        stats.flushes += 1;
    }

    info!(
        records = stats.records,
        flushes = stats.flushes,
        "ingestion complete"
    );
    Ok(stats)
}

/// Splits one input line into (customer_id, timestamp). Fields are
/// customer_id, event_type, transaction_id, timestamp; the middle two are
/// not used by aggregation.
fn split_record(line: &str, line_no: u64) -> Result<(&str, &str), EventError> {
    let mut fields = line.split(',');
    let customer_id = fields.next();
    let _event_type = fields.next();
    let _transaction_id = fields.next();
    let raw_timestamp = fields.next();
    match (customer_id, raw_timestamp) {
        (Some(customer_id), Some(raw_timestamp)) => Ok((customer_id.trim(), raw_timestamp.trim())),
        _ => Err(EventError::MalformedRecord { line: line_no }),
    }
}
