use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use super::{FeedError, FeedSubscription, VitalsFeed};
use crate::models::VitalReadingRecord;

/// Default number of readings retained for history queries
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// In-process realtime telemetry channel
///
/// Readings enter through `publish` (the ingestion webhook or a test
/// script), land in a bounded recent-readings buffer, and fan out to every
/// live subscriber. The hub carries exactly one patient's device stream;
/// queries for any other patient id come back empty.
#[derive(Debug)]
pub struct TelemetryHub {
    /// Patient this hub's device stream belongs to
    patient_id: String,

    /// Broadcast side of the realtime channel
    sender: broadcast::Sender<VitalReadingRecord>,

    /// Recent readings, insertion order, bounded by `capacity`
    recent: Mutex<VecDeque<VitalReadingRecord>>,

    /// Maximum retained readings
    capacity: usize,

    /// Total readings accepted since startup
    published: AtomicU64,
}

impl TelemetryHub {
    /// Create a hub for one patient's stream with the given buffer capacity.
    pub fn new(patient_id: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            patient_id: patient_id.into(),
            sender,
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            published: AtomicU64::new(0),
        }
    }

    /// Accept a reading into the stream.
    ///
    /// Returns the number of live subscribers that received it. Zero
    /// subscribers is not an error; the buffer still retains the reading
    /// for history queries.
    pub fn publish(&self, record: VitalReadingRecord) -> Result<usize, FeedError> {
        {
            let mut recent = self
                .recent
                .lock()
                .map_err(|e| FeedError::Lock(e.to_string()))?;
            if recent.len() == self.capacity {
                recent.pop_back();
            }
            recent.push_front(record.clone());
        }
        self.published.fetch_add(1, Ordering::Relaxed);

        let delivered = self.sender.send(record).unwrap_or(0);
        debug!(delivered, "reading published to feed");
        Ok(delivered)
    }

    /// Total readings accepted since startup.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    // Arrival order is not observation order; queries sort by observation
    // time before answering.
    fn sorted_snapshot(&self) -> Result<Vec<VitalReadingRecord>, FeedError> {
        let recent = self
            .recent
            .lock()
            .map_err(|e| FeedError::Lock(e.to_string()))?;
        let mut readings: Vec<VitalReadingRecord> = recent.iter().cloned().collect();
        readings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(readings)
    }
}

#[async_trait]
impl VitalsFeed for TelemetryHub {
    fn subscribe(&self) -> FeedSubscription {
        FeedSubscription::new(self.sender.subscribe())
    }

    async fn query_latest(
        &self,
        patient_id: &str,
    ) -> Result<Option<VitalReadingRecord>, FeedError> {
        if patient_id != self.patient_id {
            return Ok(None);
        }
        Ok(self.sorted_snapshot()?.into_iter().next())
    }

    async fn query_history(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> Result<Vec<VitalReadingRecord>, FeedError> {
        if patient_id != self.patient_id {
            return Ok(Vec::new());
        }
        let mut readings = self.sorted_snapshot()?;
        readings.truncate(limit);
        Ok(readings)
    }
}
