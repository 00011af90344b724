// Feed module structure
mod hub;

// Re-export commonly used types
pub use hub::{TelemetryHub, DEFAULT_BUFFER_CAPACITY};
pub use crate::models::VitalReadingRecord;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

/// Error type for feed operations
#[derive(Error, Debug)]
pub enum FeedError {
    /// The feed shut down; no further readings will arrive
    #[error("Feed closed")]
    Closed,

    /// A subscriber fell behind and missed readings
    #[error("Feed lagged: {skipped} readings dropped")]
    Lagged {
        /// How many readings this subscriber missed
        skipped: u64,
    },

    /// Mutex lock error
    #[error("Mutex lock error: {0}")]
    Lock(String),
}

/// Live subscription to the vitals feed
///
/// Readings arrive in publish order. Dropping the subscription releases the
/// underlying channel on every exit path; `unsubscribe` names the release
/// explicitly at call sites that want to.
#[derive(Debug)]
pub struct FeedSubscription {
    receiver: broadcast::Receiver<VitalReadingRecord>,
}

impl FeedSubscription {
    pub(crate) fn new(receiver: broadcast::Receiver<VitalReadingRecord>) -> Self {
        Self { receiver }
    }

    /// Wait for the next reading.
    ///
    /// `Lagged` reports how many readings were missed; the subscription
    /// stays usable afterwards. `Closed` is final.
    pub async fn next_reading(&mut self) -> Result<VitalReadingRecord, FeedError> {
        match self.receiver.recv().await {
            Ok(record) => Ok(record),
            Err(broadcast::error::RecvError::Lagged(skipped)) => Err(FeedError::Lagged { skipped }),
            Err(broadcast::error::RecvError::Closed) => Err(FeedError::Closed),
        }
    }

    /// Release the subscription. Dropping it has the same effect.
    pub fn unsubscribe(self) {}
}

/// Access to the realtime vitals feed for one patient's device stream
#[async_trait]
pub trait VitalsFeed: Send + Sync {
    /// Register for readings published after this call returns.
    fn subscribe(&self) -> FeedSubscription;

    /// Newest reading by observation time, if any has been seen.
    async fn query_latest(
        &self,
        patient_id: &str,
    ) -> Result<Option<VitalReadingRecord>, FeedError>;

    /// Recent readings, newest first.
    async fn query_history(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> Result<Vec<VitalReadingRecord>, FeedError>;
}
