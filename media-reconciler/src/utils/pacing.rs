//! Request pacing
//!
//! The engine is deliberately sequential; what keeps it from exhausting
//! client-side network resources is cooldown sleeps, not concurrency
//! control. The scheduler owns one `Pacer` and threads it through the scan
//! loop so the delay policy lives in exactly one place.

use std::time::Duration;

/// Cooldown delays between storage probes and between batches.
#[derive(Debug, Clone)]
pub struct Pacer {
    request_delay: Duration,
    batch_delay: Duration,
}

impl Pacer {
    pub fn new(request_delay: Duration, batch_delay: Duration) -> Self {
        Self { request_delay, batch_delay }
    }

    /// Pause between two storage probes within a scan.
    pub async fn between_requests(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    /// Pause between two batches.
    pub async fn between_batches(&self) {
        if !self.batch_delay.is_zero() {
            tracing::debug!(
                delay_ms = self.batch_delay.as_millis() as u64,
                "Cooling down before next batch"
            );
            tokio::time::sleep(self.batch_delay).await;
        }
    }
}
