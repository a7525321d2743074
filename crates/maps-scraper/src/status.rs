//! Progress reporting during a scrape.

use std::sync::Mutex;
use tracing::info;

/// Best-effort sink for human-readable progress lines.
///
/// Implementations must not fail or panic: a status update that cannot be
/// delivered is dropped. Callers never guard the call.
#[allow(async_fn_in_trait)]
pub trait StatusReporter {
    async fn report(&self, status: &str);
}

/// Discards every update.
pub struct NullStatus;

impl StatusReporter for NullStatus {
    async fn report(&self, _status: &str) {}
}

/// Writes updates to the log.
pub struct LogStatus;

impl StatusReporter for LogStatus {
    async fn report(&self, status: &str) {
        info!("{}", status);
    }
}

/// Keeps every update in memory, in order.
#[derive(Default)]
pub struct RecordingStatus {
    updates: Mutex<Vec<String>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates received so far.
    pub fn updates(&self) -> Vec<String> {
        self.updates
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }
}

impl StatusReporter for RecordingStatus {
    async fn report(&self, status: &str) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(status.to_string());
        }
    }
}
