//! Import progress reporting
//!
//! Progress is a fixed sequence of milestones rather than a byte count. A
//! sink that wants real transfer progress can still be plugged in at the same
//! seam; the session only ever reports values in `0..=100`.

use std::sync::Mutex;

/// Fixed progress points of an import attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Milestone {
    /// No attempt is showing
    Idle,
    /// Request body is being prepared
    Uploading,
    /// Request has been dispatched
    AwaitingResponse,
    /// Response headers have arrived
    Interpreting,
    /// Attempt finished with a usable result
    Complete,
}

impl Milestone {
    pub fn percent(self) -> u8 {
        match self {
            Milestone::Idle => 0,
            Milestone::Uploading => 10,
            Milestone::AwaitingResponse => 30,
            Milestone::Interpreting => 70,
            Milestone::Complete => 100,
        }
    }
}

/// Receives progress updates from an import attempt
pub trait ProgressSink {
    /// Progress moved to `percent`
    fn on_progress(&self, percent: u8);

    /// The attempt settled; `message` describes the outcome
    fn on_settled(&self, _message: &str) {}
}

/// Discards all updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _percent: u8) {}
}

/// Records every update in order
#[derive(Debug, Default)]
pub struct ProgressLog {
    values: Mutex<Vec<u8>>,
    settled: Mutex<Vec<String>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> Vec<u8> {
        self.values.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn settled_messages(&self) -> Vec<String> {
        self.settled.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl ProgressSink for ProgressLog {
    fn on_progress(&self, percent: u8) {
        if let Ok(mut values) = self.values.lock() {
            values.push(percent);
        }
    }

    fn on_settled(&self, message: &str) {
        if let Ok(mut settled) = self.settled.lock() {
            settled.push(message.to_string());
        }
    }
}
