//! Progress reporting for the generation flow.
//!
//! The checkpoints are fixed and the two long pauses are artificial
//! pacing for perceived responsiveness; they are not tied to pipeline
//! sub-stage completion. Whatever happens, the bar is driven to 100 and
//! cleared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

pub const CHECKPOINT_ANALYZING: u8 = 10;
pub const CHECKPOINT_GENERATING: u8 = 30;
pub const CHECKPOINT_GENERATED: u8 = 70;
pub const CHECKPOINT_FINALIZING: u8 = 90;
pub const CHECKPOINT_DONE: u8 = 100;

/// Pause after the analyzing and finalizing checkpoints.
pub const STAGE_DELAY: Duration = Duration::from_millis(500);
/// Pause before the bar is cleared.
pub const CLEAR_DELAY: Duration = Duration::from_millis(200);

pub const STATUS_ANALYZING: &str = "Analyzing your inputs...";
pub const STATUS_GENERATING: &str = "Generating creative content...";
pub const STATUS_FINALIZING: &str = "Finalizing results...";

/// Sink for progress updates during one generation cycle.
pub trait ProgressReporter: Send + Sync {
    fn progress(&self, percent: u8);
    fn status(&self, message: &str);
    fn clear(&self);
}

/// Server-side reporter: progress lands in the structured log stream.
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn progress(&self, percent: u8) {
        info!(percent = percent, "Campaign generation progress");
    }

    fn status(&self, message: &str) {
        info!(status = message, "Campaign generation status");
    }

    fn clear(&self) {
        info!("Campaign generation progress cleared");
    }
}

/// Recording reporter for assertions in tests.
#[derive(Default)]
pub struct RecordingProgress {
    updates: Mutex<Vec<u8>>,
    statuses: Mutex<Vec<String>>,
    cleared: AtomicBool,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<u8> {
        self.updates.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn was_cleared(&self) -> bool {
        self.cleared.load(Ordering::SeqCst)
    }
}

impl ProgressReporter for RecordingProgress {
    fn progress(&self, percent: u8) {
        self.updates.lock().unwrap().push(percent);
    }

    fn status(&self, message: &str) {
        self.statuses.lock().unwrap().push(message.to_string());
    }

    fn clear(&self) {
        self.cleared.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_captures_sequence() {
        let reporter = RecordingProgress::new();
        reporter.status(STATUS_ANALYZING);
        reporter.progress(CHECKPOINT_ANALYZING);
        reporter.progress(CHECKPOINT_DONE);
        reporter.clear();

        assert_eq!(reporter.updates(), vec![10, 100]);
        assert_eq!(reporter.statuses(), vec![STATUS_ANALYZING]);
        assert!(reporter.was_cleared());
    }
}
