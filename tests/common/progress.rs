//! Recording progress sink

use gridprobe::ProgressSink;
use parking_lot::Mutex;

/// Keeps every fraction and message in arrival order
#[derive(Debug, Default)]
pub struct RecordingProgress {
    fractions: Mutex<Vec<f64>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fractions(&self) -> Vec<f64> {
        self.fractions.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn report_fraction(&self, fraction: f64) {
        self.fractions.lock().push(fraction);
    }

    fn report_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
