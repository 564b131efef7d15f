use std::sync::{Arc, Mutex};

use weft_core::application::ports::StatusSink;

/// Keeps every notice in order (testing helper).
#[derive(Debug, Clone, Default)]
pub struct RecordingStatusSink {
    entries: Arc<Mutex<Vec<String>>>,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl StatusSink for RecordingStatusSink {
    fn write_status(&self, text: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(text.to_string());
        }
    }
}
