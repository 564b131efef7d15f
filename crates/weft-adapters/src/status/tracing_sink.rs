use tracing::info;
use weft_core::application::ports::StatusSink;

/// Writes status notices as `info` events on the `weft::status` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn write_status(&self, text: &str) {
        info!(target: "weft::status", "{text}");
    }
}
