//! Status sink adapters.

mod recording;
mod tracing_sink;

pub use recording::RecordingStatusSink;
pub use tracing_sink::TracingStatusSink;
