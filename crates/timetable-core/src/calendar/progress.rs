//! Progress reporting for long calendar rebuilds.

/// Receives staged progress updates during a sync.
///
/// `update` is called repeatedly with a growing fraction; implementations
/// edit one outbound message in place (or redraw one line) rather than
/// emitting a new message per call.
pub trait ProgressSink: Send + Sync {
    fn update(&self, fraction: f64, status: &str);
}

/// Headless sink: progress goes to the log.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update(&self, fraction: f64, status: &str) {
        tracing::info!(pct = (fraction * 100.0) as u32, status, "calendar sync progress");
    }
}

/// Discards progress. Useful for callers that only want the final link.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn update(&self, _fraction: f64, _status: &str) {}
}
