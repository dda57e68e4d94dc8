//! Deduplicating debug-log sink.

use std::sync::Mutex;

use tracing::debug;

/// A named log sink that suppresses consecutive duplicate messages.
///
/// The surrogate's variance-floor notice can fire on every prediction of a
/// converged optimization loop; emitting it once per distinct message keeps
/// debug logs readable. The suppression state is scoped to the owning
/// adapter instance, not the process.
#[derive(Debug)]
pub struct DedupLogger {
    name: &'static str,
    last: Mutex<Option<String>>,
}

impl DedupLogger {
    /// Create a sink with the given logger name.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            last: Mutex::new(None),
        }
    }

    /// Emit a debug-level event unless `message` equals the previous one.
    pub fn debug(&self, message: &str) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if last.as_deref() == Some(message) {
            return;
        }
        debug!(logger = self.name, "{message}");
        *last = Some(message.to_owned());
    }
}
