// Progress reporting module
//
// Computations emit coarse step events over a tokio broadcast channel so a
// front-end can relay them (e.g. edit a status message) without the engine
// knowing anything about the display surface.

use crate::models::Edition;
use std::fmt;
use tokio::sync::broadcast;

/// Checkpoint events emitted while a computation runs.
///
/// The `Display` text is ready for direct user display; front-ends that want
/// structure can match on the variants instead.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    /// First-time clone of a repository is starting.
    DownloadStarted { pack: String, edition: Edition },

    /// Update of an existing local tree to a version is starting.
    UpdateStarted { pack: String, version: String },

    /// Both trees are synchronized; the diff is starting.
    DiffStarted,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::DownloadStarted { pack, edition } => {
                write!(f, "Downloading `{pack}` ({edition}) pack…")
            }
            ProgressEvent::UpdateStarted { pack, version } => {
                write!(f, "Updating {pack} with latest version of `{version}` known…")
            }
            ProgressEvent::DiffStarted => f.write_str("Searching for differences…"),
        }
    }
}

/// Broadcast handle for progress events.
///
/// Cloneable and safe to emit from concurrent edition tasks. With no
/// subscribers, `emit` is a no-op, so progress reporting is optional by
/// construction, not by branching.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    tx: broadcast::Sender<ProgressEvent>,
}

impl ProgressTracker {
    /// Create a tracker with a buffer of 64 events.
    ///
    /// Slow subscribers that lag past the buffer lose oldest events; progress
    /// text is cosmetic and never load-bearing.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Subscribe to progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }

    /// Emit one event. Send failures (no subscribers) are ignored.
    pub fn emit(&self, event: ProgressEvent) {
        tracing::debug!("progress: {}", event);
        let _ = self.tx.send(event);
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let tracker = ProgressTracker::new();
        let mut rx = tracker.subscribe();

        tracker.emit(ProgressEvent::DiffStarted);

        assert_eq!(rx.recv().await.unwrap(), ProgressEvent::DiffStarted);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let tracker = ProgressTracker::new();
        tracker.emit(ProgressEvent::DiffStarted);
    }

    #[test]
    fn test_event_display_text() {
        let event = ProgressEvent::DownloadStarted {
            pack: "Candidate 32x".to_string(),
            edition: Edition::Java,
        };
        assert_eq!(event.to_string(), "Downloading `Candidate 32x` (java) pack…");

        let event = ProgressEvent::UpdateStarted {
            pack: "Candidate 32x".to_string(),
            version: "1.21.4".to_string(),
        };
        assert_eq!(
            event.to_string(),
            "Updating Candidate 32x with latest version of `1.21.4` known…"
        );
    }
}
