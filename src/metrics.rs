// Performance metrics module
//
// Lightweight counters for monitoring computation runs

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Run metrics.
///
/// Uses atomic operations for thread-safe tracking without locks; concurrent
/// edition tasks record into the same instance. Logged on shutdown for
/// performance analysis.
#[derive(Debug)]
pub struct Metrics {
    /// Editions whose computation produced a report
    pub editions_computed: AtomicUsize,

    /// Editions whose computation failed
    pub editions_failed: AtomicUsize,

    /// Repository synchronizations performed
    pub repos_synced: AtomicUsize,

    /// Total wall time spent computing, in milliseconds
    pub total_compute_time_ms: AtomicU64,

    /// Progress channel renames issued
    pub channel_renames: AtomicU64,

    /// Progress channel renames skipped (value unchanged or unmapped)
    pub channel_rename_skips: AtomicU64,

    /// Process start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            editions_computed: AtomicUsize::new(0),
            editions_failed: AtomicUsize::new(0),
            repos_synced: AtomicUsize::new(0),
            total_compute_time_ms: AtomicU64::new(0),
            channel_renames: AtomicU64::new(0),
            channel_rename_skips: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_edition_computed(&self) {
        self.editions_computed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_edition_failed(&self) {
        self.editions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repo_synced(&self) {
        self.repos_synced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_compute_time(&self, duration: Duration) {
        self.total_compute_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_channel_rename(&self) {
        self.channel_renames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_channel_rename_skip(&self) {
        self.channel_rename_skips.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average computation time per edition in milliseconds
    pub fn avg_compute_time_ms(&self) -> f64 {
        let total = self.total_compute_time_ms.load(Ordering::Relaxed);
        let count = self.editions_computed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Run Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Editions: {} computed, {} failed",
            self.editions_computed.load(Ordering::Relaxed),
            self.editions_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Repos synced: {}, total compute time: {:.2}s (avg: {:.2}ms per edition)",
            self.repos_synced.load(Ordering::Relaxed),
            self.total_compute_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_compute_time_ms()
        );
        tracing::info!(
            "Channel renames: {} issued, {} skipped",
            self.channel_renames.load(Ordering::Relaxed),
            self.channel_rename_skips.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.editions_computed.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.editions_failed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_edition_operations() {
        let metrics = Metrics::new();

        metrics.record_edition_computed();
        metrics.record_edition_computed();
        metrics.record_edition_failed();
        metrics.record_repo_synced();

        assert_eq!(metrics.editions_computed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.editions_failed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.repos_synced.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_record_compute_time() {
        let metrics = Metrics::new();

        metrics.record_edition_computed();
        metrics.record_compute_time(Duration::from_millis(100));
        metrics.record_edition_computed();
        metrics.record_compute_time(Duration::from_millis(200));

        assert_eq!(metrics.total_compute_time_ms.load(Ordering::Relaxed), 300);
        assert_eq!(metrics.avg_compute_time_ms(), 150.0);
    }

    #[test]
    fn test_avg_compute_time_no_editions() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_compute_time_ms(), 0.0);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }

    #[test]
    fn test_channel_counters() {
        let metrics = Metrics::new();

        metrics.record_channel_rename();
        metrics.record_channel_rename_skip();
        metrics.record_channel_rename_skip();

        assert_eq!(metrics.channel_renames.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.channel_rename_skips.load(Ordering::Relaxed), 2);
    }
}
