//! Per-seed progress reporting, decoupled from the sampler core.

use std::time::Duration;
use tracing::info;

/// Receives a callback after all walks for one seed have been written.
///
/// Purely diagnostic; implementations must not affect sampling.
pub trait ProgressObserver {
    fn seed_done(&mut self, processed: usize, total: usize, elapsed: Duration);
}

/// Discards all progress events.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn seed_done(&mut self, _processed: usize, _total: usize, _elapsed: Duration) {}
}

/// Logs mean time per seed and the estimated time remaining.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn seed_done(&mut self, processed: usize, total: usize, elapsed: Duration) {
        let mean_secs = elapsed.as_secs_f64() / processed as f64;
        let eta_secs = mean_secs * (total - processed) as f64;
        info!(processed, total, mean_secs, eta_secs, "seed batch complete");
    }
}
