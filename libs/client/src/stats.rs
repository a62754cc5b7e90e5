//! Request counters shared by a client and its pending requests

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct BridgeStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
    rejected: AtomicU64,
    pending: AtomicU64,
}

/// Point-in-time copy of [`BridgeStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Requests handed to the scheduler
    pub submitted: u64,
    /// Continuations fired with a response
    pub completed: u64,
    /// Continuations fired with an error, cancellations included
    pub failed: u64,
    pub cancelled: u64,
    /// Requests refused before reaching the scheduler
    pub rejected: u64,
    pub pending: u64,
}

impl BridgeStats {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn record_finished(&self, ok: bool, cancelled: bool) {
        if ok {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        if cancelled {
            self.cancelled.fetch_add(1, Ordering::Relaxed);
        }
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pending(&self) -> u64 {
        self.pending.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            pending: self.pending(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_tracks_submitted_minus_finished() {
        let stats = BridgeStats::default();
        stats.record_submitted();
        stats.record_submitted();
        stats.record_submitted();
        stats.record_finished(true, false);
        stats.record_finished(false, true);
        stats.record_rejected();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                submitted: 3,
                completed: 1,
                failed: 1,
                cancelled: 1,
                rejected: 1,
                pending: 1,
            }
        );
    }
}
