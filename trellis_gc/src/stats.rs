//! Heap statistics.
//!
//! Counters are relaxed atomics so they can be bumped through `&self`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics about heap activity.
#[derive(Debug)]
pub struct HeapStats {
    /// Total objects allocated since start.
    pub allocations: AtomicU64,
    /// Number of mark-sweep collections.
    pub collections: AtomicU64,
    /// Objects freed by collection or explicit release.
    pub objects_freed: AtomicU64,
}

/// Point-in-time copy of [`HeapStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStatsSnapshot {
    /// Total objects allocated since start.
    pub allocations: u64,
    /// Number of mark-sweep collections.
    pub collections: u64,
    /// Objects freed by collection or explicit release.
    pub objects_freed: u64,
}

impl HeapStats {
    /// Create new empty statistics.
    pub const fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            collections: AtomicU64::new(0),
            objects_freed: AtomicU64::new(0),
        }
    }

    /// Record an allocation.
    #[inline]
    pub fn record_allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record freed objects.
    #[inline]
    pub fn record_free(&self, count: u64) {
        self.objects_freed.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a completed collection.
    #[inline]
    pub fn record_collection(&self) {
        self.collections.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of the counters.
    pub fn snapshot(&self) -> HeapStatsSnapshot {
        HeapStatsSnapshot {
            allocations: self.allocations.load(Ordering::Relaxed),
            collections: self.collections.load(Ordering::Relaxed),
            objects_freed: self.objects_freed.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        self.allocations.store(0, Ordering::Relaxed);
        self.collections.store(0, Ordering::Relaxed);
        self.objects_freed.store(0, Ordering::Relaxed);
    }
}

impl Default for HeapStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_recording() {
        let stats = HeapStats::new();
        stats.record_allocation();
        stats.record_allocation();
        stats.record_free(1);
        stats.record_collection();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.allocations, 2);
        assert_eq!(snapshot.objects_freed, 1);
        assert_eq!(snapshot.collections, 1);
    }

    #[test]
    fn test_stats_reset() {
        let stats = HeapStats::new();
        stats.record_allocation();
        stats.reset();
        assert_eq!(stats.snapshot(), HeapStatsSnapshot::default());
    }
}
