//! Transition table statistics.
//!
//! Tracks how tables move between encodings and how much copying growth costs,
//! for tuning the array limits.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics about transition table activity.
#[derive(Debug)]
pub struct TransitionStats {
    // =========================================================================
    // Encoding Changes
    // =========================================================================
    /// Single-edge encodings installed (first edge, or rewrite of a cleared one).
    pub single_edge_installs: AtomicU64,
    /// Promotions from a single-edge encoding (or empty) to a full array.
    pub promotions: AtomicU64,

    // =========================================================================
    // Array Storage
    // =========================================================================
    /// Transition arrays allocated.
    pub arrays_allocated: AtomicU64,
    /// Array growths (reallocate and copy).
    pub array_grows: AtomicU64,
    /// Entries copied during growth.
    pub entries_copied: AtomicU64,

    // =========================================================================
    // Reclamation
    // =========================================================================
    /// Compaction passes that removed at least one cleared entry.
    pub compactions: AtomicU64,
    /// Cleared entries removed by compaction.
    pub entries_reclaimed: AtomicU64,

    // =========================================================================
    // Handlers and Prototype Cache
    // =========================================================================
    /// Handler resolutions performed by accessors (memo hits excluded).
    pub handler_resolutions: AtomicU64,
    /// Prototype transitions not cached because the cache was full.
    pub prototype_cache_overflows: AtomicU64,
}

/// Point-in-time copy of [`TransitionStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionStatsSnapshot {
    /// See [`TransitionStats::single_edge_installs`].
    pub single_edge_installs: u64,
    /// See [`TransitionStats::promotions`].
    pub promotions: u64,
    /// See [`TransitionStats::arrays_allocated`].
    pub arrays_allocated: u64,
    /// See [`TransitionStats::array_grows`].
    pub array_grows: u64,
    /// See [`TransitionStats::entries_copied`].
    pub entries_copied: u64,
    /// See [`TransitionStats::compactions`].
    pub compactions: u64,
    /// See [`TransitionStats::entries_reclaimed`].
    pub entries_reclaimed: u64,
    /// See [`TransitionStats::handler_resolutions`].
    pub handler_resolutions: u64,
    /// See [`TransitionStats::prototype_cache_overflows`].
    pub prototype_cache_overflows: u64,
}

impl TransitionStats {
    /// Create new empty statistics.
    pub const fn new() -> Self {
        Self {
            single_edge_installs: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
            arrays_allocated: AtomicU64::new(0),
            array_grows: AtomicU64::new(0),
            entries_copied: AtomicU64::new(0),
            compactions: AtomicU64::new(0),
            entries_reclaimed: AtomicU64::new(0),
            handler_resolutions: AtomicU64::new(0),
            prototype_cache_overflows: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_single_edge_install(&self) {
        self.single_edge_installs.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_array_allocation(&self) {
        self.arrays_allocated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_grow(&self, copied: usize) {
        self.array_grows.fetch_add(1, Ordering::Relaxed);
        self.entries_copied
            .fetch_add(copied as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_compaction(&self, reclaimed: usize) {
        if reclaimed > 0 {
            self.compactions.fetch_add(1, Ordering::Relaxed);
            self.entries_reclaimed
                .fetch_add(reclaimed as u64, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_handler_resolution(&self) {
        self.handler_resolutions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_prototype_overflow(&self) {
        self.prototype_cache_overflows
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of all counters.
    pub fn snapshot(&self) -> TransitionStatsSnapshot {
        TransitionStatsSnapshot {
            single_edge_installs: self.single_edge_installs.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            arrays_allocated: self.arrays_allocated.load(Ordering::Relaxed),
            array_grows: self.array_grows.load(Ordering::Relaxed),
            entries_copied: self.entries_copied.load(Ordering::Relaxed),
            compactions: self.compactions.load(Ordering::Relaxed),
            entries_reclaimed: self.entries_reclaimed.load(Ordering::Relaxed),
            handler_resolutions: self.handler_resolutions.load(Ordering::Relaxed),
            prototype_cache_overflows: self.prototype_cache_overflows.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        for counter in [
            &self.single_edge_installs,
            &self.promotions,
            &self.arrays_allocated,
            &self.array_grows,
            &self.entries_copied,
            &self.compactions,
            &self.entries_reclaimed,
            &self.handler_resolutions,
            &self.prototype_cache_overflows,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for TransitionStats {
    fn default() -> Self {
        Self::new()
    }
}
