//! Tracer interface for object graph traversal.

use crate::roots::RawHandle;

/// Tracer interface for visiting handles during GC.
///
/// The collector calls `trace()` on each reachable object, which then uses
/// this tracer to report its strong references.
pub trait Tracer {
    /// Mark the object behind `handle` as reachable.
    ///
    /// Null and stale handles are ignored by the collector.
    fn trace_handle(&mut self, handle: RawHandle);
}

/// A tracer that only counts the handles it is shown.
#[derive(Debug, Default)]
pub struct CountingTracer {
    /// Number of handles traced.
    pub handle_count: usize,
}

impl CountingTracer {
    /// Create a new counting tracer.
    pub fn new() -> Self {
        Self { handle_count: 0 }
    }
}

impl Tracer for CountingTracer {
    fn trace_handle(&mut self, _handle: RawHandle) {
        self.handle_count += 1;
    }
}
