//! Root tracking and handle management.
//!
//! GC roots are the starting points for marking. The shape runtime roots the
//! shapes that live objects point at; everything reachable from them through
//! strong edges survives a collection.

mod handles;

pub use handles::{Handle, RawHandle};

use crate::trace::Tracer;

/// Root set for garbage collection.
#[derive(Debug, Default, Clone)]
pub struct RootSet {
    handles: Vec<RawHandle>,
}

impl RootSet {
    /// Create a new empty root set.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Build a root set from typed handles.
    pub fn from_handles<T>(handles: impl IntoIterator<Item = Handle<T>>) -> Self {
        Self {
            handles: handles.into_iter().map(Handle::raw).collect(),
        }
    }

    /// Register a handle as a root.
    pub fn register<T>(&mut self, handle: Handle<T>) {
        self.handles.push(handle.raw());
    }

    /// Unregister a handle.
    pub fn unregister<T>(&mut self, handle: Handle<T>) {
        let raw = handle.raw();
        self.handles.retain(|h| *h != raw);
    }

    /// Trace all roots.
    pub fn trace(&self, tracer: &mut dyn Tracer) {
        for handle in &self.handles {
            if !handle.is_null() {
                tracer.trace_handle(*handle);
            }
        }
    }

    /// Get number of registered roots.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if there are no roots.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
