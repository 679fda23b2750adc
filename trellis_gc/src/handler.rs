//! Call-site handlers bound to weak targets.
//!
//! Inline caches need a strongly-held object they can store and compare, but
//! must not keep the object they describe alive. A [`Handler`] is that bridge:
//! the handler itself is reference counted and survives as long as any cache
//! or transition table holds it, while its target stays a [`WeakRef`].
//!
//! ```text
//!   call site ──Arc──► Handler { id, target: WeakRef } ─ ─weak─ ─► object
//! ```
//!
//! [`HandlerCache`] memoizes one handler per target so every site transitioning
//! to the same object shares the same [`HandlerId`].

use crate::heap::Heap;
use crate::roots::{Handle, RawHandle};
use crate::weak::WeakRef;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

/// Stable identity of a handler, used as a cache key by call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct HandlerId(pub u32);

/// A strongly-held handler wrapping a weak target.
pub struct Handler<T> {
    id: HandlerId,
    target: WeakRef<T>,
}

impl<T> Handler<T> {
    /// Handler identity.
    #[inline]
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// The weak target cell.
    #[inline]
    pub fn target(&self) -> WeakRef<T> {
        self.target
    }

    /// Check whether the target has been collected.
    #[inline]
    pub fn is_cleared(&self, heap: &Heap<T>) -> bool {
        self.target.is_cleared(heap)
    }

    /// Resolve the target if it is still alive.
    #[inline]
    pub fn upgrade(&self, heap: &Heap<T>) -> Option<Handle<T>> {
        self.target.upgrade(heap)
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish()
    }
}

/// Cache of handlers keyed by target.
pub struct HandlerCache<T> {
    handlers: Mutex<FxHashMap<RawHandle, Arc<Handler<T>>>>,
    next_id: AtomicU32,
}

impl<T> HandlerCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(FxHashMap::default()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Get the handler for `target`, creating it on first use.
    ///
    /// Repeated calls with the same token return the same `Arc`.
    pub fn resolve(&self, target: WeakRef<T>) -> Arc<Handler<T>> {
        let mut handlers = self.handlers.lock();
        let handler = handlers.entry(target.raw()).or_insert_with(|| {
            Arc::new(Handler {
                id: HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed)),
                target,
            })
        });
        Arc::clone(handler)
    }

    /// Drop cached handlers whose target has been collected.
    ///
    /// Handlers still referenced elsewhere stay alive through their `Arc`;
    /// they simply report a cleared target. Returns the number removed.
    pub fn sweep(&self, heap: &Heap<T>) -> usize {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|_, handler| !handler.is_cleared(heap));
        let removed = before - handlers.len();
        if removed > 0 {
            debug!(removed, remaining = handlers.len(), "swept handler cache");
        }
        removed
    }

    /// Drop the cached handler for `target`, if any.
    ///
    /// For hosts that free objects one at a time instead of collecting.
    pub fn forget(&self, target: WeakRef<T>) -> bool {
        self.handlers.lock().remove(&target.raw()).is_some()
    }

    /// Number of cached handlers.
    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for HandlerCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandlerCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCache")
            .field("len", &self.len())
            .finish()
    }
}
