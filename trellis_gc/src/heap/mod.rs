//! Generational slot heap.
//!
//! Objects live in a `Vec` of slots. Freeing a slot bumps its generation and
//! pushes it on a free list, so handles are cheap (8 bytes, no pointer chase)
//! and a stale handle is detected with one comparison.
//!
//! Collection is a simple stop-the-world mark-sweep:
//!
//! ```text
//! roots ──trace──► worklist ──mark──► trace children ──► ... ──► sweep unmarked
//! ```
//!
//! Only strong edges (those reported through [`Trace`]) keep objects alive.

use crate::roots::{Handle, RawHandle, RootSet};
use crate::stats::HeapStats;
use crate::trace::{Trace, Tracer};
use tracing::debug;

// =============================================================================
// Slots
// =============================================================================

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    marked: bool,
    value: Option<T>,
}

/// Result of a collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionOutcome {
    /// Objects found reachable.
    pub marked: usize,
    /// Objects freed.
    pub freed: usize,
}

// =============================================================================
// Heap
// =============================================================================

/// A heap of `T` objects addressed by generational handles.
#[derive(Debug)]
pub struct Heap<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
    stats: HeapStats,
}

impl<T> Heap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            stats: HeapStats::new(),
        }
    }

    /// Create an empty heap with room for `capacity` objects.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Allocate an object and return its handle.
    pub fn alloc(&mut self, value: T) -> Handle<T> {
        self.live += 1;
        self.stats.record_allocation();

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.value.is_none());
            slot.value = Some(value);
            slot.marked = false;
            return Handle::from_raw(RawHandle::new(index, slot.generation));
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            marked: false,
            value: Some(value),
        });
        Handle::from_raw(RawHandle::new(index, 0))
    }

    #[inline]
    fn slot(&self, raw: RawHandle) -> Option<&Slot<T>> {
        self.slots
            .get(raw.index as usize)
            .filter(|slot| slot.generation == raw.generation && slot.value.is_some())
    }

    /// Get the object behind `handle`, or `None` if it has been freed.
    #[inline]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slot(handle.raw()).and_then(|slot| slot.value.as_ref())
    }

    /// Get a mutable reference to the object behind `handle`.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let raw = handle.raw();
        self.slots
            .get_mut(raw.index as usize)
            .filter(|slot| slot.generation == raw.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Check whether `handle` still refers to a live object.
    #[inline]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.contains_raw(handle.raw())
    }

    /// Untyped variant of [`contains`](Self::contains).
    #[inline]
    pub fn contains_raw(&self, raw: RawHandle) -> bool {
        self.slot(raw).is_some()
    }

    /// Free the object behind `handle` immediately, regardless of reachability.
    ///
    /// This is the host's way to force a clear; every weak token pointing at
    /// the object observes it as cleared afterwards.
    pub fn release(&mut self, handle: Handle<T>) -> Option<T> {
        self.release_raw(handle.raw())
    }

    fn release_raw(&mut self, raw: RawHandle) -> Option<T> {
        let slot = self.slots.get_mut(raw.index as usize)?;
        if slot.generation != raw.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.marked = false;
        // A slot whose generation is exhausted is retired, never reused.
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free.push(raw.index);
        }
        self.live -= 1;
        self.stats.record_free(1);
        Some(value)
    }

    /// Number of live objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if the heap holds no live objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterate over live objects with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    Handle::from_raw(RawHandle::new(index as u32, slot.generation)),
                    value,
                )
            })
        })
    }

    /// Handles of every live object.
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Heap statistics.
    #[inline]
    pub fn stats(&self) -> &HeapStats {
        &self.stats
    }
}

impl<T: Trace> Heap<T> {
    /// Run a full mark-sweep collection from `roots`.
    pub fn collect(&mut self, roots: &RootSet) -> CollectionOutcome {
        for slot in &mut self.slots {
            slot.marked = false;
        }

        let mut tracer = MarkTracer {
            worklist: Vec::with_capacity(roots.len()),
        };
        roots.trace(&mut tracer);

        let mut marked = 0;
        while let Some(raw) = tracer.worklist.pop() {
            let Some(slot) = self.slots.get_mut(raw.index as usize) else {
                continue;
            };
            if slot.marked || slot.generation != raw.generation {
                continue;
            }
            let Some(value) = slot.value.as_ref() else {
                continue;
            };
            slot.marked = true;
            marked += 1;
            value.trace(&mut tracer);
        }

        let dead: Vec<RawHandle> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.value.is_some() && !slot.marked)
            .map(|(index, slot)| RawHandle::new(index as u32, slot.generation))
            .collect();
        let freed = dead.len();
        for raw in dead {
            self.release_raw(raw);
        }

        self.stats.record_collection();
        debug!(marked, freed, live = self.live, "heap collection finished");

        CollectionOutcome { marked, freed }
    }
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracer that pushes reported handles on the mark worklist.
struct MarkTracer {
    worklist: Vec<RawHandle>,
}

impl Tracer for MarkTracer {
    #[inline]
    fn trace_handle(&mut self, handle: RawHandle) {
        if !handle.is_null() {
            self.worklist.push(handle);
        }
    }
}
