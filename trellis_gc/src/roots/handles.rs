//! Handles to heap-managed objects.
//!
//! A handle is an index into a [`Heap`](crate::Heap) plus the generation of
//! the slot at allocation time. Freeing a slot bumps its generation, which
//! invalidates every outstanding handle to the old occupant.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Untyped handle, as seen by tracers and root sets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle {
    /// Slot index in the heap.
    pub index: u32,
    /// Slot generation when the handle was created.
    pub generation: u32,
}

impl RawHandle {
    /// Create a raw handle from its parts.
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The null handle. Never refers to a live slot.
    #[inline]
    pub const fn null() -> Self {
        Self {
            index: u32::MAX,
            generation: u32::MAX,
        }
    }

    /// Check if this is the null handle.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.index == u32::MAX
    }
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "@null")
        } else {
            write!(f, "@{}v{}", self.index, self.generation)
        }
    }
}

/// A typed handle to a heap-managed `T`.
///
/// The type parameter keeps handles from different heaps apart.
/// Trait impls are written by hand so `Handle<T>` is `Copy`/`Eq`/`Hash`
/// whether or not `T` is.
pub struct Handle<T> {
    raw: RawHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Wrap a raw handle.
    #[inline]
    pub const fn from_raw(raw: RawHandle) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Get the untyped handle.
    #[inline]
    pub const fn raw(self) -> RawHandle {
        self.raw
    }

    /// Slot index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.raw.index
    }

    /// Slot generation.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.raw.generation
    }
}

impl<T> Copy for Handle<T> {}

impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, f)
    }
}
