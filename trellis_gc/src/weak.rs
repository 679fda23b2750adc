//! Weak references.
//!
//! A [`WeakRef`] names an object without keeping it alive: it is never
//! reported to a [`Tracer`](crate::Tracer). After the target is swept or
//! released the token is *cleared* and every accessor returns `None`.
//! Callers re-check on every access; nothing is cached across collections.

use crate::heap::Heap;
use crate::roots::{Handle, RawHandle};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A weak token for an object in a [`Heap<T>`].
pub struct WeakRef<T> {
    handle: Handle<T>,
}

impl<T> WeakRef<T> {
    /// Make a weak token for `handle`.
    #[inline]
    pub const fn new(handle: Handle<T>) -> Self {
        Self { handle }
    }

    /// Check whether the target has been collected.
    #[inline]
    pub fn is_cleared(&self, heap: &Heap<T>) -> bool {
        !heap.contains(self.handle)
    }

    /// Resolve to a strong handle if the target is still alive.
    #[inline]
    pub fn upgrade(&self, heap: &Heap<T>) -> Option<Handle<T>> {
        heap.contains(self.handle).then_some(self.handle)
    }

    /// Borrow the target if it is still alive.
    #[inline]
    pub fn get<'h>(&self, heap: &'h Heap<T>) -> Option<&'h T> {
        heap.get(self.handle)
    }

    /// Check whether this token was made for `handle`.
    ///
    /// Pure identity; says nothing about liveness.
    #[inline]
    pub fn refers_to(&self, handle: Handle<T>) -> bool {
        self.handle == handle
    }

    /// Untyped identity of the token.
    #[inline]
    pub fn raw(&self) -> RawHandle {
        self.handle.raw()
    }
}

impl<T> Copy for WeakRef<T> {}

impl<T> Clone for WeakRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for WeakRef<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<T> Eq for WeakRef<T> {}

impl<T> Hash for WeakRef<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl<T> fmt::Debug for WeakRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weak({:?})", self.handle)
    }
}
