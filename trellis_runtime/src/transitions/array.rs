//! Full transition arrays.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ capacity                                     │
//! │ sorted:  [(name, details, weak target); n]   │  binary searched
//! │ special: [(kind, weak target); ≤ 4]          │  linear
//! │ prototype transitions ─────► side array      │  linear, lazy
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Entries store their key explicitly. A cleared target can no longer be asked
//! for its descriptor, so the key must survive the target for the region to
//! stay searchable.

use super::key::{SpecialTransition, TransitionKey, compare_keys, compare_names};
use crate::error::{TransitionError, integrity_violation};
use crate::object::shape::{PropertyDetails, PrototypeId, Shape, ShapeHandle};
use smallvec::SmallVec;
use std::cmp::Ordering;
use trellis_core::intern::InternedString;
use trellis_gc::{Heap, WeakRef};

// =============================================================================
// Entries
// =============================================================================

/// A property edge in the sorted region.
#[derive(Debug, Clone)]
pub struct TransitionEntry {
    name: InternedString,
    details: PropertyDetails,
    target: WeakRef<Shape>,
}

impl TransitionEntry {
    /// Create a property edge.
    #[inline]
    pub fn new(name: InternedString, details: PropertyDetails, target: WeakRef<Shape>) -> Self {
        Self {
            name,
            details,
            target,
        }
    }

    /// Property name.
    #[inline]
    pub fn name(&self) -> &InternedString {
        &self.name
    }

    /// Property details.
    #[inline]
    pub fn details(&self) -> PropertyDetails {
        self.details
    }

    /// Weak target.
    #[inline]
    pub fn target(&self) -> WeakRef<Shape> {
        self.target
    }

    /// The edge's key.
    pub fn key(&self) -> TransitionKey {
        TransitionKey::property(self.name.clone(), self.details)
    }
}

/// A special edge, outside the sorted region.
#[derive(Debug, Clone)]
pub struct SpecialEntry {
    kind: SpecialTransition,
    target: WeakRef<Shape>,
}

impl SpecialEntry {
    /// Which special transition this is.
    #[inline]
    pub fn kind(&self) -> SpecialTransition {
        self.kind
    }

    /// Weak target shape.
    #[inline]
    pub fn target(&self) -> WeakRef<Shape> {
        self.target
    }
}

/// Result of a binary search over the sorted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// The key is at this index.
    Found(usize),
    /// The key is absent; inserting it here keeps the region sorted.
    NotFound {
        /// Position the key would occupy.
        insertion_index: usize,
    },
}

// =============================================================================
// Prototype Transitions
// =============================================================================

/// Side array of prototype transitions.
///
/// Never sorted and never touched by the comparator.
#[derive(Debug, Default)]
pub struct PrototypeTransitions {
    entries: Vec<(PrototypeId, WeakRef<Shape>)>,
}

impl PrototypeTransitions {
    /// Number of cached entries, cleared ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live target for `prototype`.
    pub fn get(&self, prototype: PrototypeId, heap: &Heap<Shape>) -> Option<ShapeHandle> {
        self.entries
            .iter()
            .find(|(proto, _)| *proto == prototype)
            .and_then(|(_, target)| target.upgrade(heap))
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (PrototypeId, WeakRef<Shape>)> + '_ {
        self.entries.iter().copied()
    }

    pub(crate) fn position(&self, prototype: PrototypeId) -> Option<usize> {
        self.entries.iter().position(|(proto, _)| *proto == prototype)
    }

    pub(crate) fn set_target(&mut self, index: usize, target: WeakRef<Shape>) {
        self.entries[index].1 = target;
    }

    pub(crate) fn push(
        &mut self,
        prototype: PrototypeId,
        target: WeakRef<Shape>,
    ) -> Result<(), TransitionError> {
        self.entries.try_reserve(1)?;
        self.entries.push((prototype, target));
        Ok(())
    }

    /// Drop entries whose target was collected.
    pub(crate) fn compact(&mut self, heap: &Heap<Shape>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, target)| !target.is_cleared(heap));
        before - self.entries.len()
    }
}

// =============================================================================
// Transition Array
// =============================================================================

/// A full transition table.
#[derive(Debug)]
pub struct TransitionArray {
    entries: Vec<TransitionEntry>,
    capacity: usize,
    special: SmallVec<[SpecialEntry; 2]>,
    prototype_transitions: Option<Box<PrototypeTransitions>>,
}

impl TransitionArray {
    /// Allocate an empty array with room for `capacity` property edges.
    pub fn allocate(capacity: usize) -> Result<Self, TransitionError> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity)?;
        Ok(Self {
            entries,
            capacity,
            special: SmallVec::new(),
            prototype_transitions: None,
        })
    }

    /// Slots in the sorted region, used or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Used slots in the sorted region.
    #[inline]
    pub fn number_of_transitions(&self) -> usize {
        self.entries.len()
    }

    /// Number of special edges.
    #[inline]
    pub fn special_count(&self) -> usize {
        self.special.len()
    }

    /// Property and special edges together.
    #[inline]
    pub fn total_transitions(&self) -> usize {
        self.entries.len() + self.special.len()
    }

    /// The sorted region.
    #[inline]
    pub fn entries(&self) -> &[TransitionEntry] {
        &self.entries
    }

    /// The special region, ordered by kind.
    #[inline]
    pub fn special(&self) -> &[SpecialEntry] {
        &self.special
    }

    /// Live edges (sorted and special) whose target has not been collected.
    pub fn live_count(&self, heap: &Heap<Shape>) -> usize {
        let sorted = self
            .entries
            .iter()
            .filter(|entry| !entry.target.is_cleared(heap))
            .count();
        let special = self
            .special
            .iter()
            .filter(|entry| !entry.target.is_cleared(heap))
            .count();
        sorted + special
    }

    // =========================================================================
    // Sorted Region
    // =========================================================================

    /// Binary search for a property key.
    pub fn search(&self, name: &InternedString, details: PropertyDetails) -> SearchResult {
        match self
            .entries
            .binary_search_by(|entry| compare_keys(&entry.name, entry.details, name, details))
        {
            Ok(index) => SearchResult::Found(index),
            Err(insertion_index) => SearchResult::NotFound { insertion_index },
        }
    }

    /// Index of the first entry carrying `name`, whatever its details.
    ///
    /// `Err` holds the index where such an entry would go.
    pub fn search_name(&self, name: &InternedString) -> Result<usize, usize> {
        let index = self
            .entries
            .partition_point(|entry| compare_names(&entry.name, name) == Ordering::Less);
        match self.entries.get(index) {
            Some(entry) if entry.name == *name => Ok(index),
            _ => Err(index),
        }
    }

    /// Insert an entry at `index`, shifting the tail up by one.
    ///
    /// # Panics
    ///
    /// Panics if the array is at capacity.
    pub fn insert_at(&mut self, index: usize, entry: TransitionEntry) {
        if self.entries.len() >= self.capacity {
            integrity_violation!(
                "insert into full transition array (capacity {})",
                self.capacity
            );
        }
        self.entries.insert(index, entry);
    }

    /// Point an existing entry at a new target.
    pub fn set_target(&mut self, index: usize, target: WeakRef<Shape>) {
        match self.entries.get_mut(index) {
            Some(entry) => entry.target = target,
            None => integrity_violation!(
                "set_target({index}) with {} transitions",
                self.entries.len()
            ),
        }
    }

    /// Reallocate the sorted region with room for `new_capacity` entries.
    ///
    /// Fresh storage is reserved before anything moves, so on failure the
    /// array is unchanged. Returns the number of entries copied.
    pub fn grow(&mut self, new_capacity: usize) -> Result<usize, TransitionError> {
        if new_capacity <= self.capacity {
            integrity_violation!(
                "transition array cannot shrink from {} to {new_capacity}",
                self.capacity
            );
        }
        let mut fresh = Vec::new();
        fresh.try_reserve_exact(new_capacity)?;
        let copied = self.entries.len();
        fresh.append(&mut self.entries);
        self.entries = fresh;
        self.capacity = new_capacity;
        Ok(copied)
    }

    /// Check the sorted region is strictly increasing.
    pub fn is_sorted_no_duplicates(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            compare_keys(&pair[0].name, pair[0].details, &pair[1].name, pair[1].details)
                == Ordering::Less
        })
    }

    // =========================================================================
    // Special Region
    // =========================================================================

    /// Find the special edge of `kind`.
    pub fn search_special(&self, kind: SpecialTransition) -> Option<&SpecialEntry> {
        self.special.iter().find(|entry| entry.kind == kind)
    }

    /// Install or replace the special edge of `kind`.
    pub fn set_special(&mut self, kind: SpecialTransition, target: WeakRef<Shape>) {
        match self.special.binary_search_by_key(&kind, |entry| entry.kind) {
            Ok(index) => self.special[index].target = target,
            Err(index) => self.special.insert(index, SpecialEntry { kind, target }),
        }
    }

    // =========================================================================
    // Prototype Side Array
    // =========================================================================

    /// The prototype side array, if one was ever created.
    #[inline]
    pub fn prototype_transitions(&self) -> Option<&PrototypeTransitions> {
        self.prototype_transitions.as_deref()
    }

    /// The prototype side array, created on first use.
    pub(crate) fn prototype_transitions_mut(&mut self) -> &mut PrototypeTransitions {
        self.prototype_transitions.get_or_insert_with(Box::default)
    }

    // =========================================================================
    // Reclamation
    // =========================================================================

    /// Drop every edge whose target was collected, in all three regions.
    ///
    /// Order is preserved and capacity is kept. Returns the number removed.
    pub fn compact(&mut self, heap: &Heap<Shape>) -> usize {
        let before = self.entries.len() + self.special.len();
        self.entries.retain(|entry| !entry.target.is_cleared(heap));
        self.special.retain(|entry| !entry.target.is_cleared(heap));
        let removed = before - self.entries.len() - self.special.len();
        let prototypes = self
            .prototype_transitions
            .as_mut()
            .map_or(0, |side| side.compact(heap));
        removed + prototypes
    }
}
