//! The transition accessor: the only way to read or write a transition table.
//!
//! An accessor borrows the [`ShapeRegistry`] mutably, so no other code can
//! reallocate a table while one is open. It snapshots the table's encoding at
//! construction; its own mutations reload it before returning, and the borrow
//! rules out every other writer, so the snapshot is never stale.
//!
//! # Example
//!
//! ```ignore
//! let mut accessor = registry.accessor(shape);
//! if accessor.find(&key).is_none() && accessor.can_have_more_transitions() {
//!     accessor.insert(key, child)?;
//! }
//! ```

use super::array::{SearchResult, TransitionArray, TransitionEntry};
use super::key::{SpecialTransition, TransitionKey};
use super::table::{Encoding, TransitionTable};
use crate::config::TransitionConfig;
use crate::error::{TransitionError, integrity_violation};
use crate::object::shape::{
    PropertyDescriptor, PropertyDetails, PrototypeId, Shape, ShapeHandle, ShapeId, ShapeRegistry,
};
use crate::stats::TransitionStats;
use smallvec::SmallVec;
use std::fmt;
use std::mem;
use std::sync::Arc;
use tracing::{debug, trace};
use trellis_core::intern::InternedString;
use trellis_gc::{Handler, Heap, WeakRef};

/// A live edge: its key and target.
pub type LiveTransition = (TransitionKey, ShapeHandle);

/// Read/write view of one shape's transitions.
pub struct TransitionsAccessor<'a> {
    registry: &'a mut ShapeRegistry,
    shape: ShapeHandle,
    encoding: Encoding,
    /// Resolved handler, memoized for this accessor only.
    handler: Option<Arc<Handler<Shape>>>,
}

impl<'a> TransitionsAccessor<'a> {
    /// Open the transitions of `shape`.
    ///
    /// # Panics
    ///
    /// Panics if `shape` is not live.
    pub fn new(registry: &'a mut ShapeRegistry, shape: ShapeHandle) -> Self {
        let encoding = match registry.heap.get(shape) {
            Some(owner) => owner.transitions.encoding(),
            None => integrity_violation!("accessor opened on dead shape {shape:?}"),
        };
        Self {
            registry,
            shape,
            encoding,
            handler: None,
        }
    }

    /// The shape whose table this accessor reads.
    #[inline]
    pub fn shape(&self) -> ShapeHandle {
        self.shape
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current encoding of the table.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Number of edges, cleared ones included. Prototype transitions are not
    /// counted.
    pub fn number_of_transitions(&self) -> usize {
        match self.table() {
            TransitionTable::Empty => 0,
            TransitionTable::SingleWeak(_) | TransitionTable::SingleHandler { .. } => 1,
            TransitionTable::Full(array) => array.total_transitions(),
        }
    }

    /// Number of edges whose target is still alive.
    pub fn number_of_live_transitions(&self) -> usize {
        let heap = self.heap();
        match self.table() {
            TransitionTable::Empty => 0,
            TransitionTable::SingleWeak(target) => usize::from(!target.is_cleared(heap)),
            TransitionTable::SingleHandler { target, .. } => {
                usize::from(!target.is_cleared(heap))
            }
            TransitionTable::Full(array) => array.live_count(heap),
        }
    }

    /// Key of edge `index`.
    ///
    /// Property edges come first in sorted order, then special edges. Returns
    /// `None` only for a single weak edge whose target was collected, since
    /// that key lived in the target.
    ///
    /// # Panics
    ///
    /// Panics on an empty table or an out-of-range index.
    pub fn get_key(&self, index: usize) -> Option<TransitionKey> {
        match self.table() {
            TransitionTable::Empty => {
                integrity_violation!("get_key({index}) on a shape with no transitions")
            }
            TransitionTable::SingleWeak(target) => {
                check_single_index(index);
                target.get(self.heap()).map(simple_transition_key)
            }
            TransitionTable::SingleHandler { key, .. } => {
                check_single_index(index);
                Some(TransitionKey::Special(*key))
            }
            TransitionTable::Full(array) => Some(full_key(array, index)),
        }
    }

    /// Target of edge `index`, or `None` if it was collected.
    ///
    /// # Panics
    ///
    /// Panics on an empty table or an out-of-range index.
    pub fn get_target(&self, index: usize) -> Option<ShapeHandle> {
        let heap = self.heap();
        match self.table() {
            TransitionTable::Empty => {
                integrity_violation!("get_target({index}) on a shape with no transitions")
            }
            TransitionTable::SingleWeak(target) => {
                check_single_index(index);
                target.upgrade(heap)
            }
            TransitionTable::SingleHandler { target, .. } => {
                check_single_index(index);
                target.upgrade(heap)
            }
            TransitionTable::Full(array) => {
                let sorted = array.number_of_transitions();
                if index < sorted {
                    array.entries()[index].target().upgrade(heap)
                } else if let Some(special) = array.special().get(index - sorted) {
                    special.target().upgrade(heap)
                } else {
                    integrity_violation!(
                        "get_target({index}) with {} transitions",
                        array.total_transitions()
                    )
                }
            }
        }
    }

    /// Look up the target reached through `key`.
    pub fn find(&self, key: &TransitionKey) -> Option<ShapeHandle> {
        let heap = self.heap();
        match (self.table(), key) {
            (TransitionTable::SingleWeak(target), TransitionKey::Property { name, details }) => {
                let descriptor = target_descriptor(target.get(heap)?);
                if descriptor.name == *name && descriptor.details == *details {
                    target.upgrade(heap)
                } else {
                    None
                }
            }
            (
                TransitionTable::SingleHandler { key: kind, target },
                TransitionKey::Special(wanted),
            ) if kind == wanted => target.upgrade(heap),
            (TransitionTable::Full(array), TransitionKey::Property { name, details }) => {
                match array.search(name, *details) {
                    SearchResult::Found(index) => {
                        let target = array.entries()[index].target();
                        let shape = target.get(heap)?;
                        if target_descriptor(shape).name != *name {
                            integrity_violation!(
                                "edge {key} points at {:?}, which adds a different property",
                                shape.id()
                            );
                        }
                        target.upgrade(heap)
                    }
                    SearchResult::NotFound { .. } => None,
                }
            }
            (TransitionTable::Full(array), TransitionKey::Special(kind)) => {
                array.search_special(*kind)?.target().upgrade(heap)
            }
            (TransitionTable::Full(array), TransitionKey::Prototype(prototype)) => {
                array.prototype_transitions()?.get(*prototype, heap)
            }
            _ => None,
        }
    }

    /// Target of the special transition `kind`.
    #[inline]
    pub fn search_special(&self, kind: SpecialTransition) -> Option<ShapeHandle> {
        self.find(&TransitionKey::Special(kind))
    }

    /// Target of the plain data field `name` (no attributes).
    #[inline]
    pub fn find_transition_to_field(&self, name: &InternedString) -> Option<ShapeHandle> {
        self.find(&TransitionKey::field(name.clone()))
    }

    /// Cached target for a prototype change to `prototype`.
    #[inline]
    pub fn get_prototype_transition(&self, prototype: PrototypeId) -> Option<ShapeHandle> {
        self.find(&TransitionKey::Prototype(prototype))
    }

    /// Check whether one more edge may be inserted.
    pub fn can_have_more_transitions(&self) -> bool {
        match self.table() {
            TransitionTable::Full(array) => {
                array.live_count(self.heap()) < self.registry.config.max_transitions
            }
            _ => true,
        }
    }

    /// Every live property and special edge, in index order.
    pub fn live_transitions(&self) -> SmallVec<[LiveTransition; 4]> {
        (0..self.number_of_transitions())
            .filter_map(|index| Some((self.get_key(index)?, self.get_target(index)?)))
            .collect()
    }

    /// Every live cached prototype transition.
    pub fn live_prototype_transitions(&self) -> SmallVec<[(PrototypeId, ShapeHandle); 4]> {
        let heap = self.heap();
        match self.table() {
            TransitionTable::Full(array) => array
                .prototype_transitions()
                .into_iter()
                .flat_map(|side| side.iter())
                .filter_map(|(prototype, target)| Some((prototype, target.upgrade(heap)?)))
                .collect(),
            _ => SmallVec::new(),
        }
    }

    /// Check the sorted region of a full table.
    pub fn is_sorted_no_duplicates(&self) -> bool {
        match self.table() {
            TransitionTable::Full(array) => array.is_sorted_no_duplicates(),
            _ => true,
        }
    }

    /// Handler of a single special edge.
    ///
    /// The first call resolves the weak target through the registry's
    /// [`HandlerCache`](trellis_gc::HandlerCache); later calls on the same accessor return the memoized
    /// handler. Never returns a handler whose target was collected.
    pub fn resolve_handler(&mut self) -> Option<Arc<Handler<Shape>>> {
        if let Some(handler) = &self.handler {
            return (!handler.is_cleared(self.heap())).then(|| Arc::clone(handler));
        }
        let target = match self.table() {
            TransitionTable::SingleHandler { target, .. } => *target,
            _ => return None,
        };
        if target.is_cleared(self.heap()) {
            return None;
        }
        let handler = self.registry.handlers.resolve(target);
        self.registry.stats.record_handler_resolution();
        self.handler = Some(Arc::clone(&handler));
        Some(handler)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Record the edge `key -> target`, replacing any edge with the same key.
    ///
    /// # Panics
    ///
    /// Panics if `target` is dead, or if a property key does not match the
    /// property `target` adds.
    pub fn insert(&mut self, key: TransitionKey, target: ShapeHandle) -> Result<(), TransitionError> {
        self.insert_edge(key, target).map(|_| ())
    }

    /// Cache the prototype transition `prototype -> target`.
    ///
    /// Returns `Ok(false)` if the prototype cache is full of live entries and
    /// the transition was not cached.
    pub fn put_prototype_transition(
        &mut self,
        prototype: PrototypeId,
        target: ShapeHandle,
    ) -> Result<bool, TransitionError> {
        self.insert_edge(TransitionKey::Prototype(prototype), target)
    }

    /// Drop edges whose target was collected. Returns the number removed.
    ///
    /// Single edges are left in place; only a full array is compacted.
    pub fn compact(&mut self) -> usize {
        if self.encoding() != Encoding::Full {
            return 0;
        }
        self.with_detached_table(|update, table| match table {
            TransitionTable::Full(array) => update.compact(array),
            _ => 0,
        })
    }

    /// Re-read the encoding and forget the memoized handler.
    pub fn reload(&mut self) {
        self.encoding = match self.registry.heap.get(self.shape) {
            Some(owner) => owner.transitions.encoding(),
            None => integrity_violation!("shape {:?} died under its accessor", self.shape),
        };
        self.handler = None;
    }

    fn insert_edge(&mut self, key: TransitionKey, target: ShapeHandle) -> Result<bool, TransitionError> {
        let Some(target_shape) = self.heap().get(target) else {
            integrity_violation!("insert of dead target {target:?}");
        };
        if let TransitionKey::Property { name, details } = &key {
            let descriptor = target_descriptor(target_shape);
            if descriptor.name != *name || descriptor.details != *details {
                integrity_violation!(
                    "edge {key} inserted for {:?}, which adds {} {}",
                    target_shape.id(),
                    descriptor.name,
                    descriptor.details
                );
            }
        }
        self.with_detached_table(|update, table| update.insert(table, key, target))
    }

    /// Run `f` on the owner's table while the rest of the heap stays readable.
    fn with_detached_table<R>(
        &mut self,
        f: impl FnOnce(&TableUpdate<'_>, &mut TransitionTable) -> R,
    ) -> R {
        let owner = self.shape;
        let (id, mut table) = match self.registry.heap.get_mut(owner) {
            Some(shape) => (shape.id(), mem::take(&mut shape.transitions)),
            None => integrity_violation!("shape {owner:?} died under its accessor"),
        };
        let update = TableUpdate {
            heap: &self.registry.heap,
            config: &self.registry.config,
            stats: &self.registry.stats,
            owner: id,
        };
        let result = f(&update, &mut table);
        if let Some(shape) = self.registry.heap.get_mut(owner) {
            shape.transitions = table;
        }

        self.reload();
        result
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[inline]
    fn heap(&self) -> &Heap<Shape> {
        &self.registry.heap
    }

    fn table(&self) -> &TransitionTable {
        match self.registry.heap.get(self.shape) {
            Some(owner) => &owner.transitions,
            None => integrity_violation!("shape {:?} died under its accessor", self.shape),
        }
    }

}

impl fmt::Debug for TransitionsAccessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionsAccessor")
            .field("shape", &self.shape)
            .field("encoding", &self.encoding)
            .field("handler_resolved", &self.handler.is_some())
            .finish()
    }
}

fn check_single_index(index: usize) {
    if index != 0 {
        integrity_violation!("index {index} on a single-edge table");
    }
}

fn target_descriptor(target: &Shape) -> &PropertyDescriptor {
    match target.property() {
        Some(descriptor) => descriptor,
        None => integrity_violation!("property edge to {:?}, which adds no property", target.id()),
    }
}

/// Key of a single weak edge, recovered from its target.
fn simple_transition_key(target: &Shape) -> TransitionKey {
    let descriptor = target_descriptor(target);
    TransitionKey::property(descriptor.name.clone(), descriptor.details)
}

fn full_key(array: &TransitionArray, index: usize) -> TransitionKey {
    let sorted = array.number_of_transitions();
    if index < sorted {
        return array.entries()[index].key();
    }
    match array.special().get(index - sorted) {
        Some(special) => TransitionKey::Special(special.kind()),
        None => integrity_violation!(
            "get_key({index}) with {} transitions",
            array.total_transitions()
        ),
    }
}

// =============================================================================
// Table Update
// =============================================================================

/// The single edge a table held before promotion.
enum SingleEdge {
    Weak(WeakRef<Shape>),
    Special(SpecialTransition, WeakRef<Shape>),
}

/// Services a table mutation needs, borrowed while the table is detached.
struct TableUpdate<'r> {
    heap: &'r Heap<Shape>,
    config: &'r TransitionConfig,
    stats: &'r TransitionStats,
    owner: ShapeId,
}

impl TableUpdate<'_> {
    fn insert(
        &self,
        table: &mut TransitionTable,
        key: TransitionKey,
        target: ShapeHandle,
    ) -> Result<bool, TransitionError> {
        let existing = match table {
            TransitionTable::Full(array) => return self.insert_into_array(array, key, target),
            TransitionTable::Empty => None,
            TransitionTable::SingleWeak(weak) => weak
                .get(self.heap)
                .map(|shape| (simple_transition_key(shape), SingleEdge::Weak(*weak))),
            TransitionTable::SingleHandler { key, target } => (!target.is_cleared(self.heap))
                .then(|| (TransitionKey::Special(*key), SingleEdge::Special(*key, *target))),
        };

        match existing {
            Some((existing_key, edge)) if existing_key != key => {
                self.promote(table, edge, key, target)
            }
            // Vacant, cleared, or the same key: stay at the single-edge level.
            _ => self.install_single(table, key, target),
        }
    }

    fn install_single(
        &self,
        table: &mut TransitionTable,
        key: TransitionKey,
        target: ShapeHandle,
    ) -> Result<bool, TransitionError> {
        let from = table.encoding();
        match key {
            TransitionKey::Property { .. } => {
                *table = TransitionTable::SingleWeak(WeakRef::new(target));
            }
            TransitionKey::Special(kind) => {
                *table = TransitionTable::SingleHandler {
                    key: kind,
                    target: WeakRef::new(target),
                };
            }
            TransitionKey::Prototype(prototype) => {
                // The prototype cache hangs off a full array.
                if self.config.max_cached_prototype_transitions == 0 {
                    self.record_prototype_overflow(prototype);
                    return Ok(false);
                }
                let mut array = self.allocate_array()?;
                let cached = self.put_prototype(&mut array, prototype, target)?;
                *table = TransitionTable::Full(Box::new(array));
                self.stats.record_promotion();
                trace!(shape = ?self.owner, %from, to = %Encoding::Full, "transition table promoted");
                return Ok(cached);
            }
        }
        self.stats.record_single_edge_install();
        trace!(shape = ?self.owner, %from, to = %table.encoding(), "single transition installed");
        Ok(true)
    }

    fn promote(
        &self,
        table: &mut TransitionTable,
        existing: SingleEdge,
        key: TransitionKey,
        target: ShapeHandle,
    ) -> Result<bool, TransitionError> {
        let from = table.encoding();
        let mut array = self.allocate_array()?;
        match existing {
            SingleEdge::Weak(weak) => {
                let Some(shape) = weak.get(self.heap) else {
                    integrity_violation!("promoting a cleared edge of {:?}", self.owner);
                };
                let descriptor = target_descriptor(shape);
                array.insert_at(
                    0,
                    TransitionEntry::new(descriptor.name.clone(), descriptor.details, weak),
                );
            }
            SingleEdge::Special(kind, weak) => array.set_special(kind, weak),
        }
        let recorded = self.insert_into_array(&mut array, key, target)?;

        *table = TransitionTable::Full(Box::new(array));
        self.stats.record_promotion();
        trace!(shape = ?self.owner, %from, to = %Encoding::Full, "transition table promoted");
        Ok(recorded)
    }

    fn insert_into_array(
        &self,
        array: &mut TransitionArray,
        key: TransitionKey,
        target: ShapeHandle,
    ) -> Result<bool, TransitionError> {
        match key {
            TransitionKey::Property { name, details } => {
                self.insert_property(array, name, details, target)?;
                Ok(true)
            }
            TransitionKey::Special(kind) => {
                if array.search_special(kind).is_none() {
                    self.ensure_room(array)?;
                }
                array.set_special(kind, WeakRef::new(target));
                Ok(true)
            }
            TransitionKey::Prototype(prototype) => self.put_prototype(array, prototype, target),
        }
    }

    fn insert_property(
        &self,
        array: &mut TransitionArray,
        name: InternedString,
        details: PropertyDetails,
        target: ShapeHandle,
    ) -> Result<(), TransitionError> {
        if let SearchResult::Found(index) = array.search(&name, details) {
            array.set_target(index, WeakRef::new(target));
            return Ok(());
        }
        self.ensure_room(array)?;

        if array.number_of_transitions() == array.capacity() {
            // Structural rebuild: cleared slots go first, then double.
            self.compact(array);
            if array.number_of_transitions() == array.capacity() {
                let new_capacity = (array.capacity() * 2)
                    .min(self.config.max_transitions)
                    .max(array.number_of_transitions() + 1);
                let copied = array.grow(new_capacity)?;
                self.stats.record_grow(copied);
                debug!(shape = ?self.owner, capacity = new_capacity, copied, "transition array grown");
            }
        }

        let insertion_index = match array.search(&name, details) {
            SearchResult::NotFound { insertion_index } => insertion_index,
            SearchResult::Found(_) => {
                integrity_violation!("{name:?} appeared in {:?} during rebuild", self.owner)
            }
        };
        array.insert_at(
            insertion_index,
            TransitionEntry::new(name, details, WeakRef::new(target)),
        );

        if self.config.verify_sorted && !array.is_sorted_no_duplicates() {
            integrity_violation!("sorted region of {:?} out of order after insert", self.owner);
        }
        Ok(())
    }

    fn put_prototype(
        &self,
        array: &mut TransitionArray,
        prototype: PrototypeId,
        target: ShapeHandle,
    ) -> Result<bool, TransitionError> {
        let limit = self.config.max_cached_prototype_transitions;
        if limit == 0 {
            self.record_prototype_overflow(prototype);
            return Ok(false);
        }

        let side = array.prototype_transitions_mut();
        if let Some(index) = side.position(prototype) {
            side.set_target(index, WeakRef::new(target));
            return Ok(true);
        }
        if side.len() >= limit {
            let reclaimed = side.compact(self.heap);
            self.stats.record_compaction(reclaimed);
            if side.len() >= limit {
                self.record_prototype_overflow(prototype);
                return Ok(false);
            }
        }
        side.push(prototype, WeakRef::new(target))?;
        Ok(true)
    }

    /// Fail if the array already holds the maximum number of live edges.
    fn ensure_room(&self, array: &mut TransitionArray) -> Result<(), TransitionError> {
        let limit = self.config.max_transitions;
        if array.total_transitions() >= limit {
            self.compact(array);
            if array.total_transitions() >= limit {
                return Err(TransitionError::TooManyTransitions { limit });
            }
        }
        Ok(())
    }

    fn compact(&self, array: &mut TransitionArray) -> usize {
        let reclaimed = array.compact(self.heap);
        self.stats.record_compaction(reclaimed);
        if reclaimed > 0 {
            debug!(shape = ?self.owner, reclaimed, "transition array compacted");
        }
        reclaimed
    }

    fn allocate_array(&self) -> Result<TransitionArray, TransitionError> {
        let array = TransitionArray::allocate(self.config.initial_array_capacity)?;
        self.stats.record_array_allocation();
        Ok(array)
    }

    fn record_prototype_overflow(&self, prototype: PrototypeId) {
        self.stats.record_prototype_overflow();
        debug!(
            shape = ?self.owner,
            prototype = prototype.raw(),
            "prototype transition not cached"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::intern::intern;

    // -------------------------------------------------------------------------
    // Snapshot Freshness
    // -------------------------------------------------------------------------

    #[test]
    fn test_reads_see_own_inserts() {
        let mut registry = ShapeRegistry::new();
        let empty = registry.empty_shape();
        let x = registry.transition_default(empty, intern("x")).unwrap();
        let y = registry.transition_default(empty, intern("y")).unwrap();
        let owner = registry.transition_default(empty, intern("o")).unwrap();

        let mut accessor = registry.accessor(owner);
        assert_eq!(accessor.encoding(), Encoding::Empty);

        accessor.insert(TransitionKey::field(intern("x")), x).unwrap();
        assert_eq!(accessor.encoding(), Encoding::SingleWeak);
        assert_eq!(accessor.find_transition_to_field(&intern("x")), Some(x));

        accessor.insert(TransitionKey::field(intern("y")), y).unwrap();
        assert_eq!(accessor.encoding(), Encoding::Full);
        assert_eq!(accessor.number_of_transitions(), 2);
        assert_eq!(accessor.find_transition_to_field(&intern("x")), Some(x));
        assert_eq!(accessor.find_transition_to_field(&intern("y")), Some(y));
    }

    #[test]
    fn test_promotion_drops_memoized_handler() {
        let mut registry = ShapeRegistry::new();
        let empty = registry.empty_shape();
        let x = registry.transition_default(empty, intern("x")).unwrap();
        let frozen = registry
            .transition_special(empty, SpecialTransition::Frozen)
            .unwrap();
        let owner = registry.transition_default(empty, intern("o")).unwrap();

        let mut accessor = registry.accessor(owner);
        accessor
            .insert(TransitionKey::Special(SpecialTransition::Frozen), frozen)
            .unwrap();
        assert_eq!(accessor.encoding(), Encoding::SingleHandler);
        assert!(accessor.resolve_handler().is_some());

        accessor.insert(TransitionKey::field(intern("x")), x).unwrap();
        assert_eq!(accessor.encoding(), Encoding::Full);
        assert!(accessor.resolve_handler().is_none());
        assert_eq!(accessor.search_special(SpecialTransition::Frozen), Some(frozen));
    }
}
