//! Shape system for hidden class optimization.
//!
//! Implements V8-style hidden classes (called Shapes) for O(1) property access.
//!
//! # Architecture
//!
//! Objects with the same sequence of property additions share a Shape. Each Shape
//! describes the layout of properties in the object, enabling inline caching.
//!
//! Shapes live in a [`Heap<Shape>`] owned by the [`ShapeRegistry`] and are
//! addressed by [`ShapeHandle`]s. A child holds its parent strongly (the
//! collector traces it); a parent reaches its children only through its
//! transition table, whose edges are weak.
//!
//! ## Shape Transitions
//!
//! When a property is added to an object, instead of doing expensive dictionary
//! lookups, we transition to a new Shape that includes the new property. Shapes
//! form a transition tree:
//!
//! ```text
//!     EmptyShape
//!         |
//!     +---+---+
//!     |       |
//!   "x"     "y"
//!     |       |
//!  Shape1  Shape2
//!     |
//!   "y"
//!     |
//!  Shape3 (has both x and y)
//! ```
//!
//! Besides named properties, an edge can be a special transition (elements
//! kind, `preventExtensions`, seal, freeze) or a prototype change. Those
//! targets keep the parent's property layout.
//!
//! ## Property Descriptors
//!
//! Each Shape contains a descriptor for the property it adds, including:
//! - Property name (interned)
//! - Slot offset in the object's inline storage
//! - Property details (kind and attributes)
//!
//! ## Inline Property Storage
//!
//! Objects store their first N properties directly in fixed slots (inline storage),
//! avoiding dictionary overhead for common cases. When inline storage is exhausted,
//! properties spill to a backing dictionary.

use crate::config::{ConfigError, TransitionConfig};
use crate::error::{TransitionError, integrity_violation};
use crate::stats::TransitionStats;
use crate::transitions::{SpecialTransition, TransitionKey, TransitionTable, TransitionsAccessor};
use std::fmt;
use tracing::debug;
use trellis_core::intern::InternedString;
use trellis_gc::{CollectionOutcome, Handle, HandlerCache, Heap, RootSet, Trace, Tracer, WeakRef};

// =============================================================================
// Property Attributes
// =============================================================================

bitflags::bitflags! {
    /// Property attributes.
    ///
    /// The empty set is a writable, enumerable, configurable property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyAttributes: u8 {
        /// Property value cannot be changed.
        const READ_ONLY = 1 << 0;
        /// Property is skipped by enumeration.
        const DONT_ENUM = 1 << 1;
        /// Property cannot be deleted or reconfigured.
        const DONT_DELETE = 1 << 2;
    }
}

impl Default for PropertyAttributes {
    #[inline]
    fn default() -> Self {
        Self::NONE
    }
}

impl PropertyAttributes {
    /// No attributes set.
    pub const NONE: Self = Self::empty();
    /// Attributes of every property on a sealed object.
    pub const SEALED: Self = Self::DONT_DELETE;
    /// Attributes of every property on a frozen object.
    pub const FROZEN: Self = Self::READ_ONLY.union(Self::DONT_DELETE);

    /// Create non-enumerable attributes (for internal slots).
    #[inline]
    pub const fn hidden() -> Self {
        Self::DONT_ENUM
    }
}

// =============================================================================
// Property Details
// =============================================================================

/// Whether a property holds a value or a getter/setter pair.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyKind {
    /// Plain value slot.
    #[default]
    Data = 0,
    /// Getter/setter pair.
    Accessor = 1,
}

/// Kind and attributes of a property.
///
/// Two keys with the same name but different details are distinct edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PropertyDetails {
    /// Data or accessor.
    pub kind: PropertyKind,
    /// Attribute flags.
    pub attributes: PropertyAttributes,
}

impl PropertyDetails {
    /// Create property details.
    #[inline]
    pub const fn new(kind: PropertyKind, attributes: PropertyAttributes) -> Self {
        Self { kind, attributes }
    }

    /// Data property details.
    #[inline]
    pub const fn data(attributes: PropertyAttributes) -> Self {
        Self::new(PropertyKind::Data, attributes)
    }

    /// Accessor property details.
    #[inline]
    pub const fn accessor(attributes: PropertyAttributes) -> Self {
        Self::new(PropertyKind::Accessor, attributes)
    }
}

impl fmt::Display for PropertyDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            PropertyKind::Data => "data",
            PropertyKind::Accessor => "accessor",
        })?;
        if !self.attributes.is_empty() {
            f.write_str("(")?;
            for (i, (name, _)) in self.attributes.iter_names().enumerate() {
                if i > 0 {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

// =============================================================================
// Property Descriptor
// =============================================================================

/// Describes a single property in a Shape.
///
/// Contains all information needed for O(1) property access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name (interned for fast comparison).
    pub name: InternedString,
    /// Slot index (0-based). Indices from [`MAX_INLINE_SLOTS`] up address
    /// out-of-object storage.
    pub slot_index: u16,
    /// Property kind and attributes.
    pub details: PropertyDetails,
}

impl PropertyDescriptor {
    /// Create a new property descriptor.
    #[inline]
    pub fn new(name: InternedString, slot_index: u16, details: PropertyDetails) -> Self {
        Self {
            name,
            slot_index,
            details,
        }
    }

    /// Create a standard writable data property.
    #[inline]
    pub fn writable(name: InternedString, slot_index: u16) -> Self {
        Self::new(name, slot_index, PropertyDetails::default())
    }

    /// Check if property is writable.
    #[inline]
    pub fn is_writable(&self) -> bool {
        !self.details.attributes.contains(PropertyAttributes::READ_ONLY)
    }

    /// Check if property is enumerable.
    #[inline]
    pub fn is_enumerable(&self) -> bool {
        !self.details.attributes.contains(PropertyAttributes::DONT_ENUM)
    }

    /// Check if property is configurable.
    #[inline]
    pub fn is_configurable(&self) -> bool {
        !self.details.attributes.contains(PropertyAttributes::DONT_DELETE)
    }

    /// Check if property is a data property.
    #[inline]
    pub fn is_data(&self) -> bool {
        self.details.kind == PropertyKind::Data
    }

    /// Check if the slot lives inside the object.
    #[inline]
    pub fn is_inline(&self) -> bool {
        (self.slot_index as usize) < MAX_INLINE_SLOTS
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// Unique identifier for a Shape.
///
/// Used for fast comparison and IC keying. Never reused, unlike heap slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ShapeId(pub u32);

impl ShapeId {
    /// The empty shape ID (no properties).
    pub const EMPTY: Self = Self(0);

    /// Check if this is the empty shape.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Opaque identity of a prototype object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct PrototypeId(pub u32);

impl PrototypeId {
    /// The null prototype.
    pub const NULL: Self = Self(0);

    /// Get raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

// =============================================================================
// Elements and Integrity
// =============================================================================

/// Representation of an object's indexed elements.
///
/// Ordered from most to least specific; elements transitions only ever
/// generalize.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ElementsKind {
    /// Small integers only.
    #[default]
    Smi = 0,
    /// Unboxed doubles.
    Double = 1,
    /// Arbitrary values.
    Object = 2,
}

impl ElementsKind {
    /// The next more general kind, if any.
    #[inline]
    pub const fn generalized(self) -> Option<Self> {
        match self {
            Self::Smi => Some(Self::Double),
            Self::Double => Some(Self::Object),
            Self::Object => None,
        }
    }
}

/// Extensibility level reached through special transitions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum IntegrityLevel {
    /// Ordinary object.
    #[default]
    Extensible = 0,
    /// No new properties may be added.
    NonExtensible = 1,
    /// Non-extensible and every property non-configurable.
    Sealed = 2,
    /// Sealed and every data property read-only.
    Frozen = 3,
}

// =============================================================================
// Shape
// =============================================================================

/// Maximum number of inline property slots.
///
/// Objects with more properties spill to dictionary.
/// 8 slots = 64 bytes of inline storage (8 * 8-byte Values).
pub const MAX_INLINE_SLOTS: usize = 8;

/// Handle to a shape in a [`ShapeRegistry`].
pub type ShapeHandle = Handle<Shape>;

/// A Shape describes the property layout of objects.
///
/// Objects with the same property sequence share a Shape, enabling:
/// - O(1) property access via cached slot offsets
/// - Efficient IC invalidation on shape transitions
///
/// Everything except the transition table is immutable once created.
#[derive(Debug)]
pub struct Shape {
    /// Unique identifier for this shape.
    id: ShapeId,

    /// Parent shape (None for empty shape). Strong.
    parent: Option<ShapeHandle>,

    /// Property added by this shape transition.
    /// None for the empty shape and for special/prototype targets.
    property: Option<PropertyDescriptor>,

    /// Total number of properties in this shape chain.
    property_count: u16,

    /// Number of inline slots used.
    inline_count: u16,

    prototype: PrototypeId,
    elements_kind: ElementsKind,
    integrity: IntegrityLevel,

    /// Outgoing edges. Only reached through a [`TransitionsAccessor`].
    pub(crate) transitions: TransitionTable,
}

impl Shape {
    /// Create the empty shape (root of all shape trees).
    fn empty() -> Self {
        Self {
            id: ShapeId::EMPTY,
            parent: None,
            property: None,
            property_count: 0,
            inline_count: 0,
            prototype: PrototypeId::NULL,
            elements_kind: ElementsKind::default(),
            integrity: IntegrityLevel::default(),
            transitions: TransitionTable::Empty,
        }
    }

    /// Create a new shape by adding a property to the parent.
    fn with_property(
        parent_handle: ShapeHandle,
        parent: &Shape,
        name: InternedString,
        details: PropertyDetails,
        id: ShapeId,
    ) -> Self {
        // Slots below MAX_INLINE_SLOTS are inline; the rest are out of object.
        let slot_index = parent.property_count;
        let inline_count = if (slot_index as usize) < MAX_INLINE_SLOTS {
            parent.inline_count + 1
        } else {
            parent.inline_count
        };

        Self {
            id,
            parent: Some(parent_handle),
            property: Some(PropertyDescriptor::new(name, slot_index, details)),
            property_count: parent.property_count + 1,
            inline_count,
            prototype: parent.prototype,
            elements_kind: parent.elements_kind,
            integrity: parent.integrity,
            transitions: TransitionTable::Empty,
        }
    }

    /// Create a shape with the parent's layout and no property of its own.
    fn derived(parent_handle: ShapeHandle, parent: &Shape, id: ShapeId) -> Self {
        Self {
            id,
            parent: Some(parent_handle),
            property: None,
            property_count: parent.property_count,
            inline_count: parent.inline_count,
            prototype: parent.prototype,
            elements_kind: parent.elements_kind,
            integrity: parent.integrity,
            transitions: TransitionTable::Empty,
        }
    }

    /// Elements kind and integrity after `kind`, or `None` if it changes nothing.
    fn after_special(&self, kind: SpecialTransition) -> Option<(ElementsKind, IntegrityLevel)> {
        let raise = |level: IntegrityLevel| {
            (self.integrity < level).then_some((self.elements_kind, level))
        };
        match kind {
            SpecialTransition::Elements => self
                .elements_kind
                .generalized()
                .map(|elements| (elements, self.integrity)),
            SpecialTransition::PreventExtensions => raise(IntegrityLevel::NonExtensible),
            SpecialTransition::Sealed => raise(IntegrityLevel::Sealed),
            SpecialTransition::Frozen => raise(IntegrityLevel::Frozen),
        }
    }

    /// Get the shape ID.
    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Get the parent shape.
    #[inline]
    pub fn parent(&self) -> Option<ShapeHandle> {
        self.parent
    }

    /// Get the property descriptor for this shape's added property.
    #[inline]
    pub fn property(&self) -> Option<&PropertyDescriptor> {
        self.property.as_ref()
    }

    /// Get total property count.
    #[inline]
    pub fn property_count(&self) -> u16 {
        self.property_count
    }

    /// Get number of inline slots used.
    #[inline]
    pub fn inline_count(&self) -> u16 {
        self.inline_count
    }

    /// Prototype of objects with this shape.
    #[inline]
    pub fn prototype(&self) -> PrototypeId {
        self.prototype
    }

    /// Elements kind of objects with this shape.
    #[inline]
    pub fn elements_kind(&self) -> ElementsKind {
        self.elements_kind
    }

    /// Integrity level of objects with this shape.
    #[inline]
    pub fn integrity_level(&self) -> IntegrityLevel {
        self.integrity
    }

    /// Check if all properties fit in inline storage.
    #[inline]
    pub fn is_fully_inline(&self) -> bool {
        (self.property_count as usize) <= MAX_INLINE_SLOTS
    }

    /// Check if this is the empty shape.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl Trace for Shape {
    fn trace(&self, tracer: &mut dyn Tracer) {
        // Transition targets are weak and never reported.
        if let Some(parent) = self.parent {
            tracer.trace_handle(parent.raw());
        }
    }
}

// =============================================================================
// Shape Registry
// =============================================================================

/// Owner of every shape and of the services their transition tables use.
///
/// All transition reads and writes go through a [`TransitionsAccessor`], which
/// borrows the registry mutably for its whole lifetime.
#[derive(Debug)]
pub struct ShapeRegistry {
    pub(crate) heap: Heap<Shape>,
    pub(crate) handlers: HandlerCache<Shape>,
    pub(crate) config: TransitionConfig,
    pub(crate) stats: TransitionStats,

    /// Counter for generating unique shape IDs.
    next_id: u32,

    /// The empty shape (shared root).
    empty_shape: ShapeHandle,
}

impl ShapeRegistry {
    /// Create a new shape registry with the default configuration.
    pub fn new() -> Self {
        Self::build(TransitionConfig::default())
    }

    /// Create a shape registry with a custom configuration.
    pub fn with_config(config: TransitionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TransitionConfig) -> Self {
        let mut heap = Heap::new();
        let empty_shape = heap.alloc(Shape::empty());
        Self {
            heap,
            handlers: HandlerCache::new(),
            config,
            stats: TransitionStats::new(),
            // ID 0 is reserved for empty shape
            next_id: 1,
            empty_shape,
        }
    }

    /// Get the empty shape.
    #[inline]
    pub fn empty_shape(&self) -> ShapeHandle {
        self.empty_shape
    }

    /// Borrow a shape if it is still alive.
    #[inline]
    pub fn get(&self, shape: ShapeHandle) -> Option<&Shape> {
        self.heap.get(shape)
    }

    /// Borrow a live shape.
    ///
    /// # Panics
    ///
    /// Panics if the shape has been collected.
    pub fn shape(&self, shape: ShapeHandle) -> &Shape {
        match self.heap.get(shape) {
            Some(shape) => shape,
            None => integrity_violation!("shape {shape:?} is not live"),
        }
    }

    /// Check if a shape is still alive.
    #[inline]
    pub fn is_live(&self, shape: ShapeHandle) -> bool {
        self.heap.contains(shape)
    }

    /// Transition configuration.
    #[inline]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Transition statistics.
    #[inline]
    pub fn stats(&self) -> &TransitionStats {
        &self.stats
    }

    /// The shape heap.
    #[inline]
    pub fn heap(&self) -> &Heap<Shape> {
        &self.heap
    }

    /// The handler cache backing special transitions.
    #[inline]
    pub fn handlers(&self) -> &HandlerCache<Shape> {
        &self.handlers
    }

    /// Open the transition table of `shape`.
    #[inline]
    pub fn accessor(&mut self, shape: ShapeHandle) -> TransitionsAccessor<'_> {
        TransitionsAccessor::new(self, shape)
    }

    fn next_shape_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn check_room(&mut self, from: ShapeHandle) -> Result<(), TransitionError> {
        let limit = self.config.max_transitions;
        if self.accessor(from).can_have_more_transitions() {
            Ok(())
        } else {
            Err(TransitionError::TooManyTransitions { limit })
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Transition to a new shape by adding a data property.
    ///
    /// If a transition already exists, returns the cached shape.
    /// Otherwise, creates a new shape and records the transition.
    pub fn transition(
        &mut self,
        from: ShapeHandle,
        name: InternedString,
        attributes: PropertyAttributes,
    ) -> Result<ShapeHandle, TransitionError> {
        self.transition_with_kind(from, name, PropertyKind::Data, attributes)
    }

    /// Transition with default property attributes.
    #[inline]
    pub fn transition_default(
        &mut self,
        from: ShapeHandle,
        name: InternedString,
    ) -> Result<ShapeHandle, TransitionError> {
        self.transition(from, name, PropertyAttributes::NONE)
    }

    /// Transition by adding a property of any kind.
    pub fn transition_with_kind(
        &mut self,
        from: ShapeHandle,
        name: InternedString,
        kind: PropertyKind,
        attributes: PropertyAttributes,
    ) -> Result<ShapeHandle, TransitionError> {
        let details = PropertyDetails::new(kind, attributes);
        let key = TransitionKey::property(name.clone(), details);

        // Fast path: check if transition already exists
        if let Some(existing) = self.accessor(from).find(&key) {
            return Ok(existing);
        }
        let limit = self.config.max_properties;
        if self.shape(from).property_count as usize >= limit {
            return Err(TransitionError::TooManyProperties { limit });
        }
        self.check_room(from)?;

        // Slow path: create new shape
        let id = self.next_shape_id();
        let child = Shape::with_property(from, self.shape(from), name, details, id);
        let child = self.heap.alloc(child);
        self.accessor(from).insert(key, child)?;
        Ok(child)
    }

    /// Follow or create a special transition.
    ///
    /// Returns `from` itself when the transition would change nothing (freezing
    /// a frozen shape, generalizing the most general elements kind).
    pub fn transition_special(
        &mut self,
        from: ShapeHandle,
        kind: SpecialTransition,
    ) -> Result<ShapeHandle, TransitionError> {
        if let Some(existing) = self.accessor(from).search_special(kind) {
            return Ok(existing);
        }
        let Some((elements_kind, integrity)) = self.shape(from).after_special(kind) else {
            return Ok(from);
        };
        self.check_room(from)?;

        let id = self.next_shape_id();
        let child = Shape {
            elements_kind,
            integrity,
            ..Shape::derived(from, self.shape(from), id)
        };
        let child = self.heap.alloc(child);
        self.accessor(from).insert(TransitionKey::Special(kind), child)?;
        Ok(child)
    }

    /// Follow or create a prototype transition.
    ///
    /// The result is cached on `from` while the prototype cache has room;
    /// when it does not, a fresh shape is returned every time.
    pub fn transition_prototype(
        &mut self,
        from: ShapeHandle,
        prototype: PrototypeId,
    ) -> Result<ShapeHandle, TransitionError> {
        if self.shape(from).prototype == prototype {
            return Ok(from);
        }
        if let Some(existing) = self.accessor(from).get_prototype_transition(prototype) {
            return Ok(existing);
        }

        let id = self.next_shape_id();
        let child = Shape {
            prototype,
            ..Shape::derived(from, self.shape(from), id)
        };
        let child = self.heap.alloc(child);
        self.accessor(from).put_prototype_transition(prototype, child)?;
        Ok(child)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Iterate over `shape` and its live ancestors, nearest first.
    pub fn ancestors(&self, shape: ShapeHandle) -> impl Iterator<Item = &Shape> {
        std::iter::successors(self.heap.get(shape), |current| {
            current.parent.and_then(|parent| self.heap.get(parent))
        })
    }

    /// Lookup a property by name, traversing the shape chain.
    ///
    /// Returns the slot index if found.
    /// O(n) where n is property count, but short chains are fast.
    pub fn lookup(&self, shape: ShapeHandle, name: &str) -> Option<u16> {
        self.get_descriptor(shape, name).map(|desc| desc.slot_index)
    }

    /// Lookup a property by interned name (faster comparison).
    pub fn lookup_interned(&self, shape: ShapeHandle, name: &InternedString) -> Option<u16> {
        self.ancestors(shape)
            .filter_map(Shape::property)
            // Interned string comparison is pointer equality
            .find(|prop| &prop.name == name)
            .map(|prop| prop.slot_index)
    }

    /// Get full property descriptor by name.
    pub fn get_descriptor(&self, shape: ShapeHandle, name: &str) -> Option<&PropertyDescriptor> {
        self.ancestors(shape)
            .filter_map(Shape::property)
            .find(|prop| prop.name.as_str() == name)
    }

    /// Collect all property names in definition order.
    pub fn property_names(&self, shape: ShapeHandle) -> Vec<InternedString> {
        let mut names: Vec<_> = self
            .ancestors(shape)
            .filter_map(Shape::property)
            .map(|prop| prop.name.clone())
            .collect();
        names.reverse();
        names
    }

    /// Collect all property descriptors in definition order.
    pub fn all_descriptors(&self, shape: ShapeHandle) -> Vec<PropertyDescriptor> {
        let mut descriptors: Vec<_> = self
            .ancestors(shape)
            .filter_map(Shape::property)
            .cloned()
            .collect();
        descriptors.reverse();
        descriptors
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Collect every shape not reachable from `roots` or the empty shape.
    ///
    /// Transition edges do not keep shapes alive. Tables pointing at collected
    /// shapes are left as they are; their cleared slots are dropped by the next
    /// rebuild or by [`sweep_transitions`](Self::sweep_transitions).
    pub fn collect_garbage(
        &mut self,
        roots: impl IntoIterator<Item = ShapeHandle>,
    ) -> CollectionOutcome {
        let mut root_set = RootSet::from_handles(roots);
        root_set.register(self.empty_shape);

        let outcome = self.heap.collect(&root_set);
        let handlers_swept = self.handlers.sweep(&self.heap);
        debug!(
            marked = outcome.marked,
            freed = outcome.freed,
            handlers_swept,
            "shape collection finished"
        );
        outcome
    }

    /// Free a single shape immediately, as if the collector had found it dead.
    ///
    /// Children of a released shape keep a dangling parent handle, so their
    /// ancestor walks stop early. The empty shape cannot be released.
    /// Any cached handler for the shape is dropped with it.
    pub fn release(&mut self, shape: ShapeHandle) -> bool {
        if shape == self.empty_shape || self.heap.release(shape).is_none() {
            return false;
        }
        self.handlers.forget(WeakRef::new(shape));
        true
    }

    /// Compact the transition table of every live shape.
    ///
    /// Returns the number of cleared edges removed.
    pub fn sweep_transitions(&mut self) -> usize {
        let reclaimed: usize = self
            .heap
            .handles()
            .into_iter()
            .map(|shape| self.accessor(shape).compact())
            .sum();
        if reclaimed > 0 {
            debug!(reclaimed, "swept transition tables");
        }
        reclaimed
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Get number of shapes created (including empty).
    pub fn shape_count(&self) -> u32 {
        self.next_id
    }

    /// Get number of shapes currently alive.
    pub fn live_shape_count(&self) -> usize {
        self.heap.len()
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
