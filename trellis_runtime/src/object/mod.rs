//! Object layout descriptors.
//!
//! Shapes describe where an object keeps its properties. Objects themselves are
//! out of scope here: hosts store a [`ShapeHandle`](shape::ShapeHandle) next to
//! their slots.

pub mod shape;

pub use shape::{
    ElementsKind, IntegrityLevel, MAX_INLINE_SLOTS, PropertyAttributes, PropertyDescriptor,
    PropertyDetails, PropertyKind, PrototypeId, Shape, ShapeHandle, ShapeId, ShapeRegistry,
};
