//! Hidden-class shapes and their transition tables for Trellis.
//!
//! This crate provides:
//! - Shapes (hidden classes) stored in a collected arena
//! - Transition tables with four space-optimized encodings
//! - A total order over transition keys for binary search
//! - Weak transition edges that never keep a shape alive
//! - Call-site handlers for special transitions
//!
//! # Example
//!
//! ```ignore
//! use trellis_core::intern::intern;
//! use trellis_runtime::ShapeRegistry;
//!
//! let mut registry = ShapeRegistry::new();
//! let empty = registry.empty_shape();
//! let x = registry.transition_default(empty, intern("x"))?;
//! let xy = registry.transition_default(x, intern("y"))?;
//! assert_eq!(registry.lookup(xy, "y"), Some(1));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod object;
pub mod stats;
pub mod transitions;

// Re-export commonly used items
pub use config::{ConfigError, TransitionConfig};
pub use error::TransitionError;
pub use object::{
    ElementsKind, IntegrityLevel, MAX_INLINE_SLOTS, PropertyAttributes, PropertyDescriptor,
    PropertyDetails, PropertyKind, PrototypeId, Shape, ShapeHandle, ShapeId, ShapeRegistry,
};
pub use stats::{TransitionStats, TransitionStatsSnapshot};
pub use transitions::{
    Encoding, SpecialTransition, TransitionKey, TransitionTable, TransitionsAccessor,
};
