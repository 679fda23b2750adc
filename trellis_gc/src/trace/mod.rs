//! Object tracing for garbage collection.
//!
//! The `Trace` trait is the interface between heap objects and the collector.
//! An object reports every handle it holds strongly; handles wrapped in a
//! [`WeakRef`](crate::WeakRef) are deliberately left out, which is what makes
//! them weak.

pub mod tracer;

pub use tracer::{CountingTracer, Tracer};

/// Trait for types that can be traced by the garbage collector.
///
/// Implementations must:
/// 1. Report every strongly-held handle
/// 2. Never report a handle that is only held weakly
///
/// # Example
///
/// ```ignore
/// use trellis_gc::{Handle, Trace, Tracer};
///
/// struct Node {
///     parent: Option<Handle<Node>>,
///     children: Vec<WeakRef<Node>>,
/// }
///
/// impl Trace for Node {
///     fn trace(&self, tracer: &mut dyn Tracer) {
///         if let Some(parent) = self.parent {
///             tracer.trace_handle(parent.raw());
///         }
///         // children are weak: not traced
///     }
/// }
/// ```
pub trait Trace {
    /// Visit all strongly-held handles.
    fn trace(&self, tracer: &mut dyn Tracer);
}
