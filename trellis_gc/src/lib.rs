//! Trellis Garbage Collection Collaborator
//!
//! The minimal collector surface the shape runtime depends on.
//!
//! # Architecture
//!
//! - **Heap**: A generational slot arena. Objects are addressed by [`Handle`]s
//!   (index + generation), so a handle to a freed slot can never observe the
//!   slot's next occupant.
//!
//! - **Tracing**: Objects implement [`Trace`] and report the handles they hold
//!   *strongly*. [`Heap::collect`] marks from a [`RootSet`] and sweeps the rest.
//!
//! - **Weak references**: [`WeakRef`] is a token that is never traced. Once its
//!   target is swept (or released by the host) the token reports itself as
//!   cleared and refuses to resolve.
//!
//! - **Handlers**: [`HandlerCache`] bridges a weak target into a strongly-held
//!   [`Handler`] object, the thing call-site caches keep alive.
//!
//! # Usage
//!
//! ```ignore
//! use trellis_gc::{Heap, RootSet, WeakRef};
//!
//! let mut heap = Heap::new();
//! let node = heap.alloc(MyNode::new());
//! let weak = WeakRef::new(node);
//!
//! heap.collect(&RootSet::new());
//! assert!(weak.is_cleared(&heap));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handler;
pub mod heap;
pub mod roots;
pub mod trace;
pub mod weak;

mod stats;

// Re-exports for convenient access
pub use handler::{Handler, HandlerCache, HandlerId};
pub use heap::{CollectionOutcome, Heap};
pub use roots::{Handle, RawHandle, RootSet};
pub use stats::{HeapStats, HeapStatsSnapshot};
pub use trace::{CountingTracer, Trace, Tracer};
pub use weak::WeakRef;
