//! Shape transition tables.
//!
//! Each [`Shape`](crate::Shape) owns a [`TransitionTable`] recording the
//! shapes reached from it by adding a property, by a special transition, or by
//! changing the prototype. Edges are weak: a transition never keeps its target
//! alive.
//!
//! - [`key`]: transition keys and the total order over property edges.
//! - [`array`]: the full, binary-searchable edge array.
//! - [`table`]: the four table encodings.
//! - [`accessor`]: [`TransitionsAccessor`], the only way to read or write a table.
//! - `tree`: depth-first traversal and dumping of a transition tree.

pub mod accessor;
pub mod array;
pub mod key;
pub mod table;

mod tree;

pub use accessor::{LiveTransition, TransitionsAccessor};
pub use array::{PrototypeTransitions, SearchResult, SpecialEntry, TransitionArray, TransitionEntry};
pub use key::{SpecialTransition, TransitionKey, compare_details, compare_keys, compare_names};
pub use table::{Encoding, TransitionTable};
pub use tree::TreeNode;
