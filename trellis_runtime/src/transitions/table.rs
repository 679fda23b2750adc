//! The per-shape transition table and its four encodings.

use super::array::TransitionArray;
use super::key::SpecialTransition;
use crate::object::shape::Shape;
use std::fmt;
use trellis_gc::WeakRef;

/// Outgoing edges of one shape.
///
/// Most shapes have zero or one transition, so the table starts small and is
/// promoted to a [`TransitionArray`] only once a second distinct edge arrives:
///
/// ```text
///   Empty ──property──► SingleWeak ───┐
///     │                               ├──second key──► Full
///     └───special────► SingleHandler ─┘
/// ```
///
/// Promotion never runs backwards. A single edge whose target was collected
/// may be overwritten by another single edge.
#[derive(Debug, Default)]
pub enum TransitionTable {
    /// No transitions.
    #[default]
    Empty,
    /// One property transition. The key is not stored: it is the target's
    /// last-added property descriptor.
    SingleWeak(WeakRef<Shape>),
    /// One special transition. Its call-site handler is resolved from the
    /// weak target on demand, see
    /// [`TransitionsAccessor::resolve_handler`](super::TransitionsAccessor::resolve_handler).
    SingleHandler {
        /// Which special transition this is.
        key: SpecialTransition,
        /// Weak target shape.
        target: WeakRef<Shape>,
    },
    /// Sorted array of property edges plus special and prototype regions.
    Full(Box<TransitionArray>),
}

impl TransitionTable {
    /// The physical encoding of this table.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        match self {
            Self::Empty => Encoding::Empty,
            Self::SingleWeak(_) => Encoding::SingleWeak,
            Self::SingleHandler { .. } => Encoding::SingleHandler,
            Self::Full(_) => Encoding::Full,
        }
    }
}

/// Tag of a [`TransitionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// No transitions.
    Empty,
    /// One weak property edge.
    SingleWeak,
    /// One special edge behind a handler.
    SingleHandler,
    /// A full transition array.
    Full,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::SingleWeak => "single-weak",
            Self::SingleHandler => "single-handler",
            Self::Full => "full",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_gc::{Handle, RawHandle};

    #[test]
    fn test_default_is_empty() {
        assert_eq!(TransitionTable::default().encoding(), Encoding::Empty);
    }

    #[test]
    fn test_take_leaves_empty() {
        let weak = WeakRef::new(Handle::<Shape>::from_raw(RawHandle::new(3, 0)));
        let mut table = TransitionTable::SingleWeak(weak);
        let taken = std::mem::take(&mut table);
        assert_eq!(taken.encoding(), Encoding::SingleWeak);
        assert_eq!(table.encoding(), Encoding::Empty);
    }

    #[test]
    fn test_encoding_display() {
        assert_eq!(Encoding::SingleHandler.to_string(), "single-handler");
        assert_eq!(Encoding::Full.to_string(), "full");
    }
}
