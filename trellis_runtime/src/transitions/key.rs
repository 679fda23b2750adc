//! Transition keys and the edge comparator.
//!
//! Property edges in a [`TransitionArray`](super::TransitionArray) are kept in
//! a strict total order so lookups can binary search:
//!
//! 1. Identical names order by their details.
//! 2. Different names order by their precomputed hash, ascending.
//! 3. Different names with equal hashes order by their text.
//! 4. Same text from two different interners orders by entry address.
//!
//! Details order by kind (`Data < Accessor`) and then by attribute bits.
//! Special and prototype keys never enter the sorted region; their relative
//! order in [`TransitionKey`]'s `Ord` impl only exists so that every key pair
//! is comparable.

use crate::object::shape::{PropertyAttributes, PropertyDetails, PrototypeId};
use std::cmp::Ordering;
use std::fmt;
use trellis_core::intern::InternedString;

// =============================================================================
// Special Transitions
// =============================================================================

/// Reserved transition kinds that do not add a named property.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialTransition {
    /// Generalize the elements kind of the backing store.
    Elements = 0,
    /// `Object.preventExtensions`.
    PreventExtensions = 1,
    /// `Object.seal`.
    Sealed = 2,
    /// `Object.freeze`.
    Frozen = 3,
}

impl SpecialTransition {
    /// Every special kind, in key order.
    pub const ALL: [Self; 4] = [
        Self::Elements,
        Self::PreventExtensions,
        Self::Sealed,
        Self::Frozen,
    ];

    /// Symbolic name used in tree dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Elements => "<elements>",
            Self::PreventExtensions => "<nonextensible>",
            Self::Sealed => "<sealed>",
            Self::Frozen => "<frozen>",
        }
    }
}

// =============================================================================
// Transition Key
// =============================================================================

/// The label on an edge between two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitionKey {
    /// Adding or reconfiguring a named property.
    Property {
        /// Interned property name.
        name: InternedString,
        /// Kind and attributes of the property on the target shape.
        details: PropertyDetails,
    },
    /// A reserved, name-less transition.
    Special(SpecialTransition),
    /// Changing the prototype link.
    Prototype(PrototypeId),
}

impl TransitionKey {
    /// Create a property key.
    #[inline]
    pub fn property(name: InternedString, details: PropertyDetails) -> Self {
        Self::Property { name, details }
    }

    /// Create a key for a plain writable data field.
    #[inline]
    pub fn field(name: InternedString) -> Self {
        Self::property(name, PropertyDetails::data(PropertyAttributes::NONE))
    }

    /// Property name, if this is a property key.
    #[inline]
    pub fn name(&self) -> Option<&InternedString> {
        match self {
            Self::Property { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Check if this key lives in the sorted region of an array.
    #[inline]
    pub fn is_property(&self) -> bool {
        matches!(self, Self::Property { .. })
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Property { .. } => 0,
            Self::Special(_) => 1,
            Self::Prototype(_) => 2,
        }
    }
}

impl Ord for TransitionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                Self::Property { name, details },
                Self::Property {
                    name: other_name,
                    details: other_details,
                },
            ) => compare_keys(name, *details, other_name, *other_details),
            (Self::Special(a), Self::Special(b)) => a.cmp(b),
            (Self::Prototype(a), Self::Prototype(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for TransitionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property { name, details } => write!(f, "{name} {details}"),
            Self::Special(kind) => f.write_str(kind.name()),
            Self::Prototype(proto) => write!(f, "<prototype {}>", proto.raw()),
        }
    }
}

// =============================================================================
// Comparator
// =============================================================================

/// Order two property names.
///
/// Equal only when both are the same interned entry.
pub fn compare_names(a: &InternedString, b: &InternedString) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    a.hash_value()
        .cmp(&b.hash_value())
        .then_with(|| a.as_str().cmp(b.as_str()))
        .then_with(|| a.addr().cmp(&b.addr()))
}

/// Order two property details: kind first, then attribute bits.
#[inline]
pub fn compare_details(a: PropertyDetails, b: PropertyDetails) -> Ordering {
    (a.kind as u8)
        .cmp(&(b.kind as u8))
        .then_with(|| a.attributes.bits().cmp(&b.attributes.bits()))
}

/// Order two property keys.
pub fn compare_keys(
    name1: &InternedString,
    details1: PropertyDetails,
    name2: &InternedString,
    details2: PropertyDetails,
) -> Ordering {
    match compare_names(name1, name2) {
        Ordering::Equal => compare_details(details1, details2),
        unequal => unequal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::intern::{Interner, intern};

    fn data() -> PropertyDetails {
        PropertyDetails::data(PropertyAttributes::NONE)
    }

    // -------------------------------------------------------------------------
    // Name Ordering
    // -------------------------------------------------------------------------

    #[test]
    fn test_identical_names_equal() {
        let a = intern("x");
        assert_eq!(compare_names(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_names_order_by_hash() {
        let interner = Interner::with_hash_fn(|text| text.len() as u32);
        let short = interner.intern("zz");
        let long = interner.intern("aaa");
        assert_eq!(compare_names(&short, &long), Ordering::Less);
        assert_eq!(compare_names(&long, &short), Ordering::Greater);
    }

    #[test]
    fn test_hash_collision_orders_by_text() {
        let interner = Interner::with_hash_fn(|_| 7);
        let b = interner.intern("b");
        let a = interner.intern("a");
        assert_eq!(compare_names(&a, &b), Ordering::Less);
        assert_eq!(compare_names(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_same_text_different_interners_is_total() {
        let first = Interner::new();
        let second = Interner::new();
        let a = first.intern("x");
        let b = second.intern("x");
        let forward = compare_names(&a, &b);
        assert_ne!(forward, Ordering::Equal);
        assert_eq!(compare_names(&b, &a), forward.reverse());
    }

    // -------------------------------------------------------------------------
    // Details Ordering
    // -------------------------------------------------------------------------

    #[test]
    fn test_data_before_accessor() {
        let accessor = PropertyDetails::accessor(PropertyAttributes::NONE);
        assert_eq!(compare_details(data(), accessor), Ordering::Less);
    }

    #[test]
    fn test_kind_dominates_attributes() {
        let frozen_data = PropertyDetails::data(PropertyAttributes::FROZEN);
        let plain_accessor = PropertyDetails::accessor(PropertyAttributes::NONE);
        assert_eq!(compare_details(frozen_data, plain_accessor), Ordering::Less);
    }

    #[test]
    fn test_attributes_ascending() {
        let read_only = PropertyDetails::data(PropertyAttributes::READ_ONLY);
        let dont_enum = PropertyDetails::data(PropertyAttributes::DONT_ENUM);
        assert_eq!(compare_details(data(), read_only), Ordering::Less);
        assert_eq!(compare_details(read_only, dont_enum), Ordering::Less);
    }

    #[test]
    fn test_same_name_different_details_distinct() {
        let x = intern("x");
        let read_only = PropertyDetails::data(PropertyAttributes::READ_ONLY);
        assert_ne!(compare_keys(&x, data(), &x, read_only), Ordering::Equal);
    }

    // -------------------------------------------------------------------------
    // Key Ordering
    // -------------------------------------------------------------------------

    #[test]
    fn test_key_rank_order() {
        let property = TransitionKey::field(intern("x"));
        let special = TransitionKey::Special(SpecialTransition::Elements);
        let prototype = TransitionKey::Prototype(PrototypeId(1));
        assert!(property < special);
        assert!(special < prototype);
        assert!(property < prototype);
    }

    #[test]
    fn test_special_keys_ordered() {
        let keys: Vec<_> = SpecialTransition::ALL
            .iter()
            .map(|kind| TransitionKey::Special(*kind))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_key_accessors() {
        let key = TransitionKey::field(intern("y"));
        assert!(key.is_property());
        assert_eq!(key.name().map(|n| n.as_str()), Some("y"));
        assert!(TransitionKey::Special(SpecialTransition::Sealed).name().is_none());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(
            TransitionKey::Special(SpecialTransition::Frozen).to_string(),
            "<frozen>"
        );
        assert_eq!(
            TransitionKey::Prototype(PrototypeId(3)).to_string(),
            "<prototype 3>"
        );
    }
}
