//! Property tests for transition tables against a simple model.

use proptest::prelude::*;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use trellis_core::intern::{InternedString, Interner};
use trellis_gc::WeakRef;
use trellis_runtime::transitions::{SearchResult, TransitionArray, TransitionEntry, compare_keys};
use trellis_runtime::{
    PropertyAttributes, PropertyDetails, PropertyKind, ShapeHandle, ShapeRegistry, TransitionKey,
};

const NAMES: [&str; 12] = [
    "a", "b", "c", "x", "y", "z", "ab", "ba", "len", "key", "value", "__proto",
];

/// Few distinct hashes, so ties are broken by text most of the time.
fn colliding_interner() -> Interner {
    Interner::with_hash_fn(|text| (text.len() % 3) as u32)
}

fn arb_details() -> impl Strategy<Value = PropertyDetails> {
    (
        prop_oneof![Just(PropertyKind::Data), Just(PropertyKind::Accessor)],
        0u8..8,
    )
        .prop_map(|(kind, bits)| {
            PropertyDetails::new(kind, PropertyAttributes::from_bits_truncate(bits))
        })
}

fn arb_edge() -> impl Strategy<Value = (usize, PropertyDetails)> {
    (0..NAMES.len(), arb_details())
}

/// Insert every edge into the empty shape, returning the model of what the
/// table should hold.
fn build(
    registry: &mut ShapeRegistry,
    names: &[InternedString],
    edges: &[(usize, PropertyDetails)],
) -> FxHashMap<TransitionKey, ShapeHandle> {
    let empty = registry.empty_shape();
    let mut model = FxHashMap::default();
    for &(name, details) in edges {
        let target = registry
            .transition_with_kind(empty, names[name].clone(), details.kind, details.attributes)
            .unwrap();
        let previous = model.insert(TransitionKey::property(names[name].clone(), details), target);
        if let Some(previous) = previous {
            assert_eq!(previous, target, "existing edges are reused");
        }
    }
    model
}

proptest! {
    #[test]
    fn prop_lookup_matches_model(edges in prop::collection::vec(arb_edge(), 0..40)) {
        let interner = colliding_interner();
        let names: Vec<_> = NAMES.iter().map(|name| interner.intern(name)).collect();
        let mut registry = ShapeRegistry::new();
        let model = build(&mut registry, &names, &edges);
        let empty = registry.empty_shape();

        let accessor = registry.accessor(empty);
        prop_assert_eq!(accessor.number_of_transitions(), model.len());
        prop_assert_eq!(accessor.number_of_live_transitions(), model.len());
        for (key, target) in &model {
            prop_assert_eq!(accessor.find(key), Some(*target));
        }
        for name in &names {
            for details in [
                PropertyDetails::data(PropertyAttributes::NONE),
                PropertyDetails::accessor(PropertyAttributes::FROZEN),
            ] {
                let key = TransitionKey::property(name.clone(), details);
                prop_assert_eq!(accessor.find(&key), model.get(&key).copied());
            }
        }
    }

    #[test]
    fn prop_table_stays_sorted(edges in prop::collection::vec(arb_edge(), 0..40)) {
        let interner = colliding_interner();
        let names: Vec<_> = NAMES.iter().map(|name| interner.intern(name)).collect();
        let mut registry = ShapeRegistry::new();
        build(&mut registry, &names, &edges);
        let empty = registry.empty_shape();

        let accessor = registry.accessor(empty);
        prop_assert!(accessor.is_sorted_no_duplicates());

        let keys: Vec<_> = accessor
            .live_transitions()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        for pair in keys.windows(2) {
            prop_assert_eq!(pair[0].cmp(&pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn prop_cleared_edges_read_as_absent(
        edges in prop::collection::vec(arb_edge(), 1..30),
        keep in prop::collection::vec(any::<bool>(), 30),
    ) {
        let interner = colliding_interner();
        let names: Vec<_> = NAMES.iter().map(|name| interner.intern(name)).collect();
        let mut registry = ShapeRegistry::new();
        let model = build(&mut registry, &names, &edges);
        let empty = registry.empty_shape();

        let (kept, dropped): (Vec<_>, Vec<_>) = model
            .iter()
            .enumerate()
            .partition(|(index, _)| keep[*index % keep.len()]);
        registry.collect_garbage(kept.iter().map(|(_, (_, target))| **target));

        {
            let accessor = registry.accessor(empty);
            for (_, (key, target)) in &kept {
                prop_assert_eq!(accessor.find(key), Some(**target));
            }
            for (_, (key, _)) in &dropped {
                prop_assert_eq!(accessor.find(key), None);
            }
            prop_assert_eq!(accessor.number_of_live_transitions(), kept.len());
        }

        registry.sweep_transitions();
        let accessor = registry.accessor(empty);
        prop_assert_eq!(accessor.number_of_live_transitions(), kept.len());
        prop_assert!(accessor.is_sorted_no_duplicates());
    }

    #[test]
    fn prop_search_matches_linear_scan(edges in prop::collection::vec(arb_edge(), 0..40)) {
        let interner = colliding_interner();
        let names: Vec<_> = NAMES.iter().map(|name| interner.intern(name)).collect();
        let registry = ShapeRegistry::new();
        let target = WeakRef::new(registry.empty_shape());

        // Sort and dedup with the comparator alone, then lay the entries out in order.
        let mut sorted = edges.clone();
        sorted.sort_by(|x, y| compare_keys(&names[x.0], x.1, &names[y.0], y.1));
        sorted.dedup_by(|x, y| compare_keys(&names[x.0], x.1, &names[y.0], y.1) == Ordering::Equal);
        let mut array = TransitionArray::allocate(sorted.len()).unwrap();
        for (index, &(name, details)) in sorted.iter().enumerate() {
            array.insert_at(index, TransitionEntry::new(names[name].clone(), details, target));
        }

        let all_details = (0u8..8).flat_map(|bits| {
            [PropertyKind::Data, PropertyKind::Accessor].map(|kind| {
                PropertyDetails::new(kind, PropertyAttributes::from_bits_truncate(bits))
            })
        });
        for details in all_details {
            for name in &names {
                let linear = |wanted: Ordering| {
                    array.entries().iter().position(|entry| {
                        compare_keys(entry.name(), entry.details(), name, details) == wanted
                    })
                };
                let expected = match linear(Ordering::Equal) {
                    Some(index) => SearchResult::Found(index),
                    None => SearchResult::NotFound {
                        insertion_index: linear(Ordering::Greater).unwrap_or(array.entries().len()),
                    },
                };
                prop_assert_eq!(array.search(name, details), expected);
            }
        }
    }

    #[test]
    fn prop_comparator_is_total_order(
        a in arb_edge(),
        b in arb_edge(),
        c in arb_edge(),
    ) {
        let interner = colliding_interner();
        let names: Vec<_> = NAMES.iter().map(|name| interner.intern(name)).collect();
        let cmp = |x: &(usize, PropertyDetails), y: &(usize, PropertyDetails)| {
            compare_keys(&names[x.0], x.1, &names[y.0], y.1)
        };

        // Antisymmetry
        prop_assert_eq!(cmp(&a, &b), cmp(&b, &a).reverse());
        // Equality means identical key
        prop_assert_eq!(cmp(&a, &b) == Ordering::Equal, a == b);
        // Transitivity
        if cmp(&a, &b) != Ordering::Greater && cmp(&b, &c) != Ordering::Greater {
            prop_assert_ne!(cmp(&a, &c), Ordering::Greater);
        }
    }
}
