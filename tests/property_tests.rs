//! Property-based tests for the record model and tree growth.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated records and reference lists.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use seedtree::core::thing::{Common, Feature, Thing};
use seedtree::core::types::{Address, ThingType};
use seedtree::resolver::mock::MockResolver;
use seedtree::resolver::ResolutionError;
use seedtree::tree::new_seed;

/// Strategy for generating valid addresses.
fn address() -> impl Strategy<Value = Address> {
    "[a-z0-9][a-z0-9_-]{0,15}".prop_map(|s| Address::new(s).unwrap())
}

/// Numbers that survive a decimal round trip exactly.
fn exact_number() -> impl Strategy<Value = f64> {
    (-4_000_000i64..4_000_000).prop_map(|n| n as f64 / 4.0)
}

fn common() -> impl Strategy<Value = Common> {
    (
        address(),
        "[0-9]\\.[0-9]",
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(any::<u8>(), 0..32),
    )
        .prop_map(|(address, version, tradable, spawner, cert)| {
            Common::new(address, version, tradable, spawner, cert)
        })
}

fn thing_type() -> impl Strategy<Value = ThingType> {
    prop::sample::select(ThingType::all().to_vec())
}

fn feature() -> impl Strategy<Value = Feature> {
    (any::<i64>(), address(), thing_type(), prop::option::of("[a-zA-Z ]{1,12}")).prop_map(
        |(order, address, t, title)| {
            let feature = Feature::new(order, address).with_type(t);
            match title {
                Some(title) => feature.with_title(title),
                None => feature,
            }
        },
    )
}

/// Strategy for any single record.
fn thing() -> impl Strategy<Value = Thing> {
    prop_oneof![
        (common(), prop::collection::vec(feature(), 0..8))
            .prop_map(|(c, features)| Thing::container(c, features)),
        (common(), ".{0,64}").prop_map(|(c, data)| Thing::text(c, data)),
        (common(), exact_number()).prop_map(|(c, data)| Thing::number(c, data)),
        (common(), prop::collection::vec(any::<u8>(), 0..128))
            .prop_map(|(c, data)| Thing::image(c, data)),
    ]
}

/// Strategy for leaf records only.
fn leaf() -> impl Strategy<Value = Thing> {
    thing().prop_filter("leaf variants only", |t| !t.is_container())
}

proptest! {
    /// Decoding an encoded record yields the same record, and encoding it
    /// again yields the same bytes.
    #[test]
    fn decode_is_idempotent(thing in thing()) {
        let first = thing.encode().unwrap();
        let decoded = Thing::decode(&first).unwrap();
        prop_assert_eq!(&decoded, &thing);

        let second = decoded.encode().unwrap();
        prop_assert_eq!(first, second);
    }

    /// A record always decodes as its own type and never as another.
    #[test]
    fn decode_as_checks_discriminant(thing in thing(), other in thing_type()) {
        let bytes = thing.encode().unwrap();
        prop_assert!(Thing::decode_as(thing.thing_type(), &bytes).is_ok());
        if other != thing.thing_type() {
            prop_assert!(Thing::decode_as(other, &bytes).is_err());
        }
    }

    /// Leaf origins grow no children and trigger no lookups.
    #[test]
    fn leaves_terminate(leaf in leaf()) {
        let mock = MockResolver::new();
        let seed = tokio_test::block_on(new_seed(Arc::new(leaf), Arc::new(mock.clone()))).unwrap();

        prop_assert!(seed.tree().is_leaf());
        prop_assert!(mock.calls().is_empty());
    }

    /// Children come out sorted by order whatever order they were declared in.
    #[test]
    fn children_follow_order(orders in prop::collection::vec(any::<i64>(), 0..12)) {
        let things: Vec<Thing> = (0..orders.len())
            .map(|i| Thing::text(Common::at(Address::new(format!("leaf{}", i)).unwrap()), i.to_string()))
            .collect();
        let features: Vec<Feature> = orders
            .iter()
            .enumerate()
            .map(|(i, order)| {
                Feature::new(*order, Address::new(format!("leaf{}", i)).unwrap())
                    .with_type(ThingType::Text)
            })
            .collect();
        let origin = Thing::container(Common::at(Address::new("root").unwrap()), features);

        let seed = tokio_test::block_on(new_seed(
            Arc::new(origin),
            Arc::new(MockResolver::with_things(things)),
        ))
        .unwrap();

        let mut expected: Vec<(i64, usize)> = orders.iter().copied().zip(0..).collect();
        expected.sort_by_key(|(order, _)| *order);
        let expected: Vec<String> = expected.into_iter().map(|(_, i)| i.to_string()).collect();

        let actual: Vec<String> = seed
            .tree()
            .children
            .iter()
            .map(|c| c.thing().data_string())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Every reference ends up either as a child or as a recorded failure.
    #[test]
    fn every_reference_accounted_for(failing in prop::collection::vec(any::<bool>(), 0..12)) {
        let mut mock = MockResolver::new();
        let mut features = Vec::new();
        for (i, fails) in failing.iter().enumerate() {
            let address = Address::new(format!("ref{}", i)).unwrap();
            mock.insert(Thing::text(Common::at(address.clone()), "ok"));
            if *fails {
                mock = mock.fail_on(address.clone(), ResolutionError::Network("down".into()));
            }
            features.push(Feature::new(i as i64, address).with_type(ThingType::Text));
        }
        let origin = Thing::container(Common::at(Address::new("root").unwrap()), features);

        let seed = tokio_test::block_on(new_seed(Arc::new(origin), Arc::new(mock))).unwrap();

        let failed = failing.iter().filter(|f| **f).count();
        prop_assert_eq!(seed.tree().failures.len(), failed);
        prop_assert_eq!(seed.tree().children.len(), failing.len() - failed);

        let dropped: HashSet<String> = seed
            .tree()
            .failures
            .iter()
            .map(|f| f.feature.address.to_string())
            .collect();
        for (i, fails) in failing.iter().enumerate() {
            prop_assert_eq!(dropped.contains(&format!("ref{}", i)), *fails);
        }
    }
}
