// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Attribute Resolution
//!
//! Every generated host has its own data, an ordered list of direct groups
//! and shared defaults. The expected value of each key is computed
//! independently and compared with what the inventory resolves.

use std::sync::Arc;

use cim_inventory::domain::{is_truthy, AttributeContainer, Data};
use cim_inventory::inventory::Inventory;
use proptest::prelude::*;
use serde_json::{json, Value};

const KEYS: [&str; 5] = ["site", "role", "platform", "port", "debug"];

// ============================================================================
// Strategies
// ============================================================================

fn truthy_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(Value::from),
        (1i64..1000).prop_map(Value::from),
        Just(json!(true)),
        Just(json!(["x"])),
    ]
}

fn falsy_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!(false)),
        Just(json!(0)),
        Just(json!("")),
        Just(json!([])),
        Just(json!({})),
    ]
}

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![3 => truthy_value(), 1 => falsy_value()]
}

/// Subset of [`KEYS`] mapped to values
fn attribute_map(values: BoxedStrategy<Value>) -> impl Strategy<Value = Data> {
    prop::collection::vec(prop::option::of(values), KEYS.len()).prop_map(|slots| {
        KEYS.iter()
            .zip(slots)
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
            .collect()
    })
}

#[derive(Debug, Clone)]
struct Layout {
    own: Data,
    groups: Vec<Data>,
    defaults: Data,
}

fn layout() -> impl Strategy<Value = Layout> {
    (
        attribute_map(any_value().boxed()),
        prop::collection::vec(attribute_map(any_value().boxed()), 0..4),
        attribute_map(any_value().boxed()),
    )
        .prop_map(|(own, groups, defaults)| Layout {
            own,
            groups,
            defaults,
        })
}

fn build(layout: &Layout, reverse_groups: bool) -> Arc<Inventory> {
    let names: Vec<String> = (0..layout.groups.len()).map(|i| format!("g{i}")).collect();

    let mut host = layout.own.clone();
    host.insert("groups".into(), json!(names));

    let mut entries: Vec<_> = names.iter().zip(&layout.groups).collect();
    if reverse_groups {
        entries.reverse();
    }

    entries
        .into_iter()
        .fold(Inventory::builder(), |builder, (name, data)| {
            builder.group(name.as_str(), data.clone())
        })
        .host("h1", host)
        .defaults(layout.defaults.clone())
        .build()
        .expect("generated inventory is valid")
}

/// Own data, then the first truthy group value, then defaults
fn expected(layout: &Layout, key: &str) -> Option<Value> {
    layout
        .own
        .get(key)
        .cloned()
        .or_else(|| {
            layout
                .groups
                .iter()
                .filter_map(|group| group.get(key))
                .find(|value| is_truthy(value))
                .cloned()
        })
        .or_else(|| layout.defaults.get(key).cloned())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: Own data always wins
    ///
    /// A key present in the host's own data resolves to that value, falsy
    /// or not, regardless of groups and defaults.
    #[test]
    fn prop_own_data_wins(layout in layout()) {
        let inventory = build(&layout, false);
        let host = inventory.host("h1").expect("h1 exists");

        for (key, value) in &layout.own {
            prop_assert_eq!(host.resolve(key).ok(), Some(value.clone()));
        }
    }

    /// Property: Shadowing follows precedence
    ///
    /// Every key resolves to own data, else the first truthy group value in
    /// declaration order, else the default.
    #[test]
    fn prop_shadowing_follows_precedence(layout in layout()) {
        let inventory = build(&layout, false);
        let host = inventory.host("h1").expect("h1 exists");

        for key in KEYS {
            prop_assert_eq!(host.get(key), expected(&layout, key), "key {}", key);
        }
    }

    /// Property: Group table order is irrelevant
    ///
    /// Declaring the groups in reverse leaves every resolved value unchanged,
    /// since precedence follows the host's group list.
    #[test]
    fn prop_group_order_in_table_is_irrelevant(layout in layout()) {
        let forward = build(&layout, false);
        let reversed = build(&layout, true);
        let (a, b) = (
            forward.host("h1").expect("h1 exists"),
            reversed.host("h1").expect("h1 exists"),
        );

        for key in KEYS {
            prop_assert_eq!(a.get(key), b.get(key));
        }
    }

    /// Property: Falsy group values pass through
    ///
    /// A falsy value in the first group never hides a truthy value further
    /// down the group list.
    #[test]
    fn prop_falsy_group_values_pass_through(
        falsy in falsy_value(),
        truthy in truthy_value(),
    ) {
        let layout = Layout {
            own: Data::new(),
            groups: vec![
                [("site".to_string(), falsy)].into_iter().collect(),
                [("site".to_string(), truthy.clone())].into_iter().collect(),
            ],
            defaults: Data::new(),
        };
        let inventory = build(&layout, false);

        prop_assert_eq!(
            inventory.host("h1").expect("h1 exists").get("site"),
            Some(truthy)
        );
    }

    /// Property: Group membership is transitive
    ///
    /// A host in the bottom group of a chain belongs to every group above it.
    #[test]
    fn prop_has_parent_group_is_transitive(depth in 1usize..8) {
        let builder = (0..depth).fold(Inventory::builder(), |builder, i| {
            let parents: Vec<String> = if i + 1 < depth {
                vec![format!("g{}", i + 1)]
            } else {
                Vec::new()
            };
            builder.group(format!("g{i}"), json!({ "groups": parents }))
        });
        let inventory = builder
            .host("h1", json!({ "groups": ["g0"] }))
            .build()
            .expect("chain is acyclic");
        let host = inventory.host("h1").expect("h1 exists");

        for group in inventory.groups().values() {
            prop_assert!(host.has_parent_group(group));
        }
        prop_assert!(!host.has_parent_group("missing"));
    }
}
