// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Inventory Filtering
//!
//! Filtering never mutates its source, partitions the host set, and keeps
//! group objects shared with the source.

use std::sync::Arc;

use cim_inventory::domain::{AttributeContainer, Host};
use cim_inventory::inventory::{Filter, HostPredicate, Inventory};
use proptest::prelude::*;
use serde_json::json;

const SITES: [&str; 3] = ["bma", "cmh", "lab"];

// ============================================================================
// Strategies
// ============================================================================

/// Per host: optional own site, optional site group, optional role
#[derive(Debug, Clone)]
struct HostSpec {
    own_site: Option<usize>,
    group_site: Option<usize>,
    edge: bool,
}

fn host_spec() -> impl Strategy<Value = HostSpec> {
    (
        prop::option::of(0..SITES.len()),
        prop::option::of(0..SITES.len()),
        any::<bool>(),
    )
        .prop_map(|(own_site, group_site, edge)| HostSpec {
            own_site,
            group_site,
            edge,
        })
}

fn inventory_strategy() -> impl Strategy<Value = Vec<HostSpec>> {
    prop::collection::vec(host_spec(), 0..24)
}

fn site_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![
        (0..SITES.len()).prop_map(|i| Filter::eq("site", SITES[i])),
        (0..SITES.len()).prop_map(|i| Filter::in_group(SITES[i])),
        Just(Filter::eq("role", "edge")),
        Just(Filter::contains("tags", "monitored")),
    ]
}

fn build(specs: &[HostSpec]) -> Arc<Inventory> {
    let groups = SITES.iter().fold(Inventory::builder(), |builder, site| {
        builder.group(*site, json!({ "site": site, "tags": ["monitored"] }))
    });

    specs
        .iter()
        .enumerate()
        .fold(groups, |builder, (i, spec)| {
            let mut data = serde_json::Map::new();
            if let Some(site) = spec.own_site {
                data.insert("site".into(), json!(SITES[site]));
            }
            if let Some(site) = spec.group_site {
                data.insert("groups".into(), json!([SITES[site]]));
            }
            if spec.edge {
                data.insert("role".into(), json!("edge"));
            }
            builder.host(format!("h{i}"), data)
        })
        .build()
        .expect("generated inventory is valid")
}

fn names(inventory: &Inventory) -> Vec<String> {
    inventory.hosts().keys().cloned().collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: Filtering partitions the host set
    ///
    /// A filter and its negation select disjoint host sets that together
    /// cover the source, which keeps every host.
    #[test]
    fn prop_filter_partitions_hosts(specs in inventory_strategy(), filter in site_filter()) {
        let inventory = build(&specs);
        let before = names(&inventory);

        let kept = inventory.filter(filter.clone());
        let dropped = inventory.filter(!filter);

        prop_assert_eq!(kept.len() + dropped.len(), inventory.len());
        prop_assert!(names(&kept).iter().all(|n| !dropped.hosts().contains_key(n)));
        prop_assert_eq!(names(&inventory), before);
    }

    /// Property: Kept hosts match, dropped hosts do not
    #[test]
    fn prop_filter_agrees_with_predicate(specs in inventory_strategy(), filter in site_filter()) {
        let inventory = build(&specs);
        let kept = inventory.filter(filter.clone());

        for (name, host) in inventory.hosts() {
            prop_assert_eq!(kept.hosts().contains_key(name), filter.matches(host));
        }
    }

    /// Property: Chained filters equal the conjunction
    #[test]
    fn prop_chaining_is_conjunction(
        specs in inventory_strategy(),
        first in site_filter(),
        second in site_filter(),
    ) {
        let inventory = build(&specs);
        let chained = inventory.filter(first.clone()).filter(second.clone());
        let combined = inventory.filter(first & second);

        prop_assert_eq!(names(&chained), names(&combined));
    }

    /// Property: Filtered inventories share groups and hosts
    #[test]
    fn prop_filter_shares_objects(specs in inventory_strategy(), filter in site_filter()) {
        let inventory = build(&specs);
        let kept = inventory.filter(filter);

        prop_assert_eq!(kept.groups().len(), inventory.groups().len());
        for (name, group) in kept.groups() {
            prop_assert!(Arc::ptr_eq(group, &inventory.groups()[name]));
        }
        for (name, host) in kept.hosts() {
            prop_assert!(Arc::ptr_eq(host, &inventory.hosts()[name]));
        }
    }

    /// Property: Closures and structural filters agree
    #[test]
    fn prop_closure_matches_eq_filter(specs in inventory_strategy(), site in 0..SITES.len()) {
        let inventory = build(&specs);
        let wanted = json!(SITES[site]);

        let structural = inventory.filter(Filter::eq("site", SITES[site]));
        let closure = inventory.filter(|host: &Host| host.get("site").as_ref() == Some(&wanted));

        prop_assert_eq!(names(&structural), names(&closure));
    }
}
