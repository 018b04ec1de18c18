// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Attribute Resolution
//!
//! Depth-first resolver over an entity's ordered sources:
//!
//! ```text
//! 1. own data          presence check
//! 2. parent groups     declared order, each resolved recursively,
//!                      falsy results are skipped
//! 3. defaults          presence check
//! ```
//!
//! Nothing is cached; every lookup walks the current object graph.

use serde_json::Value;
use tracing::trace;

use super::attributes::{AttributeContainer, Attributes, GroupQuery, ParentGroup};
use super::value::{is_truthy, Data};

/// Effective value of `key` for the entity owning `attributes`
pub(crate) fn lookup(attributes: &Attributes, key: &str) -> Option<Value> {
    if let Some(value) = attributes.own(key) {
        return Some(value);
    }

    for group in attributes.resolved_parents() {
        match lookup(group.attributes(), key) {
            Some(value) if is_truthy(&value) => return Some(value),
            Some(_) => trace!(
                "Skipping falsy '{}' from group '{}' for '{}'",
                key,
                group.name(),
                attributes.name()
            ),
            None => {}
        }
    }

    attributes.defaults().get(key)
}

/// Every effective attribute, first-seen source wins per key
pub(crate) fn flatten(attributes: &Attributes) -> Data {
    let mut merged = attributes.data();

    for group in attributes.resolved_parents() {
        for (key, value) in flatten(group.attributes()) {
            merged.entry(key).or_insert(value);
        }
    }

    for (key, value) in attributes.defaults().snapshot() {
        merged.entry(key).or_insert(value);
    }

    merged
}

/// Whether `query` names a group in the parent-group closure
pub(crate) fn has_parent(attributes: &Attributes, query: &GroupQuery<'_>) -> bool {
    attributes.parent_groups().iter().any(|parent| {
        query.matches(parent)
            || match parent {
                ParentGroup::Resolved(group) => has_parent(group.attributes(), query),
                ParentGroup::Name(_) => false,
            }
    })
}
