// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Filters
//!
//! Predicates for [`Inventory::filter`](super::Inventory::filter). Any
//! `Fn(&Host) -> bool` works; [`Filter`] adds structural matchers that
//! compose with `&`, `|` and `!`.
//!
//! ```rust
//! use cim_inventory::inventory::Filter;
//!
//! let edge_routers = Filter::eq("role", "edge") & !Filter::in_group("lab");
//! let either_site = Filter::any_of("site", ["bma", "cmh"]);
//! let combined = edge_routers | either_site;
//! ```

use std::ops::{BitAnd, BitOr, Not};

use serde_json::Value;

use crate::domain::{AttributeContainer, Host};

/// Decides whether a host belongs in a filtered inventory
pub trait HostPredicate {
    fn matches(&self, host: &Host) -> bool;
}

impl<F> HostPredicate for F
where
    F: Fn(&Host) -> bool,
{
    fn matches(&self, host: &Host) -> bool {
        self(host)
    }
}

/// Structural host predicate
///
/// Attribute comparisons use the resolved value, with null standing in for
/// a missing attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Attribute equals the value
    Eq(String, Value),
    /// Array attribute holds the value, or string attribute contains it
    Contains(String, Value),
    /// Attribute equals one of the values
    AnyOf(String, Vec<Value>),
    /// Group appears in the host's parent-group closure
    InGroup(String),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
    /// Every filter matches; empty matches every host
    All(Vec<Filter>),
}

impl Filter {
    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(key.into(), value.into())
    }

    pub fn contains(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Contains(key.into(), value.into())
    }

    pub fn any_of<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::AnyOf(key.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn in_group(group: impl Into<String>) -> Self {
        Filter::InGroup(group.into())
    }

    /// Every key must resolve to its value
    pub fn matching<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Filter::All(
            pairs
                .into_iter()
                .map(|(key, value)| Filter::eq(key, value))
                .collect(),
        )
    }

    fn resolved(host: &Host, key: &str) -> Value {
        host.get_or(key, Value::Null)
    }
}

impl HostPredicate for Filter {
    fn matches(&self, host: &Host) -> bool {
        match self {
            Filter::Eq(key, value) => Filter::resolved(host, key) == *value,
            Filter::Contains(key, needle) => match (Filter::resolved(host, key), needle) {
                (Value::Array(items), needle) => items.contains(needle),
                (Value::String(text), Value::String(part)) => text.contains(part.as_str()),
                _ => false,
            },
            Filter::AnyOf(key, values) => values.contains(&Filter::resolved(host, key)),
            Filter::InGroup(group) => host.has_parent_group(group),
            Filter::And(left, right) => left.matches(host) && right.matches(host),
            Filter::Or(left, right) => left.matches(host) || right.matches(host),
            Filter::Not(inner) => !inner.matches(host),
            Filter::All(filters) => filters.iter().all(|f| f.matches(host)),
        }
    }
}

impl BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Filter) -> Filter {
        Filter::And(Box::new(self), Box::new(rhs))
    }
}

impl BitOr for Filter {
    type Output = Filter;

    fn bitor(self, rhs: Filter) -> Filter {
        Filter::Or(Box::new(self), Box::new(rhs))
    }
}

impl Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Data, Group};
    use serde_json::json;
    use std::sync::Arc;
    use test_case::test_case;

    fn host() -> Host {
        let lab = Arc::new(Group::new("lab"));
        let mut data = Data::new();
        data.insert("site".into(), json!("bma"));
        data.insert("roles".into(), json!(["edge", "pe"]));
        data.insert("model".into(), json!("mx480"));
        Host::from_data("r1", data)
            .unwrap()
            .with_groups(vec![lab.into()])
    }

    #[test_case(Filter::eq("site", "bma"), true; "eq match")]
    #[test_case(Filter::eq("site", "cmh"), false; "eq mismatch")]
    #[test_case(Filter::eq("missing", Value::Null), true; "missing resolves to null")]
    #[test_case(Filter::contains("roles", "pe"), true; "array contains")]
    #[test_case(Filter::contains("model", "480"), true; "substring")]
    #[test_case(Filter::contains("site", 4), false; "non string needle")]
    #[test_case(Filter::any_of("site", ["cmh", "bma"]), true; "any of")]
    #[test_case(Filter::in_group("lab"), true; "in group")]
    #[test_case(Filter::in_group("prod"), false; "not in group")]
    #[test_case(Filter::matching([("site", "bma"), ("model", "mx480")]), true; "matching all pairs")]
    #[test_case(Filter::matching([("site", "bma"), ("model", "mx960")]), false; "matching one pair off")]
    #[test_case(Filter::matching(Vec::<(String, Value)>::new()), true; "empty matcher")]
    fn test_filter_matches(filter: Filter, expected: bool) {
        assert_eq!(filter.matches(&host()), expected);
    }

    #[test]
    fn test_operators_compose() {
        let host = host();
        assert!((Filter::eq("site", "bma") & Filter::in_group("lab")).matches(&host));
        assert!(!(Filter::eq("site", "bma") & !Filter::in_group("lab")).matches(&host));
        assert!((Filter::eq("site", "cmh") | Filter::contains("roles", "edge")).matches(&host));
    }

    #[test]
    fn test_closures_are_predicates() {
        let predicate = |h: &Host| h.name().starts_with('r');
        assert!(predicate.matches(&host()));
    }
}
