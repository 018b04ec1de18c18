// Copyright (c) 2025 - Cowboy AI, Inc.
//! Raw Inventory Data
//!
//! The shape loaders hand to the inventory: name → attribute mapping (or
//! null) for hosts and groups, plus the global defaults.
//!
//! ```json
//! {
//!   "hosts":    { "h1": { "ip": "1.2.3.4", "groups": ["bma"] } },
//!   "groups":   { "bma": { "site": "bma" } },
//!   "defaults": { "domain": "acme.com" }
//! }
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Data, Group, Host};

/// Host entry handed to the inventory builder
#[derive(Debug)]
pub enum HostEntry {
    /// Attribute mapping or null
    Data(Value),
    /// Host built by the caller; it still receives the inventory defaults
    Built(Host),
}

impl From<Value> for HostEntry {
    fn from(value: Value) -> Self {
        HostEntry::Data(value)
    }
}

impl From<Data> for HostEntry {
    fn from(data: Data) -> Self {
        HostEntry::Data(Value::Object(data))
    }
}

impl From<Host> for HostEntry {
    fn from(host: Host) -> Self {
        HostEntry::Built(host)
    }
}

/// Group entry handed to the inventory builder
#[derive(Debug, Clone)]
pub enum GroupEntry {
    /// Attribute mapping or null
    Data(Value),
    /// Live group object, kept as is
    Built(Arc<Group>),
}

impl From<Value> for GroupEntry {
    fn from(value: Value) -> Self {
        GroupEntry::Data(value)
    }
}

impl From<Data> for GroupEntry {
    fn from(data: Data) -> Self {
        GroupEntry::Data(Value::Object(data))
    }
}

impl From<Group> for GroupEntry {
    fn from(group: Group) -> Self {
        GroupEntry::Built(Arc::new(group))
    }
}

impl From<Arc<Group>> for GroupEntry {
    fn from(group: Arc<Group>) -> Self {
        GroupEntry::Built(group)
    }
}

/// Serialisable inventory description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInventory {
    pub hosts: IndexMap<String, Value>,
    pub groups: IndexMap<String, Value>,
    pub defaults: Data,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_missing_sections_default_to_empty() {
        let raw: RawInventory = serde_json::from_value(json!({
            "hosts": {"h1": null}
        }))
        .unwrap();

        assert_eq!(raw.hosts.len(), 1);
        assert_eq!(raw.hosts["h1"], Value::Null);
        assert!(raw.groups.is_empty());
        assert!(raw.defaults.is_empty());
    }

    #[test]
    fn test_section_order_is_preserved() {
        let raw: RawInventory = serde_json::from_str(
            r#"{"hosts": {"zeta": {}, "alpha": {}, "mid": {}}}"#,
        )
        .unwrap();

        let names: Vec<_> = raw.hosts.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
