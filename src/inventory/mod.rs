// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory
//!
//! Owns every host and group. Group references are resolved once, when the
//! inventory is built; afterwards the structure never changes, and
//! [`Inventory::filter`] derives new inventories that share the same host
//! and group objects.
//!
//! # Example
//!
//! ```rust
//! use cim_inventory::domain::AttributeContainer;
//! use cim_inventory::inventory::{Filter, Inventory};
//! use serde_json::json;
//!
//! let inventory = Inventory::builder()
//!     .host("h1", json!({"ip": "1.2.3.4", "groups": ["bma"]}))
//!     .host("h2", json!({"groups": ["cmh"]}))
//!     .group("bma", json!({"site": "bma"}))
//!     .group("cmh", json!({"site": "cmh"}))
//!     .default_value("domain", "acme.com")
//!     .build()
//!     .unwrap();
//!
//! let bma = inventory.filter(Filter::eq("site", "bma"));
//! assert_eq!(bma.hosts().keys().collect::<Vec<_>>(), vec!["h1"]);
//! assert_eq!(inventory.len(), 2);
//!
//! let h1 = bma.host("h1").unwrap();
//! assert_eq!(h1.resolve("domain").unwrap(), json!("acme.com"));
//! ```

pub mod builder;
pub mod filter;
mod invariants;
pub mod raw;

pub use builder::InventoryBuilder;
pub use filter::{Filter, HostPredicate};
pub use raw::{GroupEntry, HostEntry, RawInventory};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::connections::PluginRegistry;
use crate::domain::{AttributeContainer, Data, Defaults, Group, Host};
use crate::errors::{InventoryError, InventoryResult};

/// Hosts, groups and the defaults they share
pub struct Inventory {
    hosts: IndexMap<String, Arc<Host>>,
    groups: IndexMap<String, Arc<Group>>,
    defaults: Defaults,
    config: Arc<Config>,
    plugins: Arc<PluginRegistry>,
}

impl Inventory {
    pub fn builder() -> InventoryBuilder {
        InventoryBuilder::new()
    }

    /// Build from raw host, group and default data
    ///
    /// # Errors
    /// Any error of [`InventoryBuilder::build`].
    pub fn new(
        hosts: IndexMap<String, HostEntry>,
        groups: IndexMap<String, GroupEntry>,
        defaults: Data,
    ) -> InventoryResult<Arc<Self>> {
        let builder = hosts
            .into_iter()
            .fold(Self::builder(), |builder, (name, entry)| builder.host(name, entry));
        groups
            .into_iter()
            .fold(builder, |builder, (name, entry)| builder.group(name, entry))
            .defaults(defaults)
            .build()
    }

    /// Build from a deserialised description
    ///
    /// # Errors
    /// Any error of [`InventoryBuilder::build`].
    pub fn from_raw(raw: RawInventory) -> InventoryResult<Arc<Self>> {
        InventoryBuilder::from_raw(raw).build()
    }

    pub(crate) fn bind(self: &Arc<Self>) {
        let this = Arc::downgrade(self);
        for host in self.hosts.values() {
            host.attributes().bind_inventory(this.clone());
        }
        for group in self.groups.values() {
            group.attributes().bind_inventory(this.clone());
        }
    }

    pub fn hosts(&self) -> &IndexMap<String, Arc<Host>> {
        &self.hosts
    }

    pub fn groups(&self) -> &IndexMap<String, Arc<Group>> {
        &self.groups
    }

    pub fn host(&self, name: &str) -> Option<&Arc<Host>> {
        self.hosts.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&Arc<Group>> {
        self.groups.get(name)
    }

    /// Global defaults, shared with every host
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Configuration passed to connection backends
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub fn plugins(&self) -> &Arc<PluginRegistry> {
        &self.plugins
    }

    /// Number of hosts
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Inventory of the hosts matching `predicate`
    ///
    /// The result shares host and group objects, defaults and config with
    /// `self`, which is left untouched. Hosts keep their back reference to
    /// the inventory they were built in.
    pub fn filter(&self, predicate: impl HostPredicate) -> Arc<Inventory> {
        let hosts: IndexMap<_, _> = self
            .hosts
            .iter()
            .filter(|(_, host)| predicate.matches(host))
            .map(|(name, host)| (name.clone(), Arc::clone(host)))
            .collect();

        debug!("Filtered inventory: {} of {} hosts", hosts.len(), self.hosts.len());

        Arc::new(Inventory {
            hosts,
            groups: self.groups.clone(),
            defaults: self.defaults.clone(),
            config: Arc::clone(&self.config),
            plugins: Arc::clone(&self.plugins),
        })
    }

    /// Hosts whose parent-group closure includes `group`
    pub fn children(&self, group: &Group) -> IndexMap<String, Arc<Host>> {
        self.hosts
            .iter()
            .filter(|(_, host)| host.has_parent_group(group))
            .map(|(name, host)| (name.clone(), Arc::clone(host)))
            .collect()
    }

    /// Own data of every host and group, plus the defaults
    ///
    /// The result deserialises back into a [`RawInventory`].
    pub fn to_data(&self) -> Value {
        let hosts: serde_json::Map<_, _> = self
            .hosts
            .iter()
            .map(|(name, host)| (name.clone(), Value::Object(host.data())))
            .collect();
        let groups: serde_json::Map<_, _> = self
            .groups
            .iter()
            .map(|(name, group)| (name.clone(), Value::Object(group.data())))
            .collect();

        json!({
            "hosts": hosts,
            "groups": groups,
            "defaults": self.defaults.snapshot(),
        })
    }

    /// Close every open connection on every host
    ///
    /// All hosts are attempted; failures are reported together.
    ///
    /// # Errors
    /// [`InventoryError::CloseFailed`] listing each failed close.
    pub fn close_connections(&self) -> InventoryResult<()> {
        let mut failures = Vec::new();
        for host in self.hosts.values() {
            match host.close_connections() {
                Ok(()) => {}
                Err(InventoryError::CloseFailed { failures: failed }) => failures.extend(failed),
                Err(other) => warn!("Skipping connections of {}: {}", host.name(), other),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(InventoryError::CloseFailed { failures })
        }
    }
}

impl fmt::Debug for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("hosts", &self.hosts.keys().collect::<Vec<_>>())
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
